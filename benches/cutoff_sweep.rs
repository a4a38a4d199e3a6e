use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use shrike::metrics::{AlignmentSummary, ContigMetrics, ReadMetrics};
use shrike::quant::ExpressionRecord;
use shrike::score::{composite_score, optimize, MetricNormalizer, ScoredContig, SilentObserver};

/// Deterministic score spread so runs are comparable across machines.
fn synthetic_scores(n: usize) -> Vec<ScoredContig> {
    let mut state = 0x2545F4914F6CDD1Du64;
    (0..n)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let score = (state >> 11) as f64 / (1u64 << 53) as f64;
            ScoredContig {
                id: format!("contig_{:07}", i),
                score,
            }
        })
        .collect()
}

fn synthetic_metrics(n: usize) -> Vec<ContigMetrics> {
    (0..n)
        .map(|i| {
            let fragments = 20 + (i as u64 * 17) % 400;
            let good = fragments - fragments / 10;
            let length = 300 + (i as u64 * 31) % 4000;
            ContigMetrics {
                basic: None,
                read: Some(ReadMetrics {
                    alignment: Some(AlignmentSummary {
                        fragments,
                        good_fragments: good,
                        bases_uncovered: length / 20,
                        p_seq_true: 0.9 + (i % 10) as f64 / 100.0,
                        p_not_segmented: 0.95,
                    }),
                    expression: Some(ExpressionRecord {
                        length,
                        eff_length: length - 150,
                        eff_count: fragments,
                        tpm: fragments as f64,
                    }),
                }),
                comparative: None,
            }
        })
        .collect()
}

fn bench_cutoff_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutoff_sweep");
    for n in [1_000usize, 10_000, 100_000] {
        let contigs = synthetic_scores(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &contigs, |b, contigs| {
            b.iter(|| black_box(optimize(contigs, &SilentObserver).unwrap()));
        });
    }
    group.finish();
}

fn bench_normalize_and_compose(c: &mut Criterion) {
    let metrics = synthetic_metrics(10_000);
    let normalizer = MetricNormalizer::fit(&metrics);
    c.bench_function("normalize_and_compose_10k", |b| {
        b.iter(|| {
            let scores: Vec<Option<f64>> = metrics
                .iter()
                .map(|m| composite_score(&normalizer.normalize("contig", m).scores))
                .collect();
            black_box(scores)
        });
    });
}

criterion_group!(benches, bench_cutoff_sweep, bench_normalize_and_compose);
criterion_main!(benches);

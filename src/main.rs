mod cli_main;

use clap::Parser;
use rayon::ThreadPoolBuilder;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use cli_main::{Cli, Commands};
use shrike::assembly::Assembly;
use shrike::errors::ScoreError;
use shrike::metrics::{AssemblyStats, BasicMetrics};
use shrike::pipeline::{self, ScoreOptions};
use shrike::quant::{self, QuantCommand};
use shrike::score::LogObserver;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Setting tracing default failed");

    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), ScoreError> {
    match cli.command {
        Commands::Score {
            assembly,
            output,
            read_stats,
            expression,
            alignments,
            ref_stats,
            quant_exe,
            threads,
            strict_metrics,
            require_read_metrics,
            write_good_fasta,
        } => {
            ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .expect("Failed to build thread pool");

            let start = std::time::Instant::now();
            let options = ScoreOptions {
                assemblies: assembly,
                output_dir: output,
                read_stats,
                expression,
                alignments,
                ref_stats,
                quant_exe,
                threads,
                strict_metrics,
                require_read_metrics,
                write_good_fasta,
            };
            let summary = pipeline::run(&options, &LogObserver)?;
            info!(
                "scored {} assemblies in {:.2}s",
                summary.evaluated,
                start.elapsed().as_secs_f32()
            );
            if summary.evaluated == 0 {
                return Err(ScoreError::Config("every assembly failed".to_string()));
            }
            Ok(())
        }

        Commands::Stats { input, format } => {
            info!("Calculating assembly statistics for: {}", input.display());
            let assembly = Assembly::from_fasta(&input)?;
            let metrics: Vec<BasicMetrics> = assembly
                .contigs()
                .iter()
                .map(|c| BasicMetrics::from_sequence(&c.sequence))
                .collect();
            let stats = AssemblyStats::from_metrics(&metrics);

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&stats).unwrap());
                }
                "tsv" => {
                    println!("n_seqs\tsmallest\tlargest\tn_bases\tmean_len\tn50\tgc\tp_with_orf");
                    println!(
                        "{}\t{}\t{}\t{}\t{:.2}\t{}\t{:.5}\t{:.5}",
                        stats.n_seqs,
                        stats.smallest,
                        stats.largest,
                        stats.n_bases,
                        stats.mean_len,
                        stats.n50,
                        stats.gc,
                        stats.p_with_orf
                    );
                }
                _ => {
                    return Err(ScoreError::Config(format!(
                        "unsupported format: {}",
                        format
                    )))
                }
            }
            Ok(())
        }

        Commands::Quant {
            assembly,
            alignments,
            output,
            quant_exe,
            threads,
        } => {
            let cmd = QuantCommand {
                alignments,
                targets: assembly,
                threads,
            };
            let table = quant::run_quantifier(&quant_exe, &cmd, &output)?;
            info!("expression table written to {}", table.display());
            Ok(())
        }
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "shrike", version, about = "Quality scoring and contig filtering for transcriptome assemblies", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score assemblies and search for the optimal contig cutoff
    Score {
        /// Assembly FASTA(.gz) files, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        assembly: Vec<PathBuf>,

        /// Directory for reports and sidecar files
        #[arg(short, long, default_value = "shrike_out")]
        output: PathBuf,

        /// Per-assembly read alignment summary tables, comma separated
        #[arg(long, value_delimiter = ',')]
        read_stats: Vec<PathBuf>,

        /// Per-assembly expression tables from a previous quantifier run
        #[arg(long, value_delimiter = ',')]
        expression: Vec<PathBuf>,

        /// Per-assembly BAM alignments, quantified when no expression
        /// table is given
        #[arg(long, value_delimiter = ',')]
        alignments: Vec<PathBuf>,

        /// Per-assembly reference comparison tables, comma separated
        #[arg(long, value_delimiter = ',')]
        ref_stats: Vec<PathBuf>,

        /// Quantifier executable
        #[arg(long, default_value = "salmon")]
        quant_exe: PathBuf,

        /// Number of threads
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,

        /// Fail an assembly on the first out-of-domain metric value
        #[arg(long)]
        strict_metrics: bool,

        /// Fail instead of degrading when read evidence cannot be produced
        #[arg(long)]
        require_read_metrics: bool,

        /// Write the retained contigs as FASTA next to the reports
        #[arg(long)]
        write_good_fasta: bool,
    },

    /// Calculate sequence statistics for an assembly
    Stats {
        /// Assembly FASTA(.gz) file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (json or tsv)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Run the external quantifier against an existing alignment
    Quant {
        /// Assembly the reads were aligned to
        #[arg(short, long)]
        assembly: PathBuf,

        /// Read alignments, BAM format
        #[arg(short = 'b', long)]
        alignments: PathBuf,

        /// Output directory for the expression table
        #[arg(short, long, default_value = "shrike_quant")]
        output: PathBuf,

        /// Quantifier executable
        #[arg(long, default_value = "salmon")]
        quant_exe: PathBuf,

        /// Number of threads
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,
    },
}

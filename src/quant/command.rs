//! Invocation of the external transcript quantifier.
//!
//! The quantifier runs against an existing alignment file and writes its
//! expression table into the working directory we hand it. Failures here are
//! collaborator failures: callers usually degrade to "expression absent"
//! instead of aborting the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::errors::ScoreError;

/// File the quantifier writes its per-contig expression table to, relative
/// to its output directory.
pub const EXPRESSION_FILE: &str = "quant.sf";

/// Inputs that determine a quantifier invocation.
#[derive(Debug, Clone)]
pub struct QuantCommand {
    /// Read alignments against the assembly, BAM format
    pub alignments: PathBuf,
    /// The assembly the reads were aligned to
    pub targets: PathBuf,
    pub threads: usize,
}

impl QuantCommand {
    /// The full argument vector after the executable name.
    ///
    /// Deterministic given the inputs: unstranded paired library, alignment
    /// based quantification with read-compatibility accounting and fragment
    /// length estimation, per-sample and unaligned-read output, results in
    /// the process working directory.
    pub fn args(&self) -> Vec<String> {
        vec![
            "quant".to_string(),
            "--libtype".to_string(),
            "IU".to_string(),
            "--alignments".to_string(),
            self.alignments.display().to_string(),
            "--targets".to_string(),
            self.targets.display().to_string(),
            "--threads".to_string(),
            self.threads.to_string(),
            "--useReadCompat".to_string(),
            "--useFragLenDist".to_string(),
            "--sampleOut".to_string(),
            "--sampleUnaligned".to_string(),
            "--output".to_string(),
            ".".to_string(),
        ]
    }

    /// Build the process, rooted in `workdir` so `--output .` lands there.
    pub fn command(&self, exe: &Path, workdir: &Path) -> Command {
        let mut cmd = Command::new(exe);
        cmd.args(self.args()).current_dir(workdir);
        cmd
    }
}

/// Run the quantifier and return the path of the expression table it wrote.
pub fn run_quantifier(
    exe: &Path,
    cmd: &QuantCommand,
    outdir: &Path,
) -> Result<PathBuf, ScoreError> {
    fs::create_dir_all(outdir)?;
    info!(
        exe = %exe.display(),
        alignments = %cmd.alignments.display(),
        threads = cmd.threads,
        "running quantifier"
    );
    debug!(args = ?cmd.args(), "quantifier arguments");

    let output = cmd.command(exe, outdir).output().map_err(|e| {
        ScoreError::Quantifier(format!("failed to launch {}: {}", exe.display(), e))
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScoreError::Quantifier(format!(
            "{} exited with {}: {}",
            exe.display(),
            output.status,
            stderr.trim()
        )));
    }

    let table = outdir.join(EXPRESSION_FILE);
    if !table.is_file() {
        return Err(ScoreError::Quantifier(format!(
            "quantifier succeeded but wrote no {}",
            EXPRESSION_FILE
        )));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_follows_the_quantifier_contract() {
        let cmd = QuantCommand {
            alignments: PathBuf::from("alignments.bam"),
            targets: PathBuf::from("assembly.fa"),
            threads: 4,
        };
        let expected = [
            "quant",
            "--libtype",
            "IU",
            "--alignments",
            "alignments.bam",
            "--targets",
            "assembly.fa",
            "--threads",
            "4",
            "--useReadCompat",
            "--useFragLenDist",
            "--sampleOut",
            "--sampleUnaligned",
            "--output",
            ".",
        ];
        assert_eq!(cmd.args(), expected);
    }

    #[test]
    fn launch_failure_is_a_quantifier_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-quantifier");
        let cmd = QuantCommand {
            alignments: PathBuf::from("alignments.bam"),
            targets: PathBuf::from("assembly.fa"),
            threads: 1,
        };
        let err = run_quantifier(&missing, &cmd, dir.path()).unwrap_err();
        assert!(matches!(err, ScoreError::Quantifier(_)));
    }
}

//! In-memory model of an assembly: named contigs loaded once from FASTA.

use std::fs::File;
use std::io::{BufRead, BufReader, Result as IoResult};
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use flate2::read::MultiGzDecoder;

use crate::errors::ScoreError;

/// A single assembled contig. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Contig {
    pub id: String,
    pub sequence: String,
}

impl Contig {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// The full contig set produced by one assembly run.
///
/// Contigs are never removed; "good contig" status is a classification
/// layered on top by the cutoff search, not a mutation of this set.
#[derive(Debug)]
pub struct Assembly {
    pub name: String,
    pub path: PathBuf,
    contigs: Vec<Contig>,
}

impl Assembly {
    /// Load an assembly from a FASTA file (plain or gzipped).
    ///
    /// Sequences are uppercased; contig ids are the first whitespace-separated
    /// token of the header line. Duplicate ids are rejected.
    pub fn from_fasta(path: &Path) -> Result<Assembly, ScoreError> {
        let reader = open_text(path).map_err(|e| ScoreError::Fasta {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?;

        let mut contigs: Vec<Contig> = Vec::new();
        let mut seen: AHashSet<String> = AHashSet::new();
        let mut current_id: Option<String> = None;
        let mut current_seq = String::new();

        for line in reader.lines() {
            let line = line.map_err(ScoreError::Io)?;
            if let Some(header) = line.strip_prefix('>') {
                if let Some(id) = current_id.take() {
                    contigs.push(Contig {
                        id,
                        sequence: std::mem::take(&mut current_seq),
                    });
                }
                let id = header
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                if id.is_empty() {
                    return Err(ScoreError::Fasta {
                        path: path.display().to_string(),
                        msg: "empty contig name in FASTA header".to_string(),
                    });
                }
                if !seen.insert(id.clone()) {
                    return Err(ScoreError::Fasta {
                        path: path.display().to_string(),
                        msg: format!("duplicate contig name '{}'", id),
                    });
                }
                current_id = Some(id);
            } else if current_id.is_some() {
                current_seq.push_str(line.trim().to_ascii_uppercase().as_str());
            } else if !line.trim().is_empty() {
                return Err(ScoreError::Fasta {
                    path: path.display().to_string(),
                    msg: "sequence data before first FASTA header".to_string(),
                });
            }
        }
        if let Some(id) = current_id.take() {
            contigs.push(Contig {
                id,
                sequence: current_seq,
            });
        }

        if contigs.is_empty() {
            return Err(ScoreError::Fasta {
                path: path.display().to_string(),
                msg: "no contigs found".to_string(),
            });
        }

        Ok(Assembly {
            name: assembly_name(path),
            path: path.to_path_buf(),
            contigs,
        })
    }

    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

/// Open a text file for reading, handles gzipped files automatically.
pub fn open_text(path: &Path) -> IoResult<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Derive a short assembly name from its file name, dropping known
/// FASTA extensions.
pub(crate) fn assembly_name(path: &Path) -> String {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "assembly".to_string());
    for ext in [".gz", ".fasta", ".fa", ".fna"] {
        if let Some(stripped) = name.strip_suffix(ext) {
            name = stripped.to_string();
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_multi_line_records() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">contig_1 some description").unwrap();
        writeln!(file, "acgt").unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, ">contig_2").unwrap();
        writeln!(file, "TTTT").unwrap();

        let assembly = Assembly::from_fasta(file.path()).unwrap();
        assert_eq!(assembly.len(), 2);
        assert_eq!(assembly.contigs()[0].id, "contig_1");
        assert_eq!(assembly.contigs()[0].sequence, "ACGTACGT");
        assert_eq!(assembly.contigs()[1].sequence, "TTTT");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">c1").unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, ">c1").unwrap();
        writeln!(file, "GGGG").unwrap();

        let err = Assembly::from_fasta(file.path()).unwrap_err();
        assert!(matches!(err, ScoreError::Fasta { .. }));
    }

    #[test]
    fn rejects_empty_files() {
        let file = NamedTempFile::new().unwrap();
        let err = Assembly::from_fasta(file.path()).unwrap_err();
        assert!(matches!(err, ScoreError::Fasta { .. }));
    }

    #[test]
    fn strips_fasta_extensions_from_name() {
        assert_eq!(assembly_name(Path::new("/tmp/oases.fa")), "oases");
        assert_eq!(assembly_name(Path::new("trinity.fasta.gz")), "trinity");
    }
}

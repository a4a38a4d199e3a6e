//! Parsing of the quantifier's per-contig expression table.

use std::io::BufRead;
use std::path::Path;

use ahash::AHashMap;

use crate::assembly::open_text;
use crate::errors::ScoreError;

/// Expression evidence for one contig, as estimated by the quantifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionRecord {
    /// Contig length as the quantifier saw it, bases
    pub length: u64,
    /// Length correction for fragment-end effects, bases
    pub eff_length: u64,
    /// Estimated fragments assigned to the contig
    pub eff_count: u64,
    /// Transcripts per million, relative abundance
    pub tpm: f64,
}

/// Parse the expression table into a map keyed by contig name.
///
/// Tab-separated with one header line; columns: name, length, effective
/// length, TPM, effective count. Lengths and counts must be plain integers
/// and TPM a finite non-negative number; anything else is a table error
/// naming the offending line.
pub fn parse_expression_table(
    path: &Path,
) -> Result<AHashMap<String, ExpressionRecord>, ScoreError> {
    let reader = open_text(path)?;
    let display = path.display().to_string();
    let mut records = AHashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = index as u64 + 1;
        if lineno == 1 || line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 5 {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("expected 5 columns, found {}", fields.len()),
            });
        }
        let parse_int = |field: &str, what: &str| -> Result<u64, ScoreError> {
            field.parse::<u64>().map_err(|_| ScoreError::Table {
                path: display.clone(),
                line: lineno,
                msg: format!("{} '{}' is not a non-negative integer", what, field),
            })
        };
        let length = parse_int(fields[1], "length")?;
        let eff_length = parse_int(fields[2], "effective length")?;
        let eff_count = parse_int(fields[4], "effective count")?;
        let tpm: f64 = fields[3].parse().map_err(|_| ScoreError::Table {
            path: display.clone(),
            line: lineno,
            msg: format!("TPM '{}' is not a number", fields[3]),
        })?;
        if length == 0 {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("zero length for contig '{}'", fields[0]),
            });
        }
        if !tpm.is_finite() || tpm < 0.0 {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("TPM {} out of range", tpm),
            });
        }
        let record = ExpressionRecord {
            length,
            eff_length,
            eff_count,
            tpm,
        };
        if records.insert(fields[0].to_string(), record).is_some() {
            return Err(ScoreError::Table {
                path: display,
                line: lineno,
                msg: format!("duplicate row for contig '{}'", fields[0]),
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Name\tLength\tEffectiveLength\tTPM\tNumReads";

    fn write_table(rows: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn parses_every_row_and_reproduces_exact_values() {
        let mut rows: Vec<String> = (0..17)
            .map(|i| format!("contig_{}\t{}\t{}\t{:.3}\t{}", i, 500 + i, 420 + i, 1.5, 30 + i))
            .collect();
        rows.push("contig_17\t1100\t1016\t549.279\t20690".to_string());
        let file = write_table(&rows);

        let records = parse_expression_table(file.path()).unwrap();
        assert_eq!(records.len(), 18);

        let rec = &records["contig_17"];
        assert_eq!(rec.eff_length, 1016);
        assert_eq!(rec.eff_count, 20690);
        assert_eq!(rec.tpm, 549.279);
    }

    #[test]
    fn rejects_fractional_counts() {
        let file = write_table(&["c1\t100\t90.5\t1.0\t10".to_string()]);
        assert!(matches!(
            parse_expression_table(file.path()),
            Err(ScoreError::Table { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_tpm() {
        let file = write_table(&["c1\t100\t90\t-3.0\t10".to_string()]);
        let err = parse_expression_table(file.path()).unwrap_err();
        match err {
            ScoreError::Table { msg, .. } => assert!(msg.contains("TPM")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_contigs_are_simply_absent() {
        let file = write_table(&["c1\t100\t90\t1.0\t10".to_string()]);
        let records = parse_expression_table(file.path()).unwrap();
        assert!(records.get("c2").is_none());
    }
}

//! Convert command implementation
//!
//! Encodes a Joe & Kuo text table into the packed binary format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use qrng_quasi::sobol::convert_text_to_packed;
use tracing::info;

use crate::error::require_file;
use crate::Result;

/// Run the convert command, returning the number of rows written
pub fn run(input: &Path, output: &Path) -> Result<usize> {
    info!("Converting direction table...");
    info!("  Input: {}", input.display());
    info!("  Output: {}", output.display());

    require_file(input)?;
    let reader = BufReader::new(File::open(input)?);

    // Nothing reaches `output` unless the whole table encodes.
    let mut packed = Vec::new();
    let rows = convert_text_to_packed(reader, &mut packed)?;

    let mut writer = BufWriter::new(File::create(output)?);
    writer.write_all(&packed)?;
    writer.flush()?;

    info!(rows, bytes = packed.len(), "Conversion complete");
    Ok(rows)
}

/// One-line report of a finished conversion.
///
/// Dimension 1 is implicit and never stored, so `rows` rows cover
/// dimensions 2 to `rows + 1`.
pub fn summary(rows: usize, output: &Path) -> String {
    match rows {
        0 => format!("Wrote 0 rows to {}", output.display()),
        _ => format!(
            "Wrote {} rows (dimensions 2 to {}) to {}",
            rows,
            rows + 1,
            output.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use qrng_quasi::sobol::{
        DirectionNumbers, PackedDirectionNumbers, TextDirectionNumbers, BUNDLED_MAX_DIMENSION,
        BUNDLED_TABLE, BUNDLED_TABLE_TEXT,
    };

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("qrng-convert-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_convert_bundled_text() {
        let input = scratch("table.txt");
        let output = scratch("table.bin");
        std::fs::write(&input, BUNDLED_TABLE_TEXT).unwrap();

        let rows = run(&input, &output).unwrap();
        let written = std::fs::read(&output).unwrap();
        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();

        assert_eq!(rows, 39);
        if BUNDLED_MAX_DIMENSION == rows + 1 {
            assert_eq!(written, BUNDLED_TABLE);
        }
        let converted = PackedDirectionNumbers::from_reader(written.as_slice(), 40).unwrap();
        let text = TextDirectionNumbers::from_text(BUNDLED_TABLE_TEXT, 40).unwrap();
        for d in 1..=40 {
            assert_eq!(
                converted.for_dimension(d).unwrap(),
                text.for_dimension(d).unwrap()
            );
        }
    }

    #[test]
    fn test_summary_counts_written_rows() {
        let out = Path::new("table.bin");
        assert_eq!(
            summary(39, out),
            "Wrote 39 rows (dimensions 2 to 40) to table.bin"
        );
        assert_eq!(summary(0, out), "Wrote 0 rows to table.bin");
    }

    #[test]
    fn test_missing_input() {
        let err = run(Path::new("/nonexistent/table.txt"), &scratch("never.bin")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_invalid_table_writes_nothing() {
        let input = scratch("gap.txt");
        let output = scratch("gap.bin");
        std::fs::write(&input, "2 1 0 1\n4 2 1 1 3\n").unwrap();

        let err = run(&input, &output).unwrap_err();
        std::fs::remove_file(&input).unwrap();

        assert!(matches!(err, CliError::Sequence(ref e) if e.is_invalid_argument()));
        assert!(!output.exists());
    }
}

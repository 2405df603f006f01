//! Dump command implementation
//!
//! Decodes a packed direction table and prints it in the text format, so
//! `qrng dump` output can be fed back to `qrng convert`.

use std::io::Write;
use std::path::Path;

use qrng_quasi::sobol::{read_varint, PackedTableReader};
use tracing::info;

use crate::error::require_file;
use crate::Result;

/// Run the dump command against a file, printing to stdout
pub fn run(input: &Path, max_dimension: Option<usize>) -> Result<()> {
    require_file(input)?;
    let bytes = std::fs::read(input)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dump_table(&bytes, max_dimension, &mut out)?;
    Ok(())
}

/// Writes rows of the packed table in `bytes` as text
///
/// Without `max_dimension`, every dimension the table declares is written.
/// Returns the number of rows written.
pub fn dump_table<W: Write>(
    bytes: &[u8],
    max_dimension: Option<usize>,
    out: &mut W,
) -> Result<usize> {
    let declared = read_varint(&mut &bytes[..])? as usize;
    let max_dimension = max_dimension.unwrap_or(declared);
    info!(declared, max_dimension, "Dumping direction table");

    writeln!(out, "d\ts\ta\tm_i")?;
    let mut count = 0;
    for row in PackedTableReader::new(bytes).rows(max_dimension)? {
        let row = row?;
        let initial: Vec<String> = row.initial.iter().map(u32::to_string).collect();
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            row.dimension,
            row.degree,
            row.coefficient,
            initial.join(" ")
        )?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use qrng_quasi::sobol::{
        read_text_table, BUNDLED_MAX_DIMENSION, BUNDLED_TABLE, BUNDLED_TABLE_TEXT,
    };

    #[test]
    fn test_dump_round_trips_through_text() {
        let mut out = Vec::new();
        let count = dump_table(BUNDLED_TABLE, None, &mut out).unwrap();
        assert_eq!(count, BUNDLED_MAX_DIMENSION - 1);

        let dumped = read_text_table(out.as_slice()).unwrap();
        let original = read_text_table(BUNDLED_TABLE_TEXT.as_bytes()).unwrap();
        assert_eq!(dumped[..original.len()], original[..]);
    }

    #[test]
    fn test_dump_prefix() {
        let mut out = Vec::new();
        dump_table(BUNDLED_TABLE, Some(3), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "d\ts\ta\tm_i\n2\t1\t0\t1\n3\t2\t1\t1 3\n");
    }

    #[test]
    fn test_dump_beyond_table() {
        let err = dump_table(BUNDLED_TABLE, Some(BUNDLED_MAX_DIMENSION + 1), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Sequence(ref e) if e.is_invalid_state()));
    }

    #[test]
    fn test_dump_empty_input() {
        let err = dump_table(&[], None, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Sequence(_)));
    }
}

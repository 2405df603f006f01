//! Joe & Kuo text direction tables.
//!
//! The upstream format is one whitespace-delimited row per dimension:
//!
//! ```text
//! d       s       a       m_i
//! 2       1       0       1
//! 3       2       1       1 3
//! ```
//!
//! Lines starting with `d` are headers and skipped. A blank line ends the
//! table early.

use std::io::BufRead;

use qrng_core::SequenceError;

use super::table::DimensionRow;

/// Lazy iterator over the rows of a text table; see [`parse_text_rows`].
#[derive(Debug)]
pub struct TextRows<I> {
    lines: I,
    line_number: usize,
    finished: bool,
}

/// Parses text table lines into rows, lazily.
///
/// Rows are returned as written; sequencing and `len(m) == s` are checked by
/// the consumers that need them ([`encode_rows`](super::encode_rows),
/// [`TextDirectionNumbers`](super::TextDirectionNumbers)).
///
/// # Examples
///
/// ```rust
/// use qrng_quasi::sobol::{parse_text_rows, DimensionRow};
///
/// let text = "d s a m_i\n2 1 0 1\n3 2 1 1 3\n\n4 3 1 1 3 1\n";
/// let rows: Vec<DimensionRow> = parse_text_rows(text.lines())
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// // The blank line stops parsing before dimension 4.
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1], DimensionRow::new(3, 2, 1, vec![1, 3]));
/// ```
pub fn parse_text_rows<I, S>(lines: I) -> TextRows<I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TextRows {
        lines: lines.into_iter(),
        line_number: 0,
        finished: false,
    }
}

/// Reads a whole text table from `reader`.
///
/// # Errors
///
/// [`SequenceError::Io`] on read failure, [`SequenceError::Parse`] on a
/// malformed line.
pub fn read_text_table<R: BufRead>(reader: R) -> Result<Vec<DimensionRow>, SequenceError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let blank = line.trim().is_empty();
        lines.push(line);
        if blank {
            break;
        }
    }
    parse_text_rows(lines).collect()
}

impl<I, S> Iterator for TextRows<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<DimensionRow, SequenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(line) = self.lines.next() else {
                self.finished = true;
                return None;
            };
            self.line_number += 1;
            let line = line.as_ref();

            if line.starts_with('d') {
                continue;
            }
            if line.trim().is_empty() {
                self.finished = true;
                return None;
            }

            let parsed = parse_line(line, self.line_number);
            if parsed.is_err() {
                self.finished = true;
            }
            return Some(parsed);
        }
    }
}

fn parse_line(line: &str, line_number: usize) -> Result<DimensionRow, SequenceError> {
    let mut fields = line.split_whitespace();
    let mut next_field = |name: &str| {
        fields.next().ok_or_else(|| SequenceError::Parse {
            line: line_number,
            message: format!("missing field '{}'", name),
        })
    };

    let dimension = parse_number(next_field("d")?, "d", line_number)?;
    let degree = parse_number(next_field("s")?, "s", line_number)?;
    let coefficient = parse_number(next_field("a")?, "a", line_number)?;
    let initial = fields
        .map(|field| parse_number(field, "m", line_number))
        .collect::<Result<Vec<u32>, _>>()?;

    Ok(DimensionRow {
        dimension,
        degree,
        coefficient,
        initial,
    })
}

fn parse_number<T: std::str::FromStr>(
    field: &str,
    name: &str,
    line_number: usize,
) -> Result<T, SequenceError>
where
    T::Err: std::fmt::Display,
{
    field.parse().map_err(|e| SequenceError::Parse {
        line: line_number,
        message: format!("field '{}' = {:?}: {}", name, field, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_header_and_stops_at_blank() {
        let lines = ["d s a m_i", "2 1 0 1", "   ", "3 2 1 1 3"];
        let rows: Vec<_> = parse_text_rows(lines).collect::<Result<_, _>>().unwrap();
        assert_eq!(rows, vec![DimensionRow::new(2, 1, 0, vec![1])]);
    }

    #[test]
    fn test_tabs_and_trailing_spaces() {
        let rows: Vec<_> = parse_text_rows(["14\t6\t1\t1 3 3 9 7 49 "])
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows[0], DimensionRow::new(14, 6, 1, vec![1, 3, 3, 9, 7, 49]));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let lines = ["d s a m_i", "2 1 0 1", "3 2 x 1 3"];
        let result: Result<Vec<_>, _> = parse_text_rows(lines).collect();
        match result {
            Err(SequenceError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("'a'"), "{}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields() {
        let mut rows = parse_text_rows(["2 1"]);
        assert!(matches!(rows.next(), Some(Err(SequenceError::Parse { line: 1, .. }))));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_read_text_table_from_reader() {
        let text = "d s a m_i\n2 1 0 1\n3 2 1 1 3\n";
        let rows = read_text_table(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].initial, vec![1]);
    }
}

//! Line-oriented input helpers shared by the topology and address loaders.

use std::io::BufRead;

/// Errors raised while parsing a single input line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("line {line}: expected 4 whitespace-separated fields, found {found}")]
    LinkFields { line: usize, found: usize },

    #[error("line {line}: expected 3 comma-separated fields, found {found}")]
    AddressFields { line: usize, found: usize },

    #[error("line {line}: empty field in address record")]
    EmptyAddressField { line: usize },
}

impl LineError {
    /// Attach a physical line number to an error parsed without one.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::LinkFields { found, .. } => Self::LinkFields { line, found },
            Self::AddressFields { found, .. } => Self::AddressFields { line, found },
            Self::EmptyAddressField { .. } => Self::EmptyAddressField { line },
        }
    }
}

/// A loaded input together with the lines that had to be skipped.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub skipped: Vec<LineError>,
}

/// A non-blank input line with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    pub text: String,
}

/// Read every non-blank line from `reader`, trimmed of surrounding whitespace.
///
/// Blank and whitespace-only lines are dropped but still advance the line
/// counter, so diagnostics point at the physical line in the file.
pub fn non_blank_lines<R: BufRead>(reader: R) -> std::io::Result<Vec<NumberedLine>> {
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        lines.push(NumberedLine {
            number: index + 1,
            text: trimmed.to_string(),
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_blank_lines_are_skipped_but_counted() {
        let input = "first\n\n   \n  second  \r\nthird";
        let lines = non_blank_lines(Cursor::new(input)).unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], NumberedLine { number: 1, text: "first".to_string() });
        assert_eq!(lines[1], NumberedLine { number: 4, text: "second".to_string() });
        assert_eq!(lines[2].number, 5);
    }

    #[test]
    fn test_empty_input() {
        let lines = non_blank_lines(Cursor::new("")).unwrap();
        assert!(lines.is_empty());
    }
}

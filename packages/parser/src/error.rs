use crate::ast::Position;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected character '{found}' at {line}:{column}: expected {expected}")]
    UnexpectedChar {
        line: usize,
        column: usize,
        offset: usize,
        found: char,
        expected: String,
    },

    #[error("Unexpected end of file at {line}:{column}")]
    UnexpectedEof {
        line: usize,
        column: usize,
        offset: usize,
    },

    #[error("Mismatched closing tag at {line}:{column}: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        line: usize,
        column: usize,
        offset: usize,
        expected: String,
        found: String,
    },
}

impl ParseError {
    pub fn unexpected_char(
        source: &str,
        offset: usize,
        found: char,
        expected: impl Into<String>,
    ) -> Self {
        let Position { line, column } = Position::from_offset(source, offset);
        Self::UnexpectedChar {
            line,
            column,
            offset,
            found,
            expected: expected.into(),
        }
    }

    pub fn unexpected_eof(source: &str, offset: usize) -> Self {
        let Position { line, column } = Position::from_offset(source, offset);
        Self::UnexpectedEof {
            line,
            column,
            offset,
        }
    }

    pub fn mismatched_closing_tag(
        source: &str,
        offset: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        let Position { line, column } = Position::from_offset(source, offset);
        Self::MismatchedClosingTag {
            line,
            column,
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedChar { offset, .. }
            | Self::UnexpectedEof { offset, .. }
            | Self::MismatchedClosingTag { offset, .. } => *offset,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::UnexpectedChar { line, column, .. }
            | Self::UnexpectedEof { line, column, .. }
            | Self::MismatchedClosingTag { line, column, .. } => Position {
                line: *line,
                column: *column,
            },
        }
    }

    /// Render a labeled source report for terminal display.
    #[cfg(feature = "pretty-errors")]
    pub fn report(&self, path: &str, source: &str) -> String {
        use ariadne::{Label, Report, ReportKind, Source};

        let offset = self.offset().min(source.len().saturating_sub(1));
        let mut buffer = Vec::new();
        let result = Report::build(ReportKind::Error, path, offset)
            .with_message(self.to_string())
            .with_label(Label::new((path, offset..offset + 1)).with_message("here"))
            .finish()
            .write((path, Source::from(source)), &mut buffer);

        match result {
            Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

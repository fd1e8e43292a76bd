use std::fmt;

use thiserror::Error;

/// Why a parser passed on a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The content is not in the parser's format.
    Mismatch(String),
    /// The format was recognised but held no rows.
    Empty,
}

/// One parser's verdict, kept so a rejected export can explain itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserAttempt {
    pub parser: &'static str,
    pub outcome: AttemptOutcome,
}

impl ParserAttempt {
    pub fn mismatch(parser: &'static str, reason: impl Into<String>) -> Self {
        Self {
            parser,
            outcome: AttemptOutcome::Mismatch(reason.into()),
        }
    }

    pub fn empty(parser: &'static str) -> Self {
        Self {
            parser,
            outcome: AttemptOutcome::Empty,
        }
    }

    pub fn is_empty_table(&self) -> bool {
        self.outcome == AttemptOutcome::Empty
    }
}

impl fmt::Display for ParserAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Mismatch(reason) => write!(f, "{} skipped ({reason})", self.parser),
            AttemptOutcome::Empty => write!(f, "{} found no rows", self.parser),
        }
    }
}

fn describe_attempts(attempts: &[ParserAttempt]) -> String {
    attempts
        .iter()
        .map(ParserAttempt::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser} format mismatch: {reason}")]
    FormatMismatch {
        parser: &'static str,
        reason: String,
    },

    #[error("content is not valid {encoding}")]
    Decode { encoding: &'static str },

    #[error("declared encoding '{label}' is not supported")]
    UnsupportedEncoding { label: String },

    #[error("{parser} XML error at byte {position}: {source}")]
    Xml {
        parser: &'static str,
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("{parser} CSV error: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} file did not contain any rows")]
    EmptyTable { parser: &'static str },

    #[error("no parser recognized this file: {}", describe_attempts(.attempts))]
    NoMatchingParser { attempts: Vec<ParserAttempt> },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser} required column '{column}' missing from header")]
    MissingColumn {
        parser: &'static str,
        column: &'static str,
    },

    #[error("{parser} file did not contain a header row")]
    EmptyFile { parser: &'static str },

    #[error("{parser} CSV error: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} I/O error on '{path}': {source}")]
    Io {
        parser: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ParserError {
    pub(crate) fn csv(parser: &'static str, source: csv::Error) -> Self {
        ParserError::Csv { parser, source }
    }
}

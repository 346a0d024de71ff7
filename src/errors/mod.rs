use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    // Document is neither well-formed XML nor valid JSON
    #[error("Unrecognized feed document: {0}")]
    Format(String),

    // A field the detected format requires is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    // A required date field is present but not parseable
    #[error("Invalid date: {0}")]
    DateFormat(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

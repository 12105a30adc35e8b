use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML/JSON parse or deserialization error for saved report state.
    ConfigParse(String),
    /// Invalid grouping or filter configuration (duplicate dimension,
    /// date without granularity, malformed bound). Caller error, fail fast.
    ConfigValidation(String),
    /// A date value that does not parse as a calendar date.
    InvalidDate(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidDate(value) => write!(f, "cannot parse date '{value}'"),
        }
    }
}

impl std::error::Error for EngineError {}

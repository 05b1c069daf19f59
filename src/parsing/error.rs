use thiserror::Error;

pub type PResult<T> = Result<T, ParsingError>;

#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("Nom parsing error: {0}")]
    ParseError(#[from] nom::Err<nom::error::Error<String>>),
    #[error("Missing numeric label")]
    MissingLabel,
    #[error("Missing passenger name")]
    MissingName,
    #[error("Unable to build time {0:02}:{1:02}")]
    UnableToBuildTime(u32, u32),
    #[error("Hour {0} is not on a 12-hour clock")]
    InvalidHour(u32),
    #[error("Capacity must be a non-negative integer, got \"{0}\"")]
    InvalidCapacity(String),
}

impl From<nom::Err<nom::error::Error<&str>>> for ParsingError {
    fn from(value: nom::Err<nom::error::Error<&str>>) -> Self {
        ParsingError::ParseError(value.map_input(String::from))
    }
}

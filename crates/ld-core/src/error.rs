use thiserror::Error;

pub type LdResult<T> = Result<T, LdError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LdError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Station number out of range: {number} (expected 1..={max})")]
    StationOutOfRange { number: u32, max: u32 },

    #[error("Unknown station: {number}")]
    UnknownStation { number: u32 },

    #[error("Duplicate station: {number}")]
    DuplicateStation { number: u32 },
}

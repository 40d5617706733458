use std::io;
use thiserror::Error as ThisError;

/// Custom error implementation that describes possible
/// error states.
///
/// This is shared by a whole crate.
#[derive(ThisError, Debug)]
pub enum Error {
    /// A raw type name that no registered type or pattern matches
    #[error("Type \"{0}\" could not be matched")]
    UnknownType(String),

    /// A raw interface entry that is missing required shape
    #[error("Malformed interface entry: {0}")]
    MalformedSpec(String),

    /// A supplied value failed validation for the named field
    #[error("Validation for field \"{field}\" failed: {reason}")]
    Validation { field: String, reason: String },

    /// The bare expectation of a type, before a field name is attached
    #[error("{0}")]
    InvalidValue(String),

    /// An inbound event record whose signature hash matches no known signature
    #[error("Event signature \"{0}\" could not be matched")]
    SignatureMatch(String),

    #[error("Cannot send a value to a non-payable function")]
    Payability,

    #[error("Method \"{name}\" has several overloads, call one of {signatures:?} explicitly")]
    AmbiguousOverload {
        name: String,
        signatures: Vec<String>,
    },

    #[error("No overload with signature \"{0}\"")]
    UnknownOverload(String),

    #[error("Unable to get contract data: provide contractData or loader")]
    MissingContractData,

    #[error("{0}")]
    Loader(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps any error raised while validating `field` into a
    /// [`Error::Validation`] naming it.
    pub(crate) fn for_field(field: &str, err: Error) -> Error {
        Error::Validation {
            field: field.to_string(),
            reason: err.to_string(),
        }
    }
}

#[test]
fn validation_message() {
    let err = Error::for_field("isTrue", Error::InvalidValue("Must be a boolean".into()));
    assert_eq!(
        err.to_string(),
        "Validation for field \"isTrue\" failed: Must be a boolean"
    );
}

#[test]
fn unknown_type_message() {
    let err = Error::UnknownType("an invalid type".into());
    assert_eq!(err.to_string(), "Type \"an invalid type\" could not be matched");
}

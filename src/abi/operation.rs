use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};
use std::fmt;

/// Deserializes "type" value from the ABI JSON spec
///
/// https://docs.soliditylang.org/en/latest/abi-spec.html#json
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Entries without a "type" are functions
    #[default]
    Function,
    Constructor,
    Event,
    Fallback,
    Receive,
    Error,
}

impl Operation {
    /// Entries that never produce a method, constant or event.
    pub fn is_skipped(self) -> bool {
        matches!(
            self,
            Operation::Constructor | Operation::Fallback | Operation::Receive | Operation::Error
        )
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(OperationVisitor)
    }
}

struct OperationVisitor;

impl<'de> Visitor<'de> for OperationVisitor {
    type Value = Operation;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "one of function, constructor, event, fallback, receive or error"
        )
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match s {
            "function" => Ok(Operation::Function),
            "constructor" => Ok(Operation::Constructor),
            "event" => Ok(Operation::Event),
            "fallback" => Ok(Operation::Fallback),
            "receive" => Ok(Operation::Receive),
            "error" => Ok(Operation::Error),
            _ => Err(de::Error::invalid_value(Unexpected::Str(s), &self)),
        }
    }
}

#[test]
fn deserialize_function() {
    let data = r#""function""#;
    let op: Operation = serde_json::from_str(data).expect("Unable to parse");
    assert_eq!(op, Operation::Function);
    assert!(!op.is_skipped());
}

#[test]
fn deserialize_event() {
    let data = r#""event""#;
    let op: Operation = serde_json::from_str(data).expect("Unable to parse");
    assert_eq!(op, Operation::Event);
}

#[test]
fn deserialize_skipped_kinds() {
    for data in [r#""constructor""#, r#""fallback""#, r#""receive""#, r#""error""#] {
        let op: Operation = serde_json::from_str(data).expect("Unable to parse");
        assert!(op.is_skipped(), "{data} should be skipped");
    }
}

#[test]
#[should_panic]
fn deserialize_unknown_string() {
    let data = r#""asdf""#;
    let _op: Operation = serde_json::from_str(data).expect("Unable to parse");
}

#[test]
#[should_panic]
fn deserialize_unknown_type() {
    let data = r#"42"#;
    let _op: Operation = serde_json::from_str(data).expect("Unable to parse");
}

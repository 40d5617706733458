use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutability {
    /// Specified to not read blockchain state
    Pure,
    /// Specified to not modify the blockchain state
    View,
    /// Function does not accept ether
    Nonpayable,
    /// Function accepts ether
    Payable,
}

impl StateMutability {
    /// Read-only functions are invoked as calls, never as transactions.
    pub fn is_read_only(self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }
}

impl<'de> Deserialize<'de> for StateMutability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(StateMutabilityVisitor)
    }
}

struct StateMutabilityVisitor;

impl<'de> Visitor<'de> for StateMutabilityVisitor {
    type Value = StateMutability;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "one of pure, view, nonpayable or payable")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match s {
            "pure" => Ok(StateMutability::Pure),
            "view" => Ok(StateMutability::View),
            "nonpayable" => Ok(StateMutability::Nonpayable),
            "payable" => Ok(StateMutability::Payable),
            _ => Err(de::Error::invalid_value(Unexpected::Str(s), &self)),
        }
    }
}

#[test]
fn deserialize_read_only() {
    let pure: StateMutability = serde_json::from_str(r#""pure""#).expect("Unable to parse");
    let view: StateMutability = serde_json::from_str(r#""view""#).expect("Unable to parse");
    assert_eq!(pure, StateMutability::Pure);
    assert_eq!(view, StateMutability::View);
    assert!(pure.is_read_only());
    assert!(view.is_read_only());
}

#[test]
fn deserialize_mutating() {
    let state: StateMutability =
        serde_json::from_str(r#""nonpayable""#).expect("Unable to parse");
    assert_eq!(state, StateMutability::Nonpayable);
    assert!(!state.is_read_only());
    let state: StateMutability = serde_json::from_str(r#""payable""#).expect("Unable to parse");
    assert_eq!(state, StateMutability::Payable);
}

#[test]
#[should_panic]
fn deserialize_wrong_type() {
    let data = r#"123"#;
    let _state: StateMutability = serde_json::from_str(data).expect("Unable to parse");
}

#[test]
#[should_panic]
fn deserialize_wrong_value() {
    let data = r#""unknown""#;
    let _state: StateMutability = serde_json::from_str(data).expect("Unable to parse");
}

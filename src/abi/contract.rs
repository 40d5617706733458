use crate::abi::item::AbiItem;
use crate::error::Error;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::io;

/// An ordered raw interface description: every entry of an ABI JSON array,
/// in source order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Abi {
    pub items: Vec<AbiItem>,
}

impl Abi {
    pub fn new(items: Vec<AbiItem>) -> Abi {
        Abi { items }
    }

    /// Reads an ABI JSON array. Anything that isn't an array of well formed
    /// entries is reported as [`Error::MalformedSpec`].
    pub fn load<T: io::Read>(reader: T) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(|e| Error::MalformedSpec(e.to_string()))
    }

    pub fn from_value(value: Value) -> Result<Self, Error> {
        serde_json::from_value(value).map_err(|e| Error::MalformedSpec(e.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbiItem> {
        self.items.iter()
    }
}

impl<'de> Deserialize<'de> for Abi {
    fn deserialize<D>(deserializer: D) -> Result<Abi, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(AbiVisitor)
    }
}

struct AbiVisitor;

impl<'a> Visitor<'a> for AbiVisitor {
    type Value = Abi;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of abi entries")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'a>,
    {
        let mut result = Abi {
            items: Vec::with_capacity(seq.size_hint().unwrap_or(0)),
        };
        while let Some(item) = seq.next_element()? {
            result.items.push(item)
        }

        Ok(result)
    }
}

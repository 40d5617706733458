//! Serializable contract options, the JSON counterpart of the
//! [`ContractBuilder`](crate::contract::ContractBuilder) setters.
//!
//! ```json
//! {
//!     "parser": "truffle",
//!     "loader": { "name": "truffle", "options": { "directory": "build/contracts" } },
//!     "query": { "contractName": "MetaCoin", "networkId": "5777" }
//! }
//! ```

use crate::error::Error;
use crate::loader::{ContractData, FsLoader, Loader, Query, TruffleLoader};
use crate::parser::{AbiParser, Parser, TruffleParser};
use crate::registry::TypeRegistry;
use std::io;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    Abi,
    Truffle,
}

impl ParserKind {
    pub fn build(self, registry: Option<TypeRegistry>) -> Box<dyn Parser> {
        match (self, registry) {
            (ParserKind::Abi, None) => Box::new(AbiParser::new()),
            (ParserKind::Abi, Some(registry)) => Box::new(AbiParser::with_registry(registry)),
            (ParserKind::Truffle, None) => Box::new(TruffleParser::new()),
            (ParserKind::Truffle, Some(registry)) => {
                Box::new(TruffleParser::with_registry(registry))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    Fs,
    Truffle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    #[serde(default)]
    pub directory: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub name: LoaderKind,
    #[serde(default)]
    pub options: LoaderOptions,
}

impl LoaderConfig {
    pub fn build(&self) -> Result<Box<dyn Loader>, Error> {
        let loader: Box<dyn Loader> = match self.name {
            LoaderKind::Fs => Box::new(FsLoader::new(&self.options.directory)?),
            LoaderKind::Truffle => Box::new(TruffleLoader::new(&self.options.directory)?),
        };
        Ok(loader)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContractOptions {
    #[serde(default)]
    pub parser: ParserKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<LoaderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_data: Option<ContractData>,
}

impl ContractOptions {
    pub fn load<T: io::Read>(reader: T) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_options() {
        let options = ContractOptions::from_json(
            r#"{
                "parser": "truffle",
                "loader": {"name": "truffle", "options": {"directory": "build/contracts"}},
                "query": {"contractName": "MetaCoin"}
            }"#,
        )
        .unwrap();
        assert_eq!(options.parser, ParserKind::Truffle);
        let loader = options.loader.unwrap();
        assert_eq!(loader.name, LoaderKind::Truffle);
        assert_eq!(loader.options.directory, PathBuf::from("build/contracts"));
        assert_eq!(loader.build().unwrap().name(), "truffle");
        assert_eq!(options.query.unwrap().contract_name, "MetaCoin");
        assert!(options.contract_data.is_none());
    }

    #[test]
    fn defaults() {
        let options = ContractOptions::from_json("{}").unwrap();
        assert_eq!(options.parser, ParserKind::Abi);
        assert_eq!(options.parser.build(None).name(), "abi");
        assert!(options.loader.is_none());
    }

    #[test]
    fn loader_needs_directory() {
        let config: LoaderConfig = serde_json::from_str(r#"{"name": "fs"}"#).unwrap();
        let err = config.build().err().unwrap();
        assert_eq!(err.to_string(), "A \"directory\" option must be provided");
    }

    #[test]
    fn reject_unknown_parser() {
        assert!(ContractOptions::from_json(r#"{"parser": "etherscan"}"#).is_err());
    }
}

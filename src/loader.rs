//! Loaders fetch the raw contract data a parser consumes.

use crate::error::Error;
use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Everything a parser may need about one contract.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContractData {
    /// The raw ABI array, validated by the parser
    pub abi: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode: Option<String>,
    /// Truffle style deployments, network id to `{ "address": ... }`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Map<String, Value>>,
}

impl ContractData {
    pub fn from_abi(abi: Value) -> ContractData {
        ContractData {
            abi,
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: &str) -> ContractData {
        self.address = Some(address.to_string());
        self
    }

    /// The address deployed on `network_id`, else the one of the network
    /// listed last.
    pub fn network_address(&self, network_id: Option<&str>) -> Option<String> {
        let networks = self.networks.as_ref()?;
        let network = match network_id {
            Some(id) => networks.get(id),
            None => networks.values().last(),
        }?;
        network
            .get("address")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Which contract to load.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub contract_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

impl Query {
    pub fn new(contract_name: &str) -> Query {
        Query {
            contract_name: contract_name.to_string(),
            ..Default::default()
        }
    }
}

pub trait Loader: Send + Sync {
    fn name(&self) -> &'static str;

    fn load(&self, query: &Query) -> Result<ContractData, Error>;
}

/// Turns the JSON found on disk into contract data.
pub type Transform = fn(Value, &Query) -> Result<ContractData, Error>;

/// Reads `<directory>/<contractName>.json`.
#[derive(Clone)]
pub struct FsLoader {
    directory: PathBuf,
    transform: Transform,
}

impl fmt::Debug for FsLoader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FsLoader")
            .field("directory", &self.directory)
            .finish()
    }
}

impl FsLoader {
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<FsLoader, Error> {
        FsLoader::with_transform(directory, transform_plain)
    }

    pub fn with_transform<P: AsRef<Path>>(
        directory: P,
        transform: Transform,
    ) -> Result<FsLoader, Error> {
        let directory = directory.as_ref();
        if directory.as_os_str().is_empty() {
            return Err(Error::Loader(
                "A \"directory\" option must be provided".to_string(),
            ));
        }
        Ok(FsLoader {
            directory: directory.to_path_buf(),
            transform,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn read(&self, query: &Query) -> Result<Value, Error> {
        let path = self
            .directory
            .join(format!("{}.json", query.contract_name));
        trace!("Loading contract data from {}", path.display());
        let file = File::open(&path).map_err(|e| {
            Error::Loader(format!("Unable to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl Loader for FsLoader {
    fn name(&self) -> &'static str {
        "fs"
    }

    fn load(&self, query: &Query) -> Result<ContractData, Error> {
        let raw = self.read(query)?;
        let mut data = (self.transform)(raw, query)?;
        if let Some(address) = &query.contract_address {
            data.address = Some(address.clone());
        }
        Ok(data)
    }
}

/// Loads truffle build artifacts out of a `build/contracts` directory.
#[derive(Debug, Clone)]
pub struct TruffleLoader {
    inner: FsLoader,
}

impl TruffleLoader {
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<TruffleLoader, Error> {
        Ok(TruffleLoader {
            inner: FsLoader::with_transform(directory, transform_truffle_artifact)?,
        })
    }
}

impl Loader for TruffleLoader {
    fn name(&self) -> &'static str {
        "truffle"
    }

    fn load(&self, query: &Query) -> Result<ContractData, Error> {
        self.inner.load(query)
    }
}

/// The file already holds contract data, or is a bare ABI array.
fn transform_plain(raw: Value, _query: &Query) -> Result<ContractData, Error> {
    match raw {
        abi @ Value::Array(_) => Ok(ContractData::from_abi(abi)),
        other => Ok(serde_json::from_value(other)?),
    }
}

pub(crate) fn transform_truffle_artifact(
    raw: Value,
    query: &Query,
) -> Result<ContractData, Error> {
    let mut data: ContractData = serde_json::from_value(raw)?;
    if let Some(address) = data.network_address(query.network_id.as_deref()) {
        data.address = Some(address);
    }
    Ok(data)
}

//! Turns raw contract data into a [`ContractInterface`].

use crate::abi::{Abi, AbiItem, Operation, RawParam};
use crate::error::Error;
use crate::loader::ContractData;
use crate::registry::{field_name, TypeRegistry, DEFAULT_REGISTRY};
use crate::spec::{ContractInterface, EventSpec, FunctionSpec, ParamSpec};

pub trait Parser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Either the whole interface or the first error, never a partial one.
    fn parse(&self, data: &ContractData) -> Result<ContractInterface, Error>;
}

/// Parses a plain JSON ABI.
#[derive(Debug, Clone, Default)]
pub struct AbiParser {
    registry: Option<TypeRegistry>,
}

impl AbiParser {
    pub fn new() -> AbiParser {
        AbiParser::default()
    }

    /// Resolves types through `registry` instead of the default one.
    pub fn with_registry(registry: TypeRegistry) -> AbiParser {
        AbiParser {
            registry: Some(registry),
        }
    }

    fn registry(&self) -> &TypeRegistry {
        self.registry.as_ref().unwrap_or(&*DEFAULT_REGISTRY)
    }

    /// Walks the entries in source order. Entries sharing a name are kept
    /// side by side as overloads.
    pub fn parse_abi(&self, abi: &Abi) -> Result<ContractInterface, Error> {
        let mut interface = ContractInterface::default();
        for item in abi.iter() {
            if item.operation.is_skipped() {
                debug!(
                    "Skipping {:?} entry {}",
                    item.operation,
                    item.name.as_deref().unwrap_or("")
                );
                continue;
            }
            match item.operation {
                Operation::Event => {
                    let spec = self.parse_event_spec(item)?;
                    interface
                        .events
                        .entry(spec.name.clone())
                        .or_default()
                        .push(spec);
                }
                _ if item.is_constant() => {
                    let spec = self.parse_constant_spec(item)?;
                    interface
                        .constants
                        .entry(spec.name.clone())
                        .or_default()
                        .push(spec);
                }
                _ => {
                    let spec = self.parse_method_spec(item)?;
                    interface
                        .methods
                        .entry(spec.name.clone())
                        .or_default()
                        .push(spec);
                }
            }
        }
        Ok(interface)
    }

    pub fn parse_method_spec(&self, item: &AbiItem) -> Result<FunctionSpec, Error> {
        let name = entry_name(item)?;
        let input = self.parse_params(&item.inputs, name)?;
        let output = self.parse_params(item.outputs(), name)?;
        Ok(FunctionSpec::new(name, input, output, item.is_payable()))
    }

    /// Constants never carry a value.
    pub fn parse_constant_spec(&self, item: &AbiItem) -> Result<FunctionSpec, Error> {
        let name = entry_name(item)?;
        let input = self.parse_params(&item.inputs, name)?;
        let output = self.parse_params(item.outputs(), name)?;
        Ok(FunctionSpec::new(name, input, output, false))
    }

    /// The `inputs` of an event entry are the fields its records carry.
    pub fn parse_event_spec(&self, item: &AbiItem) -> Result<EventSpec, Error> {
        let name = entry_name(item)?;
        let output = self.parse_params(&item.inputs, name)?;
        Ok(EventSpec::new(name, output))
    }

    pub fn parse_params(&self, params: &[RawParam], owner: &str) -> Result<Vec<ParamSpec>, Error> {
        params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let ty = self.registry().resolve(&param.type_, &param.components)?;
                Ok(ParamSpec::new(&parse_field_name(param, i, owner), ty))
            })
            .collect()
    }
}

impl Parser for AbiParser {
    fn name(&self) -> &'static str {
        "abi"
    }

    fn parse(&self, data: &ContractData) -> Result<ContractInterface, Error> {
        let abi = Abi::from_value(data.abi.clone())?;
        let mut interface = self.parse_abi(&abi)?;
        interface.address = data.address.clone();
        info!(
            "Parsed contract interface: {} methods, {} constants, {} events",
            interface.methods.len(),
            interface.constants.len(),
            interface.events.len()
        );
        Ok(interface)
    }
}

/// Parses truffle build artifacts, picking the deployed address out of the
/// artifact's `networks` when the data carries none.
#[derive(Debug, Clone, Default)]
pub struct TruffleParser {
    inner: AbiParser,
}

impl TruffleParser {
    pub fn new() -> TruffleParser {
        TruffleParser::default()
    }

    pub fn with_registry(registry: TypeRegistry) -> TruffleParser {
        TruffleParser {
            inner: AbiParser::with_registry(registry),
        }
    }
}

impl Parser for TruffleParser {
    fn name(&self) -> &'static str {
        "truffle"
    }

    fn parse(&self, data: &ContractData) -> Result<ContractInterface, Error> {
        let mut interface = self.inner.parse(data)?;
        if interface.address.is_none() {
            interface.address = data.network_address(None);
        }
        Ok(interface)
    }
}

fn entry_name(item: &AbiItem) -> Result<&str, Error> {
    match item.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(Error::MalformedSpec(format!(
            "{:?} entry without a name",
            item.operation
        ))),
    }
}

/// Names an unnamed parameter after its position, with a warning since
/// callers then have to use the synthesized name.
pub fn parse_field_name(param: &RawParam, index: usize, owner: &str) -> String {
    if param.declared_name().is_none() {
        warn!(
            "No name supplied for field of type \"{}\" of method \"{}\"",
            param.type_, owner
        );
    }
    field_name(param, index)
}

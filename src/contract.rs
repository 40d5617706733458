//! Wires an adapter, contract data, a parser and overrides together into a
//! [`Contract`].

use crate::adapter::Adapter;
use crate::config::ContractOptions;
use crate::error::Error;
use crate::event::Event;
use crate::loader::{ContractData, Loader, Query};
use crate::method::{Method, MethodKind};
use crate::parser::Parser;
use crate::registry::TypeRegistry;
use crate::spec::{ContractInterface, Overrides};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub struct ContractBuilder {
    adapter: Arc<dyn Adapter>,
    options: ContractOptions,
    loader: Option<Box<dyn Loader>>,
    parser: Option<Box<dyn Parser>>,
    overrides: Overrides,
    registry: Option<TypeRegistry>,
}

impl ContractBuilder {
    pub fn new(adapter: Arc<dyn Adapter>) -> ContractBuilder {
        ContractBuilder {
            adapter,
            options: ContractOptions::default(),
            loader: None,
            parser: None,
            overrides: Overrides::default(),
            registry: None,
        }
    }

    /// Takes parser kind, loader, query and inline data from `options`.
    /// Collaborators set directly on the builder take precedence.
    pub fn options(mut self, options: ContractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn contract_data(mut self, data: ContractData) -> Self {
        self.options.contract_data = Some(data);
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.options.query = Some(query);
        self
    }

    pub fn loader(mut self, loader: Box<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Type registry handed to the parser built from the options. Ignored
    /// when a parser is set explicitly.
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Inline contract data wins over a loader.
    fn contract_data_or_load(&mut self) -> Result<ContractData, Error> {
        if let Some(data) = self.options.contract_data.take() {
            return Ok(data);
        }
        let loader = match self.loader.take() {
            Some(loader) => loader,
            None => match &self.options.loader {
                Some(config) => config.build()?,
                None => return Err(Error::MissingContractData),
            },
        };
        let query = self.options.query.as_ref().ok_or_else(|| {
            Error::Loader("A \"query\" with a contractName must be provided".to_string())
        })?;
        debug!(
            "Loading {} through the {} loader",
            query.contract_name,
            loader.name()
        );
        loader.load(query)
    }

    pub fn build(mut self) -> Result<Contract, Error> {
        let data = self.contract_data_or_load()?;
        let parser = match self.parser.take() {
            Some(parser) => parser,
            None => self.options.parser.build(self.registry.take()),
        };
        let mut interface = parser.parse(&data)?;
        interface.apply_overrides(&self.overrides);
        Ok(Contract::new(interface, self.adapter))
    }
}

/// The callable surface of one contract.
pub struct Contract {
    interface: ContractInterface,
    methods: BTreeMap<String, Method>,
    constants: BTreeMap<String, Method>,
    events: BTreeMap<String, Event>,
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Contract")
            .field("address", &self.interface.address)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("constants", &self.constants.keys().collect::<Vec<_>>())
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Contract {
    pub fn new(interface: ContractInterface, adapter: Arc<dyn Adapter>) -> Contract {
        let methods = interface
            .methods
            .iter()
            .map(|(name, specs)| {
                let method = Method::build(name, MethodKind::Transaction, specs, adapter.clone());
                (name.clone(), method)
            })
            .collect();
        let constants = interface
            .constants
            .iter()
            .map(|(name, specs)| {
                let method = Method::build(name, MethodKind::Constant, specs, adapter.clone());
                (name.clone(), method)
            })
            .collect();
        let events = interface
            .events
            .iter()
            .map(|(name, specs)| (name.clone(), Event::new(name, specs.clone(), adapter.clone())))
            .collect();
        Contract {
            interface,
            methods,
            constants,
            events,
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.interface.address.as_deref()
    }

    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<&Method> {
        self.constants.get(name)
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.values()
    }

    pub fn constants(&self) -> impl Iterator<Item = &Method> {
        self.constants.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }
}

//! Typed specs produced by the parser and consumed by the codec, the method
//! factory and the event dispatcher.
//!
//! Specs are built once and then only read. Overloads sharing a name live
//! side by side in an [`OverloadSet`], keyed by their canonical signature.

use crate::abi::format_signature;
use crate::types::ParamType;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A named, typed slot in an input or output list. Position in the list is
/// significant for positional calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub ty: Arc<ParamType>,
    /// Substituted when the caller leaves the field out
    pub default_value: Option<Value>,
}

impl ParamSpec {
    pub fn new(name: &str, ty: Arc<ParamType>) -> ParamSpec {
        ParamSpec {
            name: name.to_string(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> ParamSpec {
        self.default_value = Some(value);
        self
    }
}

/// Builds `name(t1,t2,...)` out of the types of `params`.
pub fn signature_of(name: &str, params: &[ParamSpec]) -> String {
    format_signature(name, params.iter().map(|p| p.ty.abi_name()))
}

/// A method or constant.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub signature: String,
    pub input: Vec<ParamSpec>,
    pub output: Vec<ParamSpec>,
    pub is_payable: bool,
}

impl FunctionSpec {
    pub fn new(name: &str, input: Vec<ParamSpec>, output: Vec<ParamSpec>, is_payable: bool) -> Self {
        FunctionSpec {
            name: name.to_string(),
            signature: signature_of(name, &input),
            input,
            output,
            is_payable,
        }
    }
}

/// An event. Events have no input, `output` describes the payload records
/// carry.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    pub name: String,
    pub signature: String,
    pub output: Vec<ParamSpec>,
}

impl EventSpec {
    pub fn new(name: &str, output: Vec<ParamSpec>) -> Self {
        EventSpec {
            name: name.to_string(),
            signature: signature_of(name, &output),
            output,
        }
    }
}

/// Anything stored in an [`OverloadSet`].
pub trait Signed {
    fn signature(&self) -> &str;
}

impl Signed for FunctionSpec {
    fn signature(&self) -> &str {
        &self.signature
    }
}

impl Signed for EventSpec {
    fn signature(&self) -> &str {
        &self.signature
    }
}

/// All specs sharing one name, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadSet<T> {
    specs: Vec<T>,
}

impl<T> Default for OverloadSet<T> {
    fn default() -> Self {
        OverloadSet { specs: Vec::new() }
    }
}

impl<T: Signed> OverloadSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, spec: T) {
        self.specs.push(spec)
    }

    /// The first overload declared with `signature`.
    pub fn get(&self, signature: &str) -> Option<&T> {
        self.specs.iter().find(|s| s.signature() == signature)
    }

    pub fn get_mut(&mut self, signature: &str) -> Option<&mut T> {
        self.specs.iter_mut().find(|s| s.signature() == signature)
    }

    pub fn signatures(&self) -> Vec<&str> {
        self.specs.iter().map(Signed::signature).collect()
    }

    pub fn first(&self) -> Option<&T> {
        self.specs.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<T> FromIterator<T> for OverloadSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        OverloadSet {
            specs: iter.into_iter().collect(),
        }
    }
}

/// What the parser produces for one contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractInterface {
    pub address: Option<String>,
    pub methods: BTreeMap<String, OverloadSet<FunctionSpec>>,
    pub constants: BTreeMap<String, OverloadSet<FunctionSpec>>,
    pub events: BTreeMap<String, OverloadSet<EventSpec>>,
}

impl ContractInterface {
    pub fn method(&self, name: &str) -> Option<&OverloadSet<FunctionSpec>> {
        self.methods.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<&OverloadSet<FunctionSpec>> {
        self.constants.get(name)
    }

    pub fn event(&self, name: &str) -> Option<&OverloadSet<EventSpec>> {
        self.events.get(name)
    }

    /// Merges `overrides` in. Only the fields an override sets are replaced,
    /// an override naming a signature the interface lacks adds an overload.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        merge_functions(&mut self.methods, &overrides.methods);
        merge_functions(&mut self.constants, &overrides.constants);
        for (name, by_signature) in &overrides.events {
            let set = self.events.entry(name.clone()).or_default();
            for (signature, patch) in by_signature {
                match set.get_mut(signature) {
                    Some(spec) => patch.apply(spec),
                    None => {
                        let mut spec = EventSpec {
                            name: name.clone(),
                            signature: signature.clone(),
                            output: Vec::new(),
                        };
                        patch.apply(&mut spec);
                        set.push(spec);
                    }
                }
            }
        }
    }
}

fn merge_functions(
    target: &mut BTreeMap<String, OverloadSet<FunctionSpec>>,
    overrides: &BTreeMap<String, BTreeMap<String, FunctionOverride>>,
) {
    for (name, by_signature) in overrides {
        let set = target.entry(name.clone()).or_default();
        for (signature, patch) in by_signature {
            match set.get_mut(signature) {
                Some(spec) => patch.apply(spec),
                None => {
                    let mut spec = FunctionSpec {
                        name: name.clone(),
                        signature: signature.clone(),
                        input: Vec::new(),
                        output: Vec::new(),
                        is_payable: false,
                    };
                    patch.apply(&mut spec);
                    set.push(spec);
                }
            }
        }
    }
}

/// Replacement fields for one function overload. `None` keeps what the
/// parser produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionOverride {
    pub input: Option<Vec<ParamSpec>>,
    pub output: Option<Vec<ParamSpec>>,
    pub is_payable: Option<bool>,
}

impl FunctionOverride {
    fn apply(&self, spec: &mut FunctionSpec) {
        if let Some(input) = &self.input {
            spec.input = input.clone();
        }
        if let Some(output) = &self.output {
            spec.output = output.clone();
        }
        if let Some(is_payable) = self.is_payable {
            spec.is_payable = is_payable;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOverride {
    pub output: Option<Vec<ParamSpec>>,
}

impl EventOverride {
    fn apply(&self, spec: &mut EventSpec) {
        if let Some(output) = &self.output {
            spec.output = output.clone();
        }
    }
}

/// Hand written spec fields layered over a parsed interface, each keyed
/// by name and then by signature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub methods: BTreeMap<String, BTreeMap<String, FunctionOverride>>,
    pub constants: BTreeMap<String, BTreeMap<String, FunctionOverride>>,
    pub events: BTreeMap<String, BTreeMap<String, EventOverride>>,
}

impl Overrides {
    pub fn method(mut self, name: &str, signature: &str, patch: FunctionOverride) -> Self {
        self.methods
            .entry(name.to_string())
            .or_default()
            .insert(signature.to_string(), patch);
        self
    }

    pub fn constant(mut self, name: &str, signature: &str, patch: FunctionOverride) -> Self {
        self.constants
            .entry(name.to_string())
            .or_default()
            .insert(signature.to_string(), patch);
        self
    }

    pub fn event(mut self, name: &str, signature: &str, patch: EventOverride) -> Self {
        self.events
            .entry(name.to_string())
            .or_default()
            .insert(signature.to_string(), patch);
        self
    }
}

//! Callable methods and constants built from their overload sets.
//!
//! A [`Method`] exposes every overload under its canonical signature. The
//! bare [`Method::call`] never guesses between overloads: it works when
//! there is exactly one, and fails with [`Error::AmbiguousOverload`]
//! otherwise.

use crate::adapter::Adapter;
use crate::call::{CallOptions, FunctionCall, PendingCall};
use crate::codec::{convert_input, Args};
use crate::error::Error;
use crate::hooks::{HookManager, Hooks};
use crate::spec::{FunctionSpec, OverloadSet};
use serde_json::Value;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Submitted as a transaction, resolves to a receipt
    Transaction,
    /// Read only call, resolves to decoded output
    Constant,
}

/// One overload of a method, callable on its own.
pub struct Overload {
    kind: MethodKind,
    spec: Arc<FunctionSpec>,
    adapter: Arc<dyn Adapter>,
    hooks: Arc<HookManager>,
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Overload")
            .field("kind", &self.kind)
            .field("signature", &self.spec.signature)
            .finish()
    }
}

impl Overload {
    pub fn spec(&self) -> &FunctionSpec {
        &self.spec
    }

    pub fn signature(&self) -> &str {
        &self.spec.signature
    }

    /// Calls with positional arguments. A trailing call options object, see
    /// [`CallOptions::detect`], is taken off the list first.
    pub fn call(&self, mut args: Vec<Value>) -> Result<PendingCall, Error> {
        let options = match args.last().map(CallOptions::detect).transpose()?.flatten() {
            Some(options) => {
                args.pop();
                options
            }
            None => CallOptions::default(),
        };
        let args = Args::infer(args, &self.spec.input);
        self.call_with(&args, options)
    }

    /// Calls with arguments and options given separately.
    pub fn call_with(&self, args: &Args, options: CallOptions) -> Result<PendingCall, Error> {
        if !self.spec.is_payable && options.has_value() {
            return Err(Error::Payability);
        }
        let encoded = convert_input(&self.spec.input, args)?;
        let call = self
            .hooks
            .run_call_hooks(FunctionCall::new(&self.spec.signature, encoded));
        trace!("Built call {} {:?}", call.signature, call.args);
        Ok(PendingCall {
            kind: self.kind,
            spec: self.spec.clone(),
            call,
            options,
            adapter: self.adapter.clone(),
            hooks: self.hooks.clone(),
        })
    }
}

pub struct Method {
    name: String,
    kind: MethodKind,
    overloads: Vec<Overload>,
    hooks: Arc<HookManager>,
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("signatures", &self.signatures())
            .finish()
    }
}

impl Method {
    /// Builds the callable for `name`. Without any spec a single zero
    /// arity overload keyed by the bare name stands in.
    pub fn build(
        name: &str,
        kind: MethodKind,
        specs: &OverloadSet<FunctionSpec>,
        adapter: Arc<dyn Adapter>,
    ) -> Method {
        let hooks = HookManager::new();
        let mut specs: Vec<FunctionSpec> = specs.iter().cloned().collect();
        if specs.is_empty() {
            specs.push(FunctionSpec {
                name: name.to_string(),
                signature: name.to_string(),
                input: Vec::new(),
                output: Vec::new(),
                is_payable: false,
            });
        }
        let overloads = specs
            .into_iter()
            .map(|spec| Overload {
                kind,
                spec: Arc::new(spec),
                adapter: adapter.clone(),
                hooks: hooks.clone(),
            })
            .collect();
        Method {
            name: name.to_string(),
            kind,
            overloads,
            hooks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    pub fn signatures(&self) -> Vec<&str> {
        self.overloads.iter().map(Overload::signature).collect()
    }

    pub fn overload(&self, signature: &str) -> Option<&Overload> {
        self.overloads.iter().find(|o| o.signature() == signature)
    }

    pub fn overloads(&self) -> impl Iterator<Item = &Overload> {
        self.overloads.iter()
    }

    /// Hook registration shared by every overload.
    pub fn hooks(&self) -> Hooks {
        self.hooks.create_hooks()
    }

    fn only(&self) -> Result<&Overload, Error> {
        match self.overloads.as_slice() {
            [only] => Ok(only),
            _ => Err(Error::AmbiguousOverload {
                name: self.name.clone(),
                signatures: self.signatures().into_iter().map(str::to_string).collect(),
            }),
        }
    }

    pub fn call(&self, args: Vec<Value>) -> Result<PendingCall, Error> {
        self.only()?.call(args)
    }

    pub fn call_with(&self, args: &Args, options: CallOptions) -> Result<PendingCall, Error> {
        self.only()?.call_with(args, options)
    }

    /// Calls the overload with `signature`.
    pub fn call_overload(&self, signature: &str, args: Vec<Value>) -> Result<PendingCall, Error> {
        self.overload(signature)
            .ok_or_else(|| Error::UnknownOverload(signature.to_string()))?
            .call(args)
    }
}

impl Index<&str> for Method {
    type Output = Overload;

    /// # Panics
    ///
    /// When no overload has `signature`, use [`Method::overload`] to check.
    fn index(&self, signature: &str) -> &Overload {
        match self.overload(signature) {
            Some(overload) => overload,
            None => panic!("No overload with signature \"{signature}\""),
        }
    }
}

use crate::abi::derive_method_id;
use crate::adapter::Adapter;
use crate::codec::convert_output;
use crate::error::Error;
use crate::hooks::HookManager;
use crate::method::MethodKind;
use crate::spec::FunctionSpec;
use crate::types::parse_integer;
use crate::utils::bytes_to_data;
use num256::Uint256;
use num_traits::Zero;
use serde_json::{Map, Value};
use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

/// An encoded call, ready to be handed to a transport.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    pub signature: String,
    /// First 4 bytes of the signature hash, `0x` prefixed
    pub method_id: String,
    /// Wire values in spec order
    pub args: Vec<Value>,
}

impl FunctionCall {
    pub fn new(signature: &str, args: Vec<Value>) -> FunctionCall {
        FunctionCall {
            signature: signature.to_string(),
            method_id: bytes_to_data(&derive_method_id(signature)),
            args,
        }
    }
}

/// Transaction settings passed as the trailing argument of a call.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Uint256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<Uint256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Uint256>,
}

const OPTION_KEYS: [&str; 3] = ["value", "gas", "gasLimit"];

impl CallOptions {
    /// Recognizes a call options object: an object with at least one of
    /// `value`, `gas` or `gasLimit` holding a quantity. Anything else is an
    /// ordinary argument and yields `None`.
    pub fn detect(value: &Value) -> Result<Option<CallOptions>, Error> {
        let object = match value {
            Value::Object(object) => object,
            _ => return Ok(None),
        };
        if !OPTION_KEYS
            .iter()
            .any(|key| object.get(*key).and_then(quantity).is_some())
        {
            return Ok(None);
        }
        Ok(Some(CallOptions {
            value: option_field(object, "value")?,
            gas: option_field(object, "gas")?,
            gas_limit: option_field(object, "gasLimit")?,
        }))
    }

    /// True when a non zero value is attached.
    pub fn has_value(&self) -> bool {
        self.value.as_ref().map_or(false, |value| !value.is_zero())
    }
}

fn quantity(value: &Value) -> Option<Uint256> {
    match parse_integer(value)? {
        (true, magnitude) if !magnitude.is_zero() => None,
        (_, magnitude) => Some(magnitude),
    }
}

fn option_field(object: &Map<String, Value>, key: &str) -> Result<Option<Uint256>, Error> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => quantity(value).map(Some).ok_or_else(|| {
            Error::InvalidValue(format!("Call option \"{key}\" must be a quantity"))
        }),
    }
}

/// What a call resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// Decoded output of a constant, keyed by field name
    Value(Map<String, Value>),
    /// The transport's receipt for a transaction
    Receipt(Value),
}

/// A call that was validated, encoded and passed through the call hooks,
/// and is sent once awaited.
#[must_use = "calls do nothing unless awaited"]
pub struct PendingCall {
    pub(crate) kind: MethodKind,
    pub(crate) spec: Arc<FunctionSpec>,
    pub(crate) call: FunctionCall,
    pub(crate) options: CallOptions,
    pub(crate) adapter: Arc<dyn Adapter>,
    pub(crate) hooks: Arc<HookManager>,
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("kind", &self.kind)
            .field("call", &self.call)
            .field("options", &self.options)
            .finish()
    }
}

impl PendingCall {
    pub fn function_call(&self) -> &FunctionCall {
        &self.call
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    pub async fn send(self) -> Result<CallOutcome, Error> {
        let PendingCall {
            kind,
            spec,
            call,
            options,
            adapter,
            hooks,
        } = self;
        let outcome = match kind {
            MethodKind::Constant => {
                let values = adapter.call(call).await?;
                CallOutcome::Value(convert_output(&spec.output, &values)?)
            }
            MethodKind::Transaction => CallOutcome::Receipt(adapter.send(call, options).await?),
        };
        hooks.run_outcome_hooks(&outcome);
        Ok(outcome)
    }
}

impl IntoFuture for PendingCall {
    type Output = Result<CallOutcome, Error>;

    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

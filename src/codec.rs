//! Conversion between application values and the ordered values handed to
//! a transport, driven by a list of [`ParamSpec`]s.

use crate::error::Error;
use crate::spec::ParamSpec;
use crate::types::ParamType;
use serde_json::{Map, Value};

/// The two shapes a caller may hand arguments in.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// One object keyed by field name
    Named(Map<String, Value>),
    /// Values in spec order
    Positional(Vec<Value>),
}

impl Args {
    /// Picks the shape of `values`. A lone object is read as named fields,
    /// unless the spec's only parameter is a tuple and the object doesn't
    /// carry that parameter's name, then it is the tuple itself.
    pub fn infer(mut values: Vec<Value>, spec: &[ParamSpec]) -> Args {
        if values.len() == 1 && values[0].is_object() {
            let passes_tuple = match spec {
                [only] => {
                    matches!(*only.ty, ParamType::Tuple(_))
                        && values[0].get(&only.name).is_none()
                }
                _ => false,
            };
            if !passes_tuple {
                if let Some(Value::Object(fields)) = values.pop() {
                    return Args::Named(fields);
                }
            }
        }
        Args::Positional(values)
    }

    /// The supplied value for `param`, `None` when absent or `null`.
    fn get(&self, index: usize, param: &ParamSpec) -> Option<&Value> {
        let value = match self {
            Args::Named(fields) => fields.get(&param.name),
            Args::Positional(values) => values.get(index),
        };
        value.filter(|v| !v.is_null())
    }
}

impl From<Map<String, Value>> for Args {
    fn from(fields: Map<String, Value>) -> Self {
        Args::Named(fields)
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Args::Positional(values)
    }
}

/// Validates `args` against `spec` and converts them into wire values, one
/// per spec entry in spec order.
///
/// Every field is validated before any is converted, and the first failing
/// field aborts the whole call. Omitted fields take their default value.
/// An empty spec ignores whatever was supplied.
pub fn convert_input(spec: &[ParamSpec], args: &Args) -> Result<Vec<Value>, Error> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    let mut raw = Vec::with_capacity(spec.len());
    for (i, param) in spec.iter().enumerate() {
        let value = args
            .get(i, param)
            .or(param.default_value.as_ref())
            .cloned()
            .unwrap_or(Value::Null);
        param
            .ty
            .validate(&value)
            .map_err(|e| Error::for_field(&param.name, e))?;
        raw.push(value);
    }

    spec.iter()
        .zip(raw)
        .map(|(param, value)| {
            param
                .ty
                .convert_input(value)
                .map_err(|e| Error::for_field(&param.name, e))
        })
        .collect()
}

/// Builds the keyed result of a call or event record out of positional wire
/// values. Missing trailing values leave their field unset and extra values
/// are dropped.
pub fn convert_output(spec: &[ParamSpec], values: &[Value]) -> Result<Map<String, Value>, Error> {
    let mut out = Map::new();
    for (param, value) in spec.iter().zip(values) {
        let converted = param
            .ty
            .convert_output(value.clone())
            .map_err(|e| Error::for_field(&param.name, e))?;
        out.insert(param.name.clone(), converted);
    }
    Ok(out)
}

/// Pulls the positional entries `"0"`, `"1"`, ... out of an object such as
/// the `returnValues` of an event record. Stops at the first missing index.
pub fn convert_result_obj(len: usize, values: &Map<String, Value>) -> Vec<Value> {
    (0..len)
        .map_while(|i| values.get(&i.to_string()).cloned())
        .collect()
}

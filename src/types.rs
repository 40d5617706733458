//! The closed set of parameter types every spec refers to.
//!
//! A [`ParamType`] knows how to validate an application value, how to turn
//! it into the value handed to a transport (`convert_input`) and how to
//! turn a transport value back (`convert_output`). Types are immutable and
//! shared as `Arc<ParamType>` by every spec using them.

use crate::address::Address;
use crate::error::Error;
use crate::spec::ParamSpec;
use crate::utils::{bytes_to_data, hex_str_to_bytes, is_hex_data};
use num256::Uint256;
use num_traits::{Num, Zero};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Largest integer an IEEE 754 double holds exactly, JSON numbers beyond
/// it are not trusted as integers.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    Address,
    Boolean,
    /// `uint<bits>` or `int<bits>`
    Integer { signed: bool, bits: u16 },
    String,
    /// `bytes` when `None`, `bytes<N>` otherwise
    Bytes(Option<usize>),
    /// `T[]` when `len` is `None`, `T[len]` otherwise
    Array {
        item: Arc<ParamType>,
        len: Option<usize>,
    },
    /// Named fields, each validated and converted by its own type
    Tuple(Vec<ParamSpec>),
}

impl ParamType {
    pub fn uint(bits: u16) -> ParamType {
        ParamType::Integer {
            signed: false,
            bits,
        }
    }

    pub fn int(bits: u16) -> ParamType {
        ParamType::Integer { signed: true, bits }
    }

    /// Canonical ABI name, as used in signatures.
    pub fn abi_name(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Boolean => "bool".to_string(),
            ParamType::Integer { signed: true, bits } => format!("int{bits}"),
            ParamType::Integer {
                signed: false,
                bits,
            } => format!("uint{bits}"),
            ParamType::String => "string".to_string(),
            ParamType::Bytes(None) => "bytes".to_string(),
            ParamType::Bytes(Some(size)) => format!("bytes{size}"),
            ParamType::Array { item, len: None } => format!("{}[]", item.abi_name()),
            ParamType::Array {
                item,
                len: Some(len),
            } => format!("{}[{len}]", item.abi_name()),
            ParamType::Tuple(fields) => {
                let names: Vec<String> = fields.iter().map(|f| f.ty.abi_name()).collect();
                format!("({})", names.join(","))
            }
        }
    }

    /// The class of values this type accepts, e.g. "Must be a boolean".
    pub fn expectation(&self) -> String {
        match self {
            ParamType::Address => "Must be a valid address".to_string(),
            ParamType::Boolean => "Must be a boolean".to_string(),
            ParamType::Integer { .. } => "Must be a valid integer".to_string(),
            ParamType::String => "Must be a string".to_string(),
            ParamType::Bytes(None) => "Must be a hex string".to_string(),
            ParamType::Bytes(Some(size)) => format!("Must be a hex string of {size} bytes"),
            ParamType::Array { len: None, .. } => "Must be an array".to_string(),
            ParamType::Array { len: Some(len), .. } => {
                format!("Must be an array of length {len}")
            }
            ParamType::Tuple(_) => "Must be an object".to_string(),
        }
    }

    fn invalid(&self) -> Error {
        Error::InvalidValue(self.expectation())
    }

    /// Checks `value` against this type. Composite types report the first
    /// offending field or index.
    pub fn validate(&self, value: &Value) -> Result<(), Error> {
        match self {
            ParamType::Address => match value {
                Value::String(s) => Address::parse_and_validate(s).map(|_| ()),
                _ => Err(self.invalid()),
            },
            ParamType::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err(self.invalid()),
            },
            ParamType::Integer { signed, bits } => match parse_integer(value) {
                Some((negative, magnitude)) if fits(*signed, *bits, negative, &magnitude) => {
                    Ok(())
                }
                _ => Err(self.invalid()),
            },
            ParamType::String => match value {
                Value::String(_) => Ok(()),
                _ => Err(self.invalid()),
            },
            ParamType::Bytes(size) => match value {
                Value::String(s) if is_hex_data(s) => match size {
                    Some(size) if (s.len() - 2) / 2 != *size => Err(self.invalid()),
                    _ => Ok(()),
                },
                _ => Err(self.invalid()),
            },
            ParamType::Array { item, len } => {
                let items = match value {
                    Value::Array(items) => items,
                    _ => return Err(self.invalid()),
                };
                if let Some(len) = len {
                    if items.len() != *len {
                        return Err(self.invalid());
                    }
                }
                for (i, element) in items.iter().enumerate() {
                    item.validate(element).map_err(|e| {
                        Error::InvalidValue(format!("Validation for index {i} failed: {e}"))
                    })?;
                }
                Ok(())
            }
            ParamType::Tuple(fields) => {
                let object = match value {
                    Value::Object(object) => object,
                    _ => return Err(self.invalid()),
                };
                for field in fields {
                    let field_value = object.get(&field.name).unwrap_or(&Value::Null);
                    field
                        .ty
                        .validate(field_value)
                        .map_err(|e| Error::for_field(&field.name, e))?;
                }
                Ok(())
            }
        }
    }

    /// Converts an already validated value to its wire form. Types without a
    /// conversion hand the value back untouched.
    pub fn convert_input(&self, value: Value) -> Result<Value, Error> {
        match self {
            ParamType::String => match value {
                Value::String(s) => Ok(Value::String(bytes_to_data(s.as_bytes()))),
                other => Ok(other),
            },
            ParamType::Integer { .. } => match value.as_str().map(parse_integer_str) {
                Some(Some((negative, magnitude))) => {
                    Ok(Value::String(render_decimal(negative, &magnitude)))
                }
                Some(None) => Err(self.invalid()),
                None => Ok(value),
            },
            ParamType::Array { item, .. } => match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|element| item.convert_input(element))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Ok(other),
            },
            ParamType::Tuple(fields) => match value {
                Value::Object(object) => {
                    convert_fields(fields, object, |ty, v| ty.convert_input(v))
                }
                other => Ok(other),
            },
            ParamType::Address | ParamType::Boolean | ParamType::Bytes(_) => Ok(value),
        }
    }

    /// Converts a wire value back to its application form.
    pub fn convert_output(&self, value: Value) -> Result<Value, Error> {
        match self {
            ParamType::String => match value {
                Value::String(s) if is_hex_data(&s) => {
                    let decoded = hex_str_to_bytes(&s)
                        .ok()
                        .and_then(|bytes| String::from_utf8(bytes).ok());
                    Ok(Value::String(decoded.unwrap_or(s)))
                }
                other => Ok(other),
            },
            ParamType::Integer { .. } => match value.as_str().and_then(parse_integer_str) {
                Some((negative, magnitude)) => Ok(integer_output(negative, &magnitude)),
                None => Ok(value),
            },
            ParamType::Array { item, .. } => match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|element| item.convert_output(element))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Ok(other),
            },
            ParamType::Tuple(fields) => match value {
                Value::Object(object) => {
                    convert_fields(fields, object, |ty, v| ty.convert_output(v))
                }
                // positional tuple results, as some transports return them
                Value::Array(items) => {
                    let mut out = Map::new();
                    for (field, item) in fields.iter().zip(items) {
                        out.insert(field.name.clone(), field.ty.convert_output(item)?);
                    }
                    Ok(Value::Object(out))
                }
                other => Ok(other),
            },
            ParamType::Address | ParamType::Boolean | ParamType::Bytes(_) => Ok(value),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.abi_name())
    }
}

/// Walks the fields of a tuple, converting the ones present. Fields missing
/// from the object stay missing, keys the tuple doesn't declare are kept.
fn convert_fields<F>(
    fields: &[ParamSpec],
    mut object: Map<String, Value>,
    convert: F,
) -> Result<Value, Error>
where
    F: Fn(&ParamType, Value) -> Result<Value, Error>,
{
    for field in fields {
        if let Some(value) = object.remove(&field.name) {
            object.insert(field.name.clone(), convert(&field.ty, value)?);
        }
    }
    Ok(Value::Object(object))
}

/// Sign and magnitude of an integer value, `None` when `value` is not an
/// integer at all.
///
/// Accepts integral JSON numbers, decimal strings with an optional minus
/// sign and `0x` prefixed hex strings.
pub(crate) fn parse_integer(value: &Value) -> Option<(bool, Uint256)> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some((false, Uint256::from(u)))
            } else if let Some(i) = n.as_i64() {
                Some((i < 0, Uint256::from(i.unsigned_abs())))
            } else {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f.abs() > MAX_SAFE_INTEGER {
                    return None;
                }
                Some((f < 0.0, Uint256::from(f.abs() as u64)))
            }
        }
        Value::String(s) => parse_integer_str(s),
        _ => None,
    }
}

fn parse_integer_str(s: &str) -> Option<(bool, Uint256)> {
    if let Some(digits) = s.strip_prefix("0x") {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        if digits.trim_start_matches('0').len() > 64 {
            return None;
        }
        Uint256::from_str_radix(digits, 16)
            .ok()
            .map(|magnitude| (false, magnitude))
    } else {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Uint256::from_str(digits)
            .ok()
            .map(|magnitude| (negative, magnitude))
    }
}

/// 2 ** exp for exp < 256
fn pow2(exp: u16) -> Uint256 {
    let mut bytes = [0u8; 32];
    bytes[31 - (exp / 8) as usize] = 1 << (exp % 8);
    Uint256::from_be_bytes(&bytes)
}

fn fits(signed: bool, bits: u16, negative: bool, magnitude: &Uint256) -> bool {
    let negative = negative && !magnitude.is_zero();
    let bits = bits.min(256);
    if bits == 0 {
        return magnitude.is_zero();
    }
    if signed {
        let limit = pow2(bits - 1);
        if negative {
            *magnitude <= limit
        } else {
            *magnitude < limit
        }
    } else {
        !negative && (bits >= 256 || *magnitude < pow2(bits))
    }
}

fn render_decimal(negative: bool, magnitude: &Uint256) -> String {
    if negative && !magnitude.is_zero() {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    }
}

/// Small results become JSON numbers, anything wider stays a decimal string.
fn integer_output(negative: bool, magnitude: &Uint256) -> Value {
    let rendered = render_decimal(negative, magnitude);
    if *magnitude <= Uint256::from(u64::MAX) {
        if negative {
            if let Ok(i) = rendered.parse::<i64>() {
                return Value::from(i);
            }
        } else if let Ok(u) = rendered.parse::<u64>() {
            return Value::from(u);
        }
    }
    Value::String(rendered)
}

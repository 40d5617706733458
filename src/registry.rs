//! Resolution of raw ABI type names into [`ParamType`]s.

use crate::abi::RawParam;
use crate::error::Error;
use crate::spec::ParamSpec;
use crate::types::ParamType;
use std::collections::HashMap;
use std::sync::Arc;

lazy_static! {
    /// The registry used when a parser isn't handed one explicitly.
    pub static ref DEFAULT_REGISTRY: TypeRegistry = TypeRegistry::default();
}

/// Maps canonical type names to shared types. Sized integer and fixed
/// bytes names are matched by pattern and need no registration.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<ParamType>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = TypeRegistry {
            types: HashMap::new(),
        };
        registry.register("address", ParamType::Address);
        registry.register("bool", ParamType::Boolean);
        registry.register("string", ParamType::String);
        registry.register("bytes", ParamType::Bytes(None));
        registry.register("uint", ParamType::uint(256));
        registry.register("int", ParamType::int(256));
        // address followed by a 4 byte selector
        registry.register("function", ParamType::Bytes(Some(24)));
        registry
    }
}

impl TypeRegistry {
    /// Adds `name`, replacing whatever it pointed to before.
    pub fn register(&mut self, name: &str, ty: ParamType) {
        self.types.insert(name.to_string(), Arc::new(ty));
    }

    /// Resolves a raw type name. `components` is only read for `tuple`
    /// types, arrays of tuples included.
    pub fn resolve(&self, raw: &str, components: &[RawParam]) -> Result<Arc<ParamType>, Error> {
        if let Some(prefix) = raw.strip_suffix(']') {
            let open = prefix
                .rfind('[')
                .ok_or_else(|| Error::UnknownType(raw.to_string()))?;
            let len = match &prefix[open + 1..] {
                "" => None,
                digits => Some(
                    digits
                        .parse::<usize>()
                        .map_err(|_| Error::UnknownType(raw.to_string()))?,
                ),
            };
            let item = self.resolve(&prefix[..open], components)?;
            return Ok(Arc::new(ParamType::Array { item, len }));
        }

        if raw == "tuple" {
            if components.is_empty() {
                return Err(Error::MalformedSpec(
                    "tuple type without components".to_string(),
                ));
            }
            let fields = components
                .iter()
                .enumerate()
                .map(|(i, component)| {
                    let ty = self.resolve(&component.type_, &component.components)?;
                    Ok(ParamSpec::new(&field_name(component, i), ty))
                })
                .collect::<Result<Vec<_>, Error>>()?;
            return Ok(Arc::new(ParamType::Tuple(fields)));
        }

        if let Some(ty) = self.types.get(raw) {
            return Ok(ty.clone());
        }

        sized_type(raw)
            .map(Arc::new)
            .ok_or_else(|| Error::UnknownType(raw.to_string()))
    }
}

/// The declared name of a parameter, `field_<index>` when there is none.
pub(crate) fn field_name(param: &RawParam, index: usize) -> String {
    match param.declared_name() {
        Some(name) => name.to_string(),
        None => format!("field_{index}"),
    }
}

/// `uint<N>`, `int<N>` and `bytes<N>`
fn sized_type(raw: &str) -> Option<ParamType> {
    let digits_only = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if let Some(size) = raw.strip_prefix("bytes").filter(|s| digits_only(s)) {
        let size: usize = size.parse().ok()?;
        return (1..=32).contains(&size).then_some(ParamType::Bytes(Some(size)));
    }
    let (signed, bits) = match raw.strip_prefix("uint") {
        Some(bits) => (false, bits),
        None => (true, raw.strip_prefix("int")?),
    };
    if !digits_only(bits) {
        return None;
    }
    let bits: u16 = bits.parse().ok()?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return None;
    }
    Some(ParamType::Integer { signed, bits })
}

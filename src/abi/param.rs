/// One parameter of an ABI entry, as found in the `inputs`, `outputs` and
/// tuple `components` lists.
#[derive(Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct RawParam {
    /// Solidity leaves unnamed parameters as `""`, some tools drop the key
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default = "Vec::new")]
    pub components: Vec<RawParam>,
    #[serde(default)]
    pub indexed: bool,
    #[serde(rename = "internalType", default)]
    pub internal_type: Option<String>,
}

impl RawParam {
    pub fn new(name: &str, type_: &str) -> RawParam {
        RawParam {
            name: Some(name.to_owned()),
            type_: type_.to_owned(),
            components: Vec::new(),
            indexed: false,
            internal_type: None,
        }
    }

    pub fn with_components(mut self, components: Vec<RawParam>) -> RawParam {
        self.components = components;
        self
    }

    /// The declared name, `None` when missing or empty.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

#[test]
fn deserialize_unnamed() {
    let param: RawParam = serde_json::from_str(r#"{"type": "uint8"}"#).unwrap();
    assert_eq!(param.declared_name(), None);
    let param: RawParam = serde_json::from_str(r#"{"name": "", "type": "uint8"}"#).unwrap();
    assert_eq!(param.declared_name(), None);
    let param: RawParam = serde_json::from_str(r#"{"name": null, "type": "uint8"}"#).unwrap();
    assert_eq!(param.declared_name(), None);
}

#[test]
fn deserialize_components() {
    let param: RawParam = serde_json::from_str(
        r#"{
            "name": "s",
            "type": "tuple",
            "internalType": "struct Test.S",
            "components": [{"name": "a", "type": "uint256"}, {"name": "b", "type": "address"}]
        }"#,
    )
    .unwrap();
    assert_eq!(
        param,
        RawParam::new("s", "tuple")
            .with_components(vec![
                RawParam::new("a", "uint256"),
                RawParam::new("b", "address")
            ])
            .with_internal_type("struct Test.S")
    );
}

#[cfg(test)]
impl RawParam {
    fn with_internal_type(mut self, internal_type: &str) -> RawParam {
        self.internal_type = Some(internal_type.to_owned());
        self
    }
}

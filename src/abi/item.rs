use crate::abi::operation::Operation;
use crate::abi::param::RawParam;
use crate::abi::state_mutability::StateMutability;

/// The JSON format for a contract’s interface is given by an array of
/// function and/or event descriptions. A function description is a
/// JSON object with the fields
#[derive(Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct AbiItem {
    #[serde(rename = "type", default)]
    pub operation: Operation,
    pub name: Option<String>,
    #[serde(default)]
    pub payable: bool,
    #[serde(default)]
    pub constant: bool,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub inputs: Vec<RawParam>,
    pub outputs: Option<Vec<RawParam>>,
    #[serde(rename = "stateMutability")]
    pub state_mutability: Option<StateMutability>,
}

impl AbiItem {
    /// Read-only functions, flagged either by the legacy `constant` field or
    /// by a `view`/`pure` state mutability.
    pub fn is_constant(&self) -> bool {
        self.constant
            || self
                .state_mutability
                .map(StateMutability::is_read_only)
                .unwrap_or(false)
    }

    pub fn is_payable(&self) -> bool {
        self.payable || self.state_mutability == Some(StateMutability::Payable)
    }

    pub fn outputs(&self) -> &[RawParam] {
        self.outputs.as_deref().unwrap_or(&[])
    }
}

#[test]
fn legacy_and_modern_flags() {
    let legacy: AbiItem = serde_json::from_str(
        r#"{"constant": true, "inputs": [], "name": "getBalance", "payable": false, "type": "function"}"#,
    )
    .unwrap();
    assert!(legacy.is_constant());
    assert!(!legacy.is_payable());

    let modern: AbiItem = serde_json::from_str(
        r#"{"inputs": [], "name": "deposit", "stateMutability": "payable", "type": "function"}"#,
    )
    .unwrap();
    assert!(!modern.is_constant());
    assert!(modern.is_payable());

    let view: AbiItem = serde_json::from_str(
        r#"{"inputs": [], "name": "owner", "outputs": [{"name": "", "type": "address"}], "stateMutability": "view"}"#,
    )
    .unwrap();
    assert_eq!(view.operation, Operation::Function);
    assert!(view.is_constant());
    assert_eq!(view.outputs().len(), 1);
}

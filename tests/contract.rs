mod common;

use common::{fixtures, metacoin, MockAdapter};
use lantern::call::CallOutcome;
use lantern::config::ContractOptions;
use lantern::loader::{ContractData, FsLoader, Query, TruffleLoader};
use lantern::parser::TruffleParser;
use lantern::spec::{FunctionOverride, Overrides};
use lantern::{ContractBuilder, Error, ParamSpec, ParamType, TypedEvent};
use serde_json::json;
use std::sync::Arc;

#[test]
fn build_from_options() {
    common::init_logging();
    let options = ContractOptions::from_json(&format!(
        r#"{{
            "parser": "truffle",
            "loader": {{"name": "truffle", "options": {{"directory": "{}"}}}},
            "query": {{"contractName": "MetaCoin", "networkId": "3"}}
        }}"#,
        fixtures().display()
    ))
    .unwrap();

    let contract = ContractBuilder::new(MockAdapter::new())
        .options(options)
        .build()
        .unwrap();
    assert_eq!(
        contract.address(),
        Some("0x0000000000000000000000000000000000000003")
    );
    assert!(contract.method("sendCoin").is_some());
    assert!(contract.constant("getBalance").is_some());
    assert!(contract.event("Transfer").is_some());
    assert!(contract.method("getBalance").is_none());
    assert_eq!(contract.constant("overloaded").unwrap().signatures().len(), 3);
}

#[test]
fn explicit_loader_and_query() {
    let query = Query {
        contract_address: Some("0x0000000000000000000000000000000000000099".to_string()),
        ..Query::new("MetaCoin")
    };
    let contract = ContractBuilder::new(MockAdapter::new())
        .loader(Box::new(TruffleLoader::new(fixtures()).unwrap()))
        .parser(Box::new(TruffleParser::new()))
        .query(query)
        .build()
        .unwrap();
    assert_eq!(
        contract.address(),
        Some("0x0000000000000000000000000000000000000099")
    );
}

#[test]
fn inline_data_wins() {
    let contract = ContractBuilder::new(MockAdapter::new())
        .contract_data(ContractData::from_abi(json!([
            {"type": "function", "name": "ping", "inputs": []}
        ])))
        .loader(Box::new(FsLoader::new(fixtures()).unwrap()))
        .build()
        .unwrap();
    assert!(contract.method("ping").is_some());
    assert!(contract.method("sendCoin").is_none());
    assert_eq!(contract.address(), None);
}

#[test]
fn missing_contract_data() {
    let err = ContractBuilder::new(MockAdapter::new()).build().unwrap_err();
    assert!(matches!(err, Error::MissingContractData));
    assert!(err.to_string().contains("contractData or loader"));
}

#[test]
fn loader_without_query() {
    let err = ContractBuilder::new(MockAdapter::new())
        .loader(Box::new(FsLoader::new(fixtures()).unwrap()))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Loader(_)));
}

#[test]
fn missing_artifact() {
    let err = ContractBuilder::new(MockAdapter::new())
        .loader(Box::new(FsLoader::new(fixtures()).unwrap()))
        .query(Query::new("DoesNotExist"))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("DoesNotExist.json"));
}

#[tokio::test]
async fn overrides_apply_to_callables() {
    let adapter = MockAdapter::new();
    let amount = ParamSpec::new("amount", Arc::new(ParamType::uint(256))).with_default(json!(10));
    let receiver = ParamSpec::new("receiver", Arc::new(ParamType::Address));
    let overrides = Overrides::default().method(
        "sendCoin",
        "sendCoin(address,uint256)",
        FunctionOverride {
            input: Some(vec![receiver, amount]),
            ..Default::default()
        },
    );

    let contract = ContractBuilder::new(adapter.clone())
        .contract_data(metacoin())
        .overrides(overrides)
        .build()
        .unwrap();

    let send_coin = contract.method("sendCoin").unwrap();
    let spec = send_coin.overload("sendCoin(address,uint256)").unwrap().spec();
    assert_eq!(spec.output[0].name, "sufficient");
    assert!(!spec.is_payable);

    let outcome = send_coin
        .call(vec![json!("0x7da82c7ab4771ff031b66538d2fb9b0b047f6cf9")])
        .unwrap()
        .await
        .unwrap();
    assert_eq!(outcome, CallOutcome::Receipt(json!(null)));
    assert_eq!(adapter.sent.lock().unwrap()[0].0.args[1], json!(10));
}

#[test]
fn events_come_from_the_interface() {
    let adapter = MockAdapter::new();
    let contract = ContractBuilder::new(adapter.clone())
        .contract_data(metacoin())
        .build()
        .unwrap();
    let transfer = contract.event("Transfer").unwrap();
    assert_eq!(transfer.signatures().len(), 2);
    transfer
        .add_listener(Arc::new(|_: Result<TypedEvent, Error>| {}))
        .unwrap();
    assert_eq!(adapter.subscription_count(), 2);
}

mod common;

use common::{metacoin, MockAdapter};
use lantern::call::{CallOptions, CallOutcome};
use lantern::codec::Args;
use lantern::parser::{AbiParser, Parser};
use lantern::spec::{FunctionSpec, OverloadSet};
use lantern::{ContractInterface, Error, Method, MethodKind, Uint256};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const RECEIVER: &str = "0x7da82c7ab4771ff031b66538d2fb9b0b047f6cf9";

fn interface() -> ContractInterface {
    AbiParser::new().parse(&metacoin()).unwrap()
}

fn method(adapter: &Arc<MockAdapter>, name: &str) -> Method {
    Method::build(
        name,
        MethodKind::Transaction,
        interface().method(name).unwrap(),
        adapter.clone(),
    )
}

fn constant(adapter: &Arc<MockAdapter>, name: &str) -> Method {
    Method::build(
        name,
        MethodKind::Constant,
        interface().constant(name).unwrap(),
        adapter.clone(),
    )
}

#[tokio::test]
async fn send_transaction() {
    let adapter = MockAdapter::new();
    *adapter.receipt.lock().unwrap() = json!({"status": true});
    let send_coin = method(&adapter, "sendCoin");

    let outcome = send_coin
        .call(vec![json!(RECEIVER), json!(100)])
        .unwrap()
        .await
        .unwrap();
    assert_eq!(outcome, CallOutcome::Receipt(json!({"status": true})));

    let sent = adapter.sent.lock().unwrap();
    let (call, options) = &sent[0];
    assert_eq!(call.signature, "sendCoin(address,uint256)");
    assert_eq!(call.method_id, "0x90b98a11");
    assert_eq!(call.args, vec![json!(RECEIVER), json!(100)]);
    assert_eq!(*options, CallOptions::default());
}

#[tokio::test]
async fn named_arguments() {
    let adapter = MockAdapter::new();
    let send_coin = method(&adapter, "sendCoin");
    send_coin
        .call(vec![json!({"receiver": RECEIVER, "amount": "0x10"})])
        .unwrap()
        .await
        .unwrap();
    let sent = adapter.sent.lock().unwrap();
    assert_eq!(sent[0].0.args, vec![json!(RECEIVER), json!("16")]);
}

#[test]
fn value_rejected_by_non_payable_method() {
    let adapter = MockAdapter::new();
    let send_coin = method(&adapter, "sendCoin");
    let err = send_coin
        .call(vec![json!(RECEIVER), json!(100), json!({"value": 1})])
        .unwrap_err();
    assert!(matches!(err, Error::Payability));
    assert_eq!(err.to_string(), "Cannot send a value to a non-payable function");

    // caught before the arguments are even looked at
    let err = send_coin
        .call(vec![json!("not an address"), json!({"value": 1})])
        .unwrap_err();
    assert!(matches!(err, Error::Payability));

    assert!(send_coin
        .call(vec![json!(RECEIVER), json!(100), json!({"value": 0})])
        .is_ok());
}

#[tokio::test]
async fn payable_method_carries_options() {
    let adapter = MockAdapter::new();
    let deposit = method(&adapter, "deposit");
    let pending = deposit
        .call(vec![json!(RECEIVER), json!({"value": "1000", "gasLimit": 50000})])
        .unwrap();
    assert_eq!(pending.options().value, Some(Uint256::from(1000u32)));
    pending.await.unwrap();

    let sent = adapter.sent.lock().unwrap();
    assert_eq!(sent[0].1.gas_limit, Some(Uint256::from(50000u32)));
    assert_eq!(sent[0].0.args, vec![json!(RECEIVER)]);
}

#[tokio::test]
async fn plain_trailing_object_is_an_argument() {
    let adapter = MockAdapter::returning(vec![json!("0x6869")]);
    let describe = constant(&adapter, "describe");
    let outcome = describe
        .call(vec![json!({"owner": RECEIVER, "nickname": "james"})])
        .unwrap()
        .await
        .unwrap();
    assert_eq!(
        outcome,
        CallOutcome::Value(json!({"summary": "hi"}).as_object().cloned().unwrap())
    );

    let calls = adapter.calls.lock().unwrap();
    assert_eq!(
        calls[0].args,
        vec![json!({"owner": RECEIVER, "nickname": "0x6a616d6573"})]
    );
}

#[tokio::test]
async fn constant_output_decoded() {
    let adapter = MockAdapter::returning(vec![json!("0x2a")]);
    let get_balance = constant(&adapter, "getBalance");
    match get_balance.call(vec![json!(RECEIVER)]).unwrap().await.unwrap() {
        CallOutcome::Value(values) => assert_eq!(values.get("field_0"), Some(&json!(42))),
        other => panic!("unexpected {other:?}"),
    }
    assert!(adapter.sent.lock().unwrap().is_empty());
}

#[test]
fn validation_errors_name_the_field() {
    let adapter = MockAdapter::new();
    let send_coin = method(&adapter, "sendCoin");
    let err = send_coin.call(vec![json!(RECEIVER), json!(true)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation for field \"amount\" failed: Must be a valid integer"
    );
    let err = send_coin.call(vec![json!("0x12"), json!(1)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation for field \"receiver\" failed: Must be a valid address"
    );
}

#[tokio::test]
async fn overloads_called_by_signature() {
    let adapter = MockAdapter::returning(vec![json!(3)]);
    let overloaded = constant(&adapter, "overloaded");
    assert_eq!(overloaded.signatures().len(), 3);

    let err = overloaded.call(vec![json!(1), json!(2)]).unwrap_err();
    match err {
        Error::AmbiguousOverload { name, signatures } => {
            assert_eq!(name, "overloaded");
            assert_eq!(signatures.len(), 3);
        }
        other => panic!("unexpected {other:?}"),
    }

    overloaded["overloaded(uint256,uint256)"]
        .call(vec![json!(1), json!(2)])
        .unwrap()
        .await
        .unwrap();
    overloaded
        .call_overload("overloaded(uint256,bool)", vec![json!(1), json!(true)])
        .unwrap()
        .await
        .unwrap();
    assert!(matches!(
        overloaded.call_overload("overloaded(bool)", vec![]),
        Err(Error::UnknownOverload(_))
    ));

    let calls = adapter.calls.lock().unwrap();
    assert_eq!(calls[0].signature, "overloaded(uint256,uint256)");
    assert_eq!(calls[1].signature, "overloaded(uint256,bool)");
}

#[test]
fn hooks_shared_by_overloads() {
    let adapter = MockAdapter::new();
    let overloaded = constant(&adapter, "overloaded");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    overloaded.hooks().on_call(move |call| {
        sink.lock().unwrap().push(call.signature.clone());
        None
    });

    let _ = overloaded["overloaded(uint256,uint256)"]
        .call(vec![json!(1), json!(2)])
        .unwrap();
    let _ = overloaded["overloaded(uint256,bool)"]
        .call(vec![json!(1), json!(false)])
        .unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["overloaded(uint256,uint256)", "overloaded(uint256,bool)"]
    );
}

#[tokio::test]
async fn hooks_transform_and_observe() {
    let adapter = MockAdapter::new();
    let send_coin = method(&adapter, "sendCoin");
    let hooks = send_coin.hooks();
    hooks.on_call(|call| {
        let mut call = call.clone();
        call.args[1] = json!(1);
        Some(call)
    });
    let outcomes = Arc::new(Mutex::new(0));
    let counter = outcomes.clone();
    hooks.on_outcome(move |_| *counter.lock().unwrap() += 1);

    let pending = send_coin.call(vec![json!(RECEIVER), json!(100)]).unwrap();
    assert_eq!(pending.function_call().args[1], json!(1));
    assert_eq!(*outcomes.lock().unwrap(), 0);
    pending.await.unwrap();
    assert_eq!(*outcomes.lock().unwrap(), 1);
    assert_eq!(adapter.sent.lock().unwrap()[0].0.args[1], json!(1));
}

#[test]
fn method_without_spec() {
    let adapter = MockAdapter::new();
    let ping = Method::build(
        "ping",
        MethodKind::Transaction,
        &OverloadSet::<FunctionSpec>::new(),
        adapter.clone(),
    );
    assert_eq!(ping.signatures(), vec!["ping"]);
    let pending = ping.call(vec![json!("ignored")]).unwrap();
    assert!(pending.function_call().args.is_empty());
}

#[test]
fn explicit_args_and_options() {
    let adapter = MockAdapter::new();
    let deposit = method(&adapter, "deposit");
    let mut fields = serde_json::Map::new();
    fields.insert("receiver".to_string(), Value::from(RECEIVER));
    let options = CallOptions {
        value: Some(Uint256::from(5u16)),
        ..Default::default()
    };
    let pending = deposit.call_with(&Args::Named(fields), options).unwrap();
    assert_eq!(pending.function_call().args, vec![json!(RECEIVER)]);
    assert!(pending.options().has_value());
}

#[test]
fn pending_call_debug() {
    let adapter = MockAdapter::new();
    let send_coin = method(&adapter, "sendCoin");
    let pending = send_coin.call(vec![json!(RECEIVER), json!(100)]).unwrap();
    let rendered = format!("{pending:?}");
    assert!(rendered.starts_with("PendingCall"));
    assert!(rendered.contains("sendCoin(address,uint256)"));
    assert!(rendered.contains("Transaction"));
}

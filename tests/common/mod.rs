//! In memory transport shared by the integration tests.
#![allow(dead_code)]

use futures::future::{self, BoxFuture, FutureExt};
use lantern::adapter::{same_listener, Adapter, Listener, Subscription};
use lantern::call::{CallOptions, FunctionCall};
use lantern::loader::ContractData;
use lantern::{Error, EventLog};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn metacoin() -> ContractData {
    let file = std::fs::File::open(fixtures().join("MetaCoin.json")).unwrap();
    serde_json::from_reader(file).unwrap()
}

pub fn init_logging() {
    use env_logger::{Builder, Env};
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

#[derive(Default)]
pub struct MockSubscription {
    listeners: Mutex<Vec<Listener>>,
}

impl MockSubscription {
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn emit(&self, log: EventLog) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(Ok(log.clone()));
        }
    }

    pub fn emit_error(&self, message: &str) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(Err(Error::Transport(message.to_string())));
        }
    }
}

impl Subscription for MockSubscription {
    fn on(&self, listener: Listener) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_listener(&self, listener: &Listener) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !same_listener(l, listener));
    }
}

/// Records everything it is asked to do and answers with canned results.
#[derive(Default)]
pub struct MockAdapter {
    pub subscriptions: Mutex<Vec<(String, Arc<MockSubscription>)>>,
    /// Every signature `subscribe` was asked for, refused ones included
    pub subscribe_attempts: Mutex<Vec<String>>,
    /// Signature whose next subscription is refused
    pub refuse_once: Mutex<Option<String>>,
    pub calls: Mutex<Vec<FunctionCall>>,
    pub sent: Mutex<Vec<(FunctionCall, CallOptions)>>,
    pub call_result: Mutex<Vec<Value>>,
    pub receipt: Mutex<Value>,
}

impl MockAdapter {
    pub fn new() -> Arc<MockAdapter> {
        Arc::new(MockAdapter::default())
    }

    pub fn returning(values: Vec<Value>) -> Arc<MockAdapter> {
        let adapter = MockAdapter::default();
        *adapter.call_result.lock().unwrap() = values;
        Arc::new(adapter)
    }

    pub fn subscription(&self, signature: &str) -> Arc<MockSubscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|(s, _)| s == signature)
            .map(|(_, subscription)| subscription.clone())
            .unwrap()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }
}

impl Adapter for MockAdapter {
    fn subscribe(&self, signature: &str) -> Result<Arc<dyn Subscription>, Error> {
        self.subscribe_attempts
            .lock()
            .unwrap()
            .push(signature.to_string());
        let mut refuse = self.refuse_once.lock().unwrap();
        if refuse.as_deref() == Some(signature) {
            *refuse = None;
            return Err(Error::Transport(format!("refused {signature}")));
        }
        drop(refuse);
        let subscription = Arc::new(MockSubscription::default());
        self.subscriptions
            .lock()
            .unwrap()
            .push((signature.to_string(), subscription.clone()));
        Ok(subscription)
    }

    fn call(&self, call: FunctionCall) -> BoxFuture<'static, Result<Vec<Value>, Error>> {
        self.calls.lock().unwrap().push(call);
        let result = self.call_result.lock().unwrap().clone();
        future::ready(Ok(result)).boxed()
    }

    fn send(
        &self,
        call: FunctionCall,
        options: CallOptions,
    ) -> BoxFuture<'static, Result<Value, Error>> {
        self.sent.lock().unwrap().push((call, options));
        let receipt = self.receipt.lock().unwrap().clone();
        future::ready(Ok(receipt)).boxed()
    }
}

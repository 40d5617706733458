//! The transport side of a contract. No network transport ships with this
//! crate, anything able to run calls and stream event records can
//! implement [`Adapter`].

use crate::call::{CallOptions, FunctionCall};
use crate::error::Error;
use crate::event::EventLog;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

/// Receives every record, or transport error, of one subscription.
pub type Listener = Arc<dyn Fn(Result<EventLog, Error>) + Send + Sync>;

/// Listener identity is the allocation, not the vtable.
pub fn same_listener(a: &Listener, b: &Listener) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// A live stream of event records for one event signature.
pub trait Subscription: Send + Sync {
    fn on(&self, listener: Listener);

    /// Detaches `listener`, a no-op when it was never attached.
    fn remove_listener(&self, listener: &Listener);
}

pub trait Adapter: Send + Sync {
    /// Opens a subscription to the records of the event with the canonical
    /// `signature`.
    fn subscribe(&self, signature: &str) -> Result<Arc<dyn Subscription>, Error>;

    /// Runs a read only call, resolving to the positional return values.
    fn call(&self, call: FunctionCall) -> BoxFuture<'static, Result<Vec<Value>, Error>>;

    /// Submits a transaction, resolving to whatever receipt the transport
    /// produces.
    fn send(
        &self,
        call: FunctionCall,
        options: CallOptions,
    ) -> BoxFuture<'static, Result<Value, Error>>;
}

//! Typed event subscriptions.
//!
//! An [`Event`] fronts every overload of one event name. The first handler
//! added opens one transport subscription per overload signature, those
//! subscriptions then live as long as the `Event` does. Inbound records are
//! matched to an overload by recomputing each known signature's hash and
//! comparing, then decoded through the overload's `output` spec.

use crate::abi::signature::hash_matches;
use crate::adapter::{Adapter, Listener, Subscription};
use crate::codec::{convert_output, convert_result_obj};
use crate::error::Error;
use crate::spec::{EventSpec, OverloadSet};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A raw event record as a transport delivers it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    /// Hash of the canonical signature, `0x` prefixed
    pub signature: String,
    /// Decoded fields keyed by position (`"0"`, `"1"`, ...) and usually by
    /// name as well
    #[serde(default)]
    pub return_values: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
}

/// What handlers receive for every record.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedEvent {
    pub event: EventLog,
    /// The canonical signature the record matched
    pub signature: String,
    pub data: Map<String, Value>,
}

/// Error first callback, errors being transport failures, records matching
/// no known signature and records failing to decode.
pub type EventHandler = Arc<dyn Fn(Result<TypedEvent, Error>) + Send + Sync>;

fn handler_key(handler: &EventHandler) -> usize {
    Arc::as_ptr(handler) as *const () as usize
}

#[derive(Default)]
struct EventState {
    subscriptions: Vec<Arc<dyn Subscription>>,
    /// Caller handler identity to the listener attached on its behalf
    wrapped: Vec<(usize, Listener)>,
}

pub struct Event {
    name: String,
    specs: Arc<OverloadSet<EventSpec>>,
    adapter: Arc<dyn Adapter>,
    state: Mutex<EventState>,
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("signatures", &self.specs.signatures())
            .field("active", &self.is_active())
            .finish()
    }
}

impl Event {
    pub fn new(name: &str, specs: OverloadSet<EventSpec>, adapter: Arc<dyn Adapter>) -> Event {
        Event {
            name: name.to_string(),
            specs: Arc::new(specs),
            adapter,
            state: Mutex::new(EventState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signatures(&self) -> Vec<&str> {
        self.specs.signatures()
    }

    fn state(&self) -> MutexGuard<'_, EventState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True once every signature has a subscription, which never reverts.
    pub fn is_active(&self) -> bool {
        let opened = self.state().subscriptions.len();
        opened > 0 && opened == self.specs.len()
    }

    pub fn listener_count(&self) -> usize {
        self.state().wrapped.len()
    }

    /// Registers `handler`. Adding the same handler twice does nothing.
    ///
    /// Subscriptions are opened under the state lock so concurrent first
    /// calls open exactly one subscription per signature. When the transport
    /// refuses one, the ones already opened are kept and the next call only
    /// opens what is missing.
    pub fn add_listener(&self, handler: EventHandler) -> Result<(), Error> {
        let key = handler_key(&handler);
        let mut state = self.state();
        if state.wrapped.iter().any(|(k, _)| *k == key) {
            return Ok(());
        }

        // resumes after a failed open, never reopening a signature
        let opened = state.subscriptions.len();
        for spec in self.specs.iter().skip(opened) {
            debug!("Subscribing to {}", spec.signature);
            let subscription = self.adapter.subscribe(&spec.signature)?;
            state.subscriptions.push(subscription);
        }

        let listener = self.wrap(handler);
        for subscription in &state.subscriptions {
            subscription.on(listener.clone());
        }
        state.wrapped.push((key, listener));
        Ok(())
    }

    /// Detaches `handler` from every subscription. Unknown handlers are
    /// ignored. Subscriptions stay open even when no handler is left.
    pub fn remove_listener(&self, handler: &EventHandler) {
        let key = handler_key(handler);
        let mut state = self.state();
        if let Some(position) = state.wrapped.iter().position(|(k, _)| *k == key) {
            let (_, listener) = state.wrapped.remove(position);
            for subscription in &state.subscriptions {
                subscription.remove_listener(&listener);
            }
        }
    }

    fn wrap(&self, handler: EventHandler) -> Listener {
        let specs = self.specs.clone();
        Arc::new(move |record: Result<EventLog, Error>| {
            handler(record.and_then(|log| decode(&specs, log)));
        })
    }
}

/// Matches `log` to the first overload whose signature hashes to the
/// record's signature and decodes its payload.
fn decode(specs: &OverloadSet<EventSpec>, log: EventLog) -> Result<TypedEvent, Error> {
    trace!("Event record {:?}", log);
    let spec = specs
        .iter()
        .find(|spec| hash_matches(&log.signature, &spec.signature))
        .ok_or_else(|| Error::SignatureMatch(log.signature.clone()))?;
    let values = convert_result_obj(spec.output.len(), &log.return_values);
    let data = convert_output(&spec.output, &values)?;
    Ok(TypedEvent {
        signature: spec.signature.clone(),
        event: log,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::signature_hash;
    use crate::spec::ParamSpec;
    use crate::types::ParamType;
    use serde_json::json;

    fn transfer_specs() -> OverloadSet<EventSpec> {
        OverloadSet::from_iter(vec![
            EventSpec::new(
                "Transfer",
                vec![
                    ParamSpec::new("from", Arc::new(ParamType::Address)),
                    ParamSpec::new("to", Arc::new(ParamType::Address)),
                    ParamSpec::new("value", Arc::new(ParamType::uint(256))),
                ],
            ),
            EventSpec::new(
                "Transfer",
                vec![ParamSpec::new("memo", Arc::new(ParamType::String))],
            ),
        ])
    }

    #[test]
    fn decode_matches_overload_by_hash() {
        let specs = transfer_specs();
        let log = EventLog {
            signature: signature_hash("Transfer(string)"),
            return_values: json!({"0": "0x6869", "memo": "0x6869"})
                .as_object()
                .cloned()
                .unwrap(),
            ..Default::default()
        };
        let typed = decode(&specs, log.clone()).unwrap();
        assert_eq!(typed.signature, "Transfer(string)");
        assert_eq!(Value::Object(typed.data), json!({"memo": "hi"}));
        assert_eq!(typed.event, log);
    }

    #[test]
    fn decode_unknown_hash() {
        let log = EventLog {
            signature: "0xdeadbeef".to_string(),
            ..Default::default()
        };
        let err = decode(&transfer_specs(), log).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Event signature \"0xdeadbeef\" could not be matched"
        );
    }

    #[test]
    fn event_log_field_names() {
        let log: EventLog = serde_json::from_value(json!({
            "signature": "0x01",
            "returnValues": {"0": 1},
            "blockNumber": 7,
            "transactionHash": "0xab",
            "logIndex": 0
        }))
        .unwrap();
        assert_eq!(log.block_number, Some(7));
        assert_eq!(log.log_index, Some(0));
        assert_eq!(log.return_values.get("0"), Some(&json!(1)));
    }
}

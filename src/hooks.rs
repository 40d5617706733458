//! Interception points around call construction.
//!
//! One [`HookManager`] belongs to one method and is shared by every overload
//! of it, so a hook registered once applies whichever overload is called.
//! Hooks run in registration order.

use crate::call::{CallOutcome, FunctionCall};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Sees each call right after encoding. Returning `Some` replaces the call
/// handed to the next hook and finally to the transport.
pub type CallHook = Arc<dyn Fn(&FunctionCall) -> Option<FunctionCall> + Send + Sync>;

/// Sees the outcome of each call once the transport resolved it.
pub type OutcomeHook = Arc<dyn Fn(&CallOutcome) + Send + Sync>;

#[derive(Default)]
pub struct HookManager {
    call: RwLock<Vec<CallHook>>,
    outcome: RwLock<Vec<OutcomeHook>>,
}

impl fmt::Debug for HookManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HookManager")
            .field("call", &self.call_hook_count())
            .field("outcome", &self.outcome_hook_count())
            .finish()
    }
}

impl HookManager {
    pub fn new() -> Arc<HookManager> {
        Arc::new(HookManager::default())
    }

    /// The registration surface handed out to callers.
    pub fn create_hooks(self: &Arc<Self>) -> Hooks {
        Hooks {
            manager: self.clone(),
        }
    }

    pub fn call_hook_count(&self) -> usize {
        self.call.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn outcome_hook_count(&self) -> usize {
        self.outcome
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub(crate) fn run_call_hooks(&self, mut call: FunctionCall) -> FunctionCall {
        // copied out so hooks may register further hooks
        let hooks = self
            .call
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            if let Some(replaced) = hook(&call) {
                call = replaced;
            }
        }
        call
    }

    pub(crate) fn run_outcome_hooks(&self, outcome: &CallOutcome) {
        let hooks = self
            .outcome
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            hook(outcome);
        }
    }
}

/// Cheap to clone handle for registering hooks on a method.
#[derive(Clone, Debug)]
pub struct Hooks {
    manager: Arc<HookManager>,
}

impl Hooks {
    pub fn on_call<F>(&self, hook: F)
    where
        F: Fn(&FunctionCall) -> Option<FunctionCall> + Send + Sync + 'static,
    {
        self.manager
            .call
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(hook));
    }

    pub fn on_outcome<F>(&self, hook: F)
    where
        F: Fn(&CallOutcome) + Send + Sync + 'static,
    {
        self.manager
            .outcome
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(hook));
    }
}

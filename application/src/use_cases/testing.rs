//! Scripted invoker shared by the use case tests.

use crate::ports::model_invoker::{InvocationRequest, InvokerError, ModelInvoker};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Replies are queued per model id and consumed in order; every request
/// is recorded.
pub(crate) struct ScriptedInvoker {
    replies: Mutex<HashMap<String, VecDeque<Result<String, InvokerError>>>>,
    calls: Mutex<Vec<InvocationRequest>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, model: &str, text: &str) -> Self {
        self.push(model, Ok(text.to_string()))
    }

    pub fn fail(self, model: &str, error: &str) -> Self {
        self.push(model, Err(InvokerError::RequestFailed(error.to_string())))
    }

    fn push(self, model: &str, reply: Result<String, InvokerError>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<InvocationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, model: &str) -> Vec<InvocationRequest> {
        self.calls()
            .into_iter()
            .filter(|r| r.model == model)
            .collect()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, request: InvocationRequest) -> Result<String, InvokerError> {
        let model = request.model.clone();
        self.calls.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .get_mut(&model)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(InvokerError::RequestFailed(format!("no reply for {}", model))))
    }
}

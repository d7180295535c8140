use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use quill_core::{CompletionModel, CompletionRequest, Error, Result};

/// Model that replays a fixed list of answers and records every request.
///
/// `Err` entries are returned as `Error::Service`. Once the script runs out,
/// every further call fails.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedModel {
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<String, String>>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

impl fmt::Debug for ScriptedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedModel")
            .field("remaining", &self.remaining())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait::async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        lock(&self.requests).push(request.clone());
        match lock(&self.responses).pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(Error::Service(message)),
            None => Err(Error::Service("No scripted response left".to_string())),
        }
    }
}

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gw_core::{GenerationOptions, Generator, Result};

/// Offline generator for tests and dry runs. Replays queued responses in
/// order, then falls back to an empty JSON object.
#[derive(Debug, Default)]
pub struct DummyModel {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl DummyModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn generate_text(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().expect("responses lock poisoned");
        Ok(responses.pop_front().unwrap_or_else(|| "{}".to_string()))
    }
}

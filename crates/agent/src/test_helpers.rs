//! Shared test helpers for session tests.

use skyline_core::error::ProviderError;
use skyline_core::message::Message;
use skyline_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted results.
///
/// Each call to `complete` returns the next result in the queue and records
/// the request. Panics if more calls are made than results provided.
pub struct SequentialMockProvider {
    results: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(results: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let results = self.results.lock().unwrap();
        let call = requests.len();

        if call >= results.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{call}, have {})",
                results.len()
            );
        }

        requests.push(request);
        results[call].clone()
    }
}

/// A successful text reply.
pub fn reply(text: &str) -> Result<ProviderResponse, ProviderError> {
    Ok(ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    })
}

pub fn failure(error: ProviderError) -> Result<ProviderResponse, ProviderError> {
    Err(error)
}

//! Extraction-service client contract and an in-memory mock

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Body of a generate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Response format requested from the service; always `"json"` here.
    pub format: String,
    pub stream: bool,
}

impl GenerateRequest {
    /// A non-streaming request asking for a JSON response.
    pub fn json(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            format: "json".to_string(),
            stream: false,
        }
    }
}

/// Body returned by a generate call. `response` holds the model output,
/// which should itself be a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Errors from the extraction service.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("cannot connect to extraction service at {0}")]
    Connection(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("http client error: {0}")]
    Http(String),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response parse error: {0}")]
    ResponseParse(String),
    #[error("model output is not usable: {0}")]
    InvalidOutput(String),
}

/// Client for the extraction service.
///
/// Abstracts over transport so extractors don't depend on how the
/// service is reached.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Status(u16),
    Unreachable,
}

/// Mock client for testing — returns preconfigured replies and counts calls.
///
/// Replies are served in order; the last one repeats once the list is
/// exhausted.
pub struct MockClient {
    replies: Vec<MockReply>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockClient {
    fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `response` as the model output.
    pub fn responding(response: impl Into<String>) -> Self {
        Self::with_replies(vec![MockReply::Text(response.into())])
    }

    /// Answer with each response in turn.
    pub fn sequence<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(responses.into_iter().map(|r| MockReply::Text(r.into())).collect())
    }

    /// Fail every call with a non-success HTTP status.
    pub fn failing_with_status(status: u16) -> Self {
        Self::with_replies(vec![MockReply::Status(status)])
    }

    /// Fail every call as if the service were down.
    pub fn unreachable() -> Self {
        Self::with_replies(vec![MockReply::Unreachable])
    }

    /// Number of generate calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt);
        }

        let reply = self
            .replies
            .get(call)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(MockReply::Unreachable);

        match reply {
            MockReply::Text(response) => Ok(GenerateResponse { response }),
            MockReply::Status(status) => Err(LlmError::Status {
                status,
                body: "mock failure".to_string(),
            }),
            MockReply::Unreachable => Err(LlmError::Connection("mock://unreachable".to_string())),
        }
    }
}

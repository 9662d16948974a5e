//! In-memory transport for executor and flow tests

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::token::TokenRequestExecutor;
use crate::transport::{FormRequest, Transport, TransportError, TransportResponse};

pub(crate) const TEST_TOKEN_ENDPOINT: &str = "https://accounts.example.com/api/token";

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<FormRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn replying(status: u16, body: &str) -> Arc<Self> {
        let transport = Arc::new(Self::default());
        transport.push(Ok(TransportResponse::new(status, body)));
        transport
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        let transport = Arc::new(Self::default());
        transport.push(Err(TransportError::new(message)));
        transport
    }

    pub(crate) fn push(&self, reply: Result<TransportResponse, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub(crate) fn requests(&self) -> Vec<FormRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn only_request(&self) -> FormRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

impl Transport for ScriptedTransport {
    fn post_form<'a>(
        &'a self,
        request: &'a FormRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted reply left")));
        Box::pin(async move { reply })
    }
}

pub(crate) fn executor(transport: &Arc<ScriptedTransport>) -> TokenRequestExecutor {
    TokenRequestExecutor::new(transport.clone()).with_token_endpoint(TEST_TOKEN_ENDPOINT)
}

pub(crate) fn form_fields(request: &FormRequest) -> Vec<(&'static str, &str)> {
    request
        .form
        .iter()
        .map(|(key, value)| (*key, value.as_str()))
        .collect()
}

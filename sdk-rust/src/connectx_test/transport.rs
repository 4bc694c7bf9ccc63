use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    errors::{ConnectXError, ConnectXResult},
    transport::{PostRequest, Transport},
};

/// Result for a mocked `post_json` call.
pub enum MockPostResult {
    Ok,
    Error(ConnectXError),
}

impl MockPostResult {
    /// Construct a result that yields the provided error.
    pub fn error(error: ConnectXError) -> Self {
        Self::Error(error)
    }
}

impl From<ConnectXResult<()>> for MockPostResult {
    fn from(result: ConnectXResult<()>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(error) => Self::Error(error),
        }
    }
}

#[derive(Default)]
struct MockTransportState {
    mocked_post_results: VecDeque<MockPostResult>,
    mocked_get_results: VecDeque<ConnectXResult<Option<String>>>,
    tracked_posts: Vec<PostRequest>,
    tracked_gets: Vec<String>,
}

impl MockTransportState {
    fn reset(&mut self) {
        self.tracked_posts.clear();
        self.tracked_gets.clear();
    }

    fn restore(&mut self) {
        self.mocked_post_results.clear();
        self.mocked_get_results.clear();
        self.reset();
    }
}

/// A mock transport that records requests and replays queued results.
///
/// With nothing queued, posts succeed and GETs return `Ok(None)`. Clones
/// share state, so a clone can be handed to the client while the test keeps
/// another for assertions.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    /// Construct a new mock transport instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue the result of the next unanswered `post_json`.
    pub fn enqueue_post<R>(&self, result: R) -> &Self
    where
        R: Into<MockPostResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_post_results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a successful GET body.
    pub fn enqueue_get_text(&self, body: impl Into<String>) -> &Self {
        self.enqueue_get(Ok(Some(body.into())))
    }

    /// Enqueue the raw result of the next unanswered `get_text`.
    pub fn enqueue_get(&self, result: ConnectXResult<Option<String>>) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_get_results.push_back(result);
        drop(state);
        self
    }

    /// Retrieve the tracked POST requests accumulated so far.
    pub fn tracked_posts(&self) -> Vec<PostRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_posts.clone()
    }

    /// Retrieve the URLs of tracked GET requests.
    pub fn tracked_gets(&self) -> Vec<String> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_gets.clone()
    }

    /// Reset tracked requests without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear both tracked requests and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, request: PostRequest) -> ConnectXResult<()> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_posts.push(request);

        match state.mocked_post_results.pop_front() {
            None | Some(MockPostResult::Ok) => Ok(()),
            Some(MockPostResult::Error(error)) => Err(error),
        }
    }

    async fn get_text(&self, url: &str) -> ConnectXResult<Option<String>> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_gets.push(url.to_string());
        state.mocked_get_results.pop_front().unwrap_or(Ok(None))
    }
}

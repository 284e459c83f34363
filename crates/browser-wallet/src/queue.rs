use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

use crate::types::{WalletRequest, WalletResponse};

/// Requests waiting for the page, and answers waiting for their requester.
///
/// A request stays at the front of the queue until it is answered or withdrawn, so the page
/// reads the same request until it reports back.
#[derive(Debug, Default)]
pub(crate) struct RequestQueue {
    requests: VecDeque<WalletRequest>,
    responses: HashMap<Uuid, WalletResponse>,
}

impl RequestQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_request(&mut self, request: WalletRequest) {
        self.requests.push_back(request);
    }

    pub(crate) fn has_request(&self, id: &Uuid) -> bool {
        self.requests.iter().any(|req| req.id == *id)
    }

    pub(crate) fn read_request(&self) -> Option<&WalletRequest> {
        self.requests.front()
    }

    pub(crate) fn remove_request(&mut self, id: &Uuid) {
        self.requests.retain(|req| req.id != *id);
    }

    /// Stores the answer to `id` and retires the request.
    pub(crate) fn add_response(&mut self, response: WalletResponse) {
        self.remove_request(&response.id);
        self.responses.insert(response.id, response);
    }

    /// Takes the answer to `id`, if it arrived.
    pub(crate) fn get_response(&mut self, id: &Uuid) -> Option<WalletResponse> {
        self.responses.remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.requests.clear();
        self.responses.clear();
    }
}

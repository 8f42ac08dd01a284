//! Drives [`BrowserState`] against a live [`Backend`].
//!
//! Requests run concurrently and complete in any order. Completions are
//! applied one at a time on the caller's task, so the state has a single
//! writer and stale replies are fenced off by epoch alone. Superseded
//! requests are left to finish rather than cancelled.

use futures::FutureExt;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use tracing::debug;

use crate::backend::{Backend, FilterRequest};

use super::model::{
    BackendRequest, BrowserAction, BrowserState, Completion, ImageSource, apply_completion,
    reduce_browser_state,
};
use super::view::{BrowserViewModel, compute_view_model};

pub struct Browser<B> {
    backend: B,
    state: BrowserState,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl<B: Backend> Browser<B> {
    pub fn new(backend: B, state: BrowserState) -> Self {
        Self {
            backend,
            state,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn view(&self) -> BrowserViewModel {
        compute_view_model(&self.state)
    }

    /// Number of requests issued but not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Apply a user action and start the requests it implies.
    pub fn dispatch(&mut self, action: BrowserAction) {
        debug!("Dispatching {action:?}");
        let state = std::mem::take(&mut self.state);
        let (state, requests) = reduce_browser_state(state, action);
        self.state = state;
        self.issue_all(requests);
    }

    /// Wait for the next request to finish and apply it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        let Some(completion) = self.in_flight.next().await else {
            return false;
        };
        let state = std::mem::take(&mut self.state);
        let (state, requests) = apply_completion(state, completion);
        self.state = state;
        self.issue_all(requests);
        true
    }

    /// Apply completions until no request remains in flight, including
    /// follow-up requests started along the way.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn issue_all(&mut self, requests: Vec<BackendRequest>) {
        for request in requests {
            self.issue(request);
        }
    }

    fn issue(&mut self, request: BackendRequest) {
        let future = match request {
            BackendRequest::Initial { epoch } => {
                let call = self.backend.initial();
                async move {
                    Completion::Images {
                        source: ImageSource::Initial,
                        epoch,
                        result: call.await,
                    }
                }
                .boxed()
            }
            BackendRequest::Search { epoch, query } => {
                let call = self.backend.search(&query);
                async move {
                    Completion::Images {
                        source: ImageSource::Search(query),
                        epoch,
                        result: call.await,
                    }
                }
                .boxed()
            }
            BackendRequest::Filter {
                epoch,
                filters,
                puzzle_ids,
                game_state,
            } => {
                let call = self.backend.filter(FilterRequest {
                    filters,
                    puzzle_ids,
                    game_state,
                });
                async move {
                    Completion::Images {
                        source: ImageSource::Filter,
                        epoch,
                        result: call.await,
                    }
                }
                .boxed()
            }
            BackendRequest::Recommendations {
                epoch,
                strategy,
                puzzle_ids,
            } => {
                let call = self.backend.recommendations(strategy, puzzle_ids);
                async move {
                    Completion::Recommendations {
                        epoch,
                        result: call.await,
                    }
                }
                .boxed()
            }
        };
        self.in_flight.push(future);
    }
}

//! In-memory fetcher that replays canned responses
//!
//! Used for offline runs and tests. Responses are queued per route; the
//! last queued response for a route is repeated once the queue drains.

use super::{HttpError, HttpFetch, HttpResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request observed by [`ScriptedFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Full URL as passed by the caller
    pub url: String,
    /// Query parameters in call order
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of a query parameter, if present
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

struct Route {
    path: String,
    param: Option<(String, String)>,
    responses: VecDeque<Result<HttpResponse, HttpError>>,
}

impl Route {
    fn matches(&self, url: &str, query: &[(&str, String)]) -> bool {
        if !url.contains(&self.path) {
            return false;
        }
        match &self.param {
            Some((key, value)) => query.iter().any(|(k, v)| k == key && v == value),
            None => true,
        }
    }

    fn next(&mut self) -> Result<HttpResponse, HttpError> {
        if self.responses.len() > 1 {
            self.responses
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
        } else {
            self.responses
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
        }
    }
}

/// Replays scripted responses keyed by URL fragment and optional query parameter
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedFetcher {
    /// Create a fetcher with no routes; every request gets a 404
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for URLs containing `path`
    pub fn on(self, path: &str, response: HttpResponse) -> Self {
        self.push(path, None, Ok(response))
    }

    /// Queue a response for URLs containing `path` whose query has `key=value`
    pub fn on_param(self, path: &str, key: &str, value: &str, response: HttpResponse) -> Self {
        self.push(path, Some((key.to_string(), value.to_string())), Ok(response))
    }

    /// Queue a transport failure for URLs containing `path`
    pub fn fail(self, path: &str, error: HttpError) -> Self {
        self.push(path, None, Err(error))
    }

    fn push(
        self,
        path: &str,
        param: Option<(String, String)>,
        response: Result<HttpResponse, HttpError>,
    ) -> Self {
        {
            let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
            match routes
                .iter_mut()
                .find(|r| r.path == path && r.param == param)
            {
                Some(route) => route.responses.push_back(response),
                None => routes.push(Route {
                    path: path.to_string(),
                    param,
                    responses: VecDeque::from([response]),
                }),
            }
        }
        self
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl HttpFetch for ScriptedFetcher {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, HttpError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                url: url.to_string(),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            });

        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        // Parameter-specific routes take precedence over path-only routes
        let index = routes
            .iter()
            .position(|r| r.param.is_some() && r.matches(url, query))
            .or_else(|| routes.iter().position(|r| r.matches(url, query)));

        match index {
            Some(i) => routes[i].next(),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

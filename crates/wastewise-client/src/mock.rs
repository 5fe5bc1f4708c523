//! Scripted transport for client tests
//!
//! A closure decides the reply for each request. Replies can yield to the
//! executor a few times before resolving so concurrent requests interleave
//! the way they do against a real server.

use std::cell::RefCell;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::{ApiRequest, HttpTransport, RawResponse};

pub struct MockReply {
    status: u16,
    body: Vec<u8>,
    yields: usize,
    failure: Option<ApiError>,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            body: serde_json::to_vec(&body).unwrap_or_default(),
            yields: 0,
            failure: None,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            yields: 0,
            failure: None,
        }
    }

    pub fn fail(error: ApiError) -> Self {
        Self {
            status: 0,
            body: Vec::new(),
            yields: 0,
            failure: Some(error),
        }
    }

    /// Stay pending for `n` executor turns before resolving
    pub fn after_yields(mut self, n: usize) -> Self {
        self.yields = n;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: crate::transport::Body,
}

type Handler = Box<dyn Fn(&ApiRequest, Option<&str>) -> MockReply>;

pub struct MockTransport {
    handler: Handler,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&ApiRequest, Option<&str>) -> MockReply + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.path == path).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse, ApiError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: request.method.clone(),
            path: request.path.clone(),
            bearer: bearer.map(str::to_string),
            body: request.body.clone(),
        });
        let reply = (self.handler)(request, bearer);
        for _ in 0..reply.yields {
            tokio::task::yield_now().await;
        }
        match reply.failure {
            Some(error) => Err(error),
            None => Ok(RawResponse {
                status: reply.status,
                body: reply.body,
            }),
        }
    }
}

// src/dispatch/backend.rs

//! Pluggable request sink abstraction.
//!
//! The runtime hands every poll's requests to a `RequestSink` instead of
//! talking to a job platform directly, so tests can swap in a recording sink.
//!
//! - `JsonLinesSink` writes one run request per line (stdout in production).
//! - `IdempotentSink` wraps another sink and drops keys it already delivered.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tracing::{debug, info};

use crate::errors::Result;
use crate::sensor::ExecutionRequest;

/// Trait abstracting where execution requests go.
pub trait RequestSink: Send {
    /// Deliver a batch of requests. An error means the batch must be treated
    /// as undelivered (the runtime will not commit the cursor).
    fn submit(
        &mut self,
        requests: Vec<ExecutionRequest>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Wire shape of one run request.
#[derive(Debug, Serialize)]
pub struct RunRequest<'a> {
    pub job: &'a str,
    pub run_key: &'a str,
    pub run_config: Value,
}

/// Writes each request as a single JSON line.
pub struct JsonLinesSink<W> {
    writer: W,
    job: String,
    op: Option<String>,
}

impl JsonLinesSink<Stdout> {
    pub fn stdout(job: impl Into<String>, op: Option<String>) -> Self {
        Self::new(tokio::io::stdout(), job, op)
    }
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W, job: impl Into<String>, op: Option<String>) -> Self {
        Self {
            writer,
            job: job.into(),
            op,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&self, request: &ExecutionRequest) -> Result<String> {
        let line = RunRequest {
            job: &self.job,
            run_key: &request.dedup_key,
            run_config: request.run_config(self.op.as_deref()),
        };
        Ok(serde_json::to_string(&line)?)
    }
}

impl<W> RequestSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn submit(
        &mut self,
        requests: Vec<ExecutionRequest>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for request in &requests {
                let mut line = self.render(request)?;
                line.push('\n');
                self.writer.write_all(line.as_bytes()).await?;
                info!(job = %self.job, run_key = %request.dedup_key, "requested run");
            }
            self.writer.flush().await?;
            Ok(())
        })
    }
}

/// Number of delivered keys `IdempotentSink::new` remembers.
pub const DEFAULT_REMEMBERED_KEYS: usize = 65_536;

/// Drops requests whose dedup key was already delivered through this sink.
///
/// Keys are only remembered once the inner sink accepted the batch. At most
/// `capacity` keys are kept; past that the oldest delivered keys are
/// forgotten first, and a forgotten key is let through again if it recurs.
pub struct IdempotentSink<S> {
    inner: S,
    delivered: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl<S: RequestSink> IdempotentSink<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, DEFAULT_REMEMBERED_KEYS)
    }

    /// `capacity` is clamped to at least one key.
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            delivered: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn remember(&mut self, keys: Vec<String>) {
        for key in keys {
            if self.delivered.insert(key.clone()) {
                self.order.push_back(key);
            }
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.delivered.remove(&oldest);
            }
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.len()
    }
}

impl<S: RequestSink> RequestSink for IdempotentSink<S> {
    fn submit(
        &mut self,
        requests: Vec<ExecutionRequest>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut seen_in_batch = HashSet::new();
            let fresh: Vec<ExecutionRequest> = requests
                .into_iter()
                .filter(|r| {
                    let is_new = !self.delivered.contains(&r.dedup_key)
                        && seen_in_batch.insert(r.dedup_key.clone());
                    if !is_new {
                        debug!(run_key = %r.dedup_key, "dropping already delivered request");
                    }
                    is_new
                })
                .collect();

            if fresh.is_empty() {
                return Ok(());
            }

            let keys = fresh.iter().map(|r| r.dedup_key.clone()).collect();
            self.inner.submit(fresh).await?;
            self.remember(keys);
            Ok(())
        })
    }
}

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tracing::debug;

use watchpoll::dispatch::RequestSink;
use watchpoll::errors::{Result, WatchpollError};
use watchpoll::sensor::ExecutionRequest;

/// A fake sink that records every batch it receives.
///
/// Cloning shares the recording, so a test can keep one clone while the
/// runtime owns the other. `fail_next` makes the next submit return an error
/// without recording anything.
#[derive(Clone, Default)]
pub struct RecordingSink {
    batches: Arc<Mutex<Vec<Vec<ExecutionRequest>>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn batches(&self) -> Vec<Vec<ExecutionRequest>> {
        self.batches.lock().unwrap().clone()
    }

    /// All delivered dedup keys, in delivery order.
    pub fn keys(&self) -> Vec<String> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .map(|r| r.dedup_key.clone())
            .collect()
    }
}

impl RequestSink for RecordingSink {
    fn submit(
        &mut self,
        requests: Vec<ExecutionRequest>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let batches = Arc::clone(&self.batches);
        let fail_next = Arc::clone(&self.fail_next);

        Box::pin(async move {
            {
                let mut fail = fail_next.lock().unwrap();
                if *fail {
                    *fail = false;
                    return Err(WatchpollError::Other(anyhow::anyhow!(
                        "recording sink told to fail"
                    )));
                }
            }
            debug!(count = requests.len(), "RecordingSink: recorded batch");
            batches.lock().unwrap().push(requests);
            Ok(())
        })
    }
}

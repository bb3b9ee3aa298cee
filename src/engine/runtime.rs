// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::dispatch::RequestSink;
use crate::errors::Result;

use super::core::SensorCore;
use super::{PollReason, RuntimeEvent, RuntimeOptions};

/// Drives the sensor in response to `RuntimeEvent`s and delivers the
/// resulting requests to a `RequestSink`.
///
/// Polls are handled one at a time by this loop, so two polls over the same
/// cursor never overlap.
pub struct Runtime<S: RequestSink> {
    core: SensorCore,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    sink: S,
    options: RuntimeOptions,
}

impl<S: RequestSink> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: RequestSink> Runtime<S> {
    pub fn new(
        core: SensorCore,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        sink: S,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            core,
            event_rx,
            sink,
            options,
        }
    }

    /// Main event loop.
    ///
    /// A failed poll is logged and the loop keeps going; the next tick retries
    /// from the last committed cursor. In `once` mode the first poll's result
    /// is returned instead.
    pub async fn run(mut self) -> Result<()> {
        info!(sensor = %self.core.name(), dir = ?self.core.source_dir(), "watchpoll runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::PollRequested { reason } => {
                    let result = self.tick(reason).await;
                    if self.options.once {
                        result?;
                        info!("single poll finished; stopping runtime");
                        break;
                    }
                    if let Err(err) = result {
                        error!(sensor = %self.core.name(), error = %err, "poll failed; cursor left unchanged");
                    }
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    /// One evaluate → deliver → commit cycle. Returns the number of requests
    /// handed to the sink.
    async fn tick(&mut self, reason: PollReason) -> Result<usize> {
        debug!(?reason, "polling");
        let mut outcome = self.core.evaluate()?;

        let requests = std::mem::take(&mut outcome.requests);
        let count = requests.len();
        if count > 0 {
            self.sink.submit(requests).await?;
        }

        self.core.commit(&outcome)?;
        info!(sensor = %self.core.name(), requests = count, "sensor tick complete");
        Ok(count)
    }
}

/// Spawn a task that requests a poll every `interval`, starting immediately.
///
/// The task ends when the runtime side of the channel is dropped.
pub fn spawn_ticker(interval: Duration, tx: mpsc::Sender<RuntimeEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let event = RuntimeEvent::PollRequested {
                reason: PollReason::Interval,
            };
            if tx.send(event).await.is_err() {
                debug!("runtime gone; ticker stopping");
                break;
            }
        }
    })
}

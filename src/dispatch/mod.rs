// src/dispatch/mod.rs

//! Hand-off of execution requests to the external job platform.

pub mod backend;

pub use backend::{
    DEFAULT_REMEMBERED_KEYS, IdempotentSink, JsonLinesSink, RequestSink, RunRequest,
};

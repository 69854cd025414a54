//! Shared helpers for retrying invoker tests
//!
//! [`ScriptedInvoker`] plays back a queue of attempt outcomes and records the
//! context every attempt was issued with.

#![allow(dead_code)]

use async_trait::async_trait;
use callretry_core::Code;
use callretry_transport::{AttemptContext, Status, UnaryInvoker};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

/// Outcome of one scripted attempt
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Fail with the given code
    Fail(Code),
    /// Succeed with the given response
    Succeed(u32),
    /// Never complete
    Hang,
}

/// Invoker that replays [`Step`]s, then repeats `fallback` forever
#[derive(Clone)]
pub struct ScriptedInvoker {
    steps: Arc<Mutex<VecDeque<Step>>>,
    fallback: Step,
    seen: Arc<Mutex<Vec<AttemptContext>>>,
}

impl ScriptedInvoker {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self::with_fallback(steps, Step::Succeed(0))
    }

    pub fn with_fallback(steps: impl IntoIterator<Item = Step>, fallback: Step) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            fallback,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Invoker whose every attempt fails with `code`
    pub fn always(code: Code) -> Self {
        Self::with_fallback([], Step::Fail(code))
    }

    /// Contexts of all attempts issued so far
    pub fn attempts(&self) -> Vec<AttemptContext> {
        self.seen.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl UnaryInvoker for ScriptedInvoker {
    type Request = &'static str;
    type Response = u32;

    async fn invoke(&self, ctx: &AttemptContext, _request: &&'static str) -> Result<u32, Status> {
        self.seen.lock().unwrap().push(ctx.clone());
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        match step {
            Step::Fail(code) => Err(Status::new(code, format!("attempt {} failed", ctx.attempt))),
            Step::Succeed(value) => Ok(value),
            Step::Hang => std::future::pending().await,
        }
    }
}

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

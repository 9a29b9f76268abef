// Copyright 2025 Cowboy AI, LLC.

//! Ordered step executor
//!
//! An [`ActionPipeline`] is a fixed list of named steps. Each step receives
//! the command and the state produced by the previous step and returns the
//! next state. The first error halts the pipeline and is returned as is;
//! effects of earlier steps are not undone here.

use crate::errors::TemplateResult;
use std::fmt;
use tracing::{debug, warn};

/// A single pipeline step
pub type Step<'a, C, S> = Box<dyn Fn(&C, S) -> TemplateResult<S> + 'a>;

/// A named, ordered list of steps over command `C` and state `S`
pub struct ActionPipeline<'a, C, S> {
    name: &'static str,
    steps: Vec<(&'static str, Step<'a, C, S>)>,
}

impl<'a, C, S> ActionPipeline<'a, C, S> {
    /// An empty pipeline
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn step<F>(mut self, name: &'static str, step: F) -> Self
    where
        F: Fn(&C, S) -> TemplateResult<S> + 'a,
    {
        self.steps.push((name, Box::new(step)));
        self
    }

    /// Pipeline name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(name, _)| *name).collect()
    }

    /// Run every step in order, threading the state through
    pub fn execute(&self, command: &C, initial: S) -> TemplateResult<S> {
        self.steps
            .iter()
            .try_fold(initial, |state, (step, run)| {
                debug!(pipeline = self.name, step, "executing step");
                run(command, state).map_err(|err| {
                    warn!(pipeline = self.name, step, code = err.code(), error = %err, "step failed");
                    err
                })
            })
    }
}

impl<C, S> fmt::Debug for ActionPipeline<'_, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPipeline")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .finish()
    }
}

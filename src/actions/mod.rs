// Copyright 2025 Cowboy AI, LLC.

//! Create and update pipelines for rosetta stone templates

mod create;
mod state;
mod update;

pub use create::{create_pipeline, CreatePipeline};
pub use state::{CreateState, UpdateState};
pub use update::{update_pipeline, UpdatePipeline};

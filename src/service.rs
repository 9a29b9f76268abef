// Copyright 2025 Cowboy AI, LLC.

//! Application service for rosetta stone templates

use crate::actions::{create_pipeline, update_pipeline, CreateState, UpdateState};
use crate::commands::{
    CreateRosettaStoneTemplateCommand, TemplateCommand, UpdateRosettaStoneTemplateCommand,
};
use crate::config::TemplateEngineConfig;
use crate::errors::TemplateResult;
use crate::graph::{NoTransaction, TemplateGraph, UnitOfWork};
use crate::identifiers::ThingId;
use crate::projector::GraphProjector;
use crate::template::RosettaStoneTemplate;
use tracing::{debug, info};

/// Creates, updates and loads templates over a graph adapter
///
/// Each command runs its pipeline inside one [`UnitOfWork::run`] call.
///
/// ```rust
/// use rosetta_templates::{InMemoryGraph, RosettaStoneTemplateService};
///
/// let service = RosettaStoneTemplateService::new(InMemoryGraph::new());
/// assert_eq!(service.config().subgraph_max_level, 2);
/// ```
#[derive(Debug, Clone)]
pub struct RosettaStoneTemplateService<G, U = NoTransaction> {
    graph: G,
    unit_of_work: U,
    config: TemplateEngineConfig,
}

impl<G: TemplateGraph> RosettaStoneTemplateService<G, NoTransaction> {
    /// Service with the default configuration and no transaction boundary
    pub fn new(graph: G) -> Self {
        Self::with_config(graph, TemplateEngineConfig::default())
    }

    /// Service with a custom configuration and no transaction boundary
    pub fn with_config(graph: G, config: TemplateEngineConfig) -> Self {
        Self {
            graph,
            unit_of_work: NoTransaction,
            config,
        }
    }
}

impl<G: TemplateGraph, U: UnitOfWork> RosettaStoneTemplateService<G, U> {
    /// Service that runs every pipeline inside `unit_of_work`
    pub fn with_unit_of_work(graph: G, unit_of_work: U, config: TemplateEngineConfig) -> Self {
        Self {
            graph,
            unit_of_work,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TemplateEngineConfig {
        &self.config
    }

    /// Underlying graph adapter
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Run one command's pipeline inside the unit of work
    fn run_command<C, S, F>(&self, action: &'static str, command: &C, work: F) -> TemplateResult<S>
    where
        C: TemplateCommand,
        F: FnOnce() -> TemplateResult<S>,
    {
        debug!(
            action,
            contributor = %command.contributor_id(),
            template = ?command.template_id().map(ToString::to_string),
            properties = ?command.property_definitions().map(<[_]>::len),
            "running template command"
        );
        self.unit_of_work.run(work)
    }

    /// Create a template and return the id of its root
    pub fn create(&self, command: CreateRosettaStoneTemplateCommand) -> TemplateResult<ThingId> {
        let state = self.run_command("create", &command, || {
            create_pipeline(&self.graph, &self.config).execute(&command, CreateState::default())
        })?;
        let id = state.template_id()?.clone();
        info!(template = %id, label = %command.label, properties = command.properties.len(), "rosetta stone template created");
        Ok(id)
    }

    /// Apply an update to an existing template
    pub fn update(&self, command: UpdateRosettaStoneTemplateCommand) -> TemplateResult<()> {
        let state = self.run_command("update", &command, || {
            update_pipeline(&self.graph, &self.config)
                .execute(&command, UpdateState::new(command.template_id.clone()))
        })?;
        info!(template = %command.template_id, usage = %state.usage, "rosetta stone template updated");
        Ok(())
    }

    /// Load a template
    pub fn find_by_id(&self, id: &ThingId) -> TemplateResult<RosettaStoneTemplate> {
        GraphProjector::new(&self.graph, &self.config)
            .load(id)
            .map(|(template, _)| template)
    }
}

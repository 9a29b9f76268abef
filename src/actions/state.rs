// Copyright 2025 Cowboy AI, LLC.

//! Accumulated state of the create and update pipelines

use crate::compatibility::{CompatibilityEngine, TemplateUsage};
use crate::errors::{TemplateError, TemplateResult};
use crate::identifiers::ThingId;
use crate::projector::StatementsBySubject;
use crate::template::RosettaStoneTemplate;

/// State threaded through the create pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateState {
    /// Id of the minted template root
    pub template_id: Option<ThingId>,
    /// Id of the minted target class
    pub target_class_id: Option<ThingId>,
    /// Ids of the minted property shapes in index order
    pub property_ids: Vec<ThingId>,
}

impl CreateState {
    /// The minted root, once the resource creator ran
    pub fn template_id(&self) -> TemplateResult<&ThingId> {
        self.template_id
            .as_ref()
            .ok_or(TemplateError::IncompletePipelineState("template id"))
    }
}

/// State threaded through the update pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateState {
    /// Template being updated
    pub template_id: ThingId,
    /// Current version, once loaded
    pub template: Option<RosettaStoneTemplate>,
    /// Statement bundle of the current version grouped by subject
    pub statements: StatementsBySubject,
    /// Whether statements have been authored from the template
    pub usage: TemplateUsage,
}

impl UpdateState {
    /// Fresh state for `template_id`
    pub fn new(template_id: ThingId) -> Self {
        Self {
            template_id,
            template: None,
            statements: StatementsBySubject::new(),
            usage: TemplateUsage::Unused,
        }
    }

    /// The loaded template
    pub fn template(&self) -> TemplateResult<&RosettaStoneTemplate> {
        self.template
            .as_ref()
            .ok_or_else(|| TemplateError::RosettaStoneTemplateNotFound(self.template_id.clone()))
    }

    /// Whether at least one rosetta stone statement uses the template
    pub fn is_used_in_rosetta_stone_statement(&self) -> bool {
        self.usage.is_in_use()
    }

    /// Compatibility rules for the loaded template
    pub fn compatibility(&self) -> TemplateResult<CompatibilityEngine<'_>> {
        Ok(CompatibilityEngine::new(self.template()?, self.usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_state_requires_root() {
        let state = CreateState::default();
        assert_eq!(
            state.template_id(),
            Err(TemplateError::IncompletePipelineState("template id"))
        );
    }

    #[test]
    fn test_update_state_without_template_is_not_found() {
        let state = UpdateState::new(ThingId::new("R9"));
        assert!(!state.is_used_in_rosetta_stone_statement());
        assert_eq!(
            state.template().unwrap_err(),
            TemplateError::RosettaStoneTemplateNotFound(ThingId::new("R9"))
        );
    }
}

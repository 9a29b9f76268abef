// Copyright 2025 Cowboy AI, LLC.

//! The update pipeline

use super::state::UpdateState;
use crate::commands::{TemplatePropertyDefinition, UpdateRosettaStoneTemplateCommand};
use crate::compatibility::TemplateUsage;
use crate::config::TemplateEngineConfig;
use crate::dynamic_label::DynamicLabel;
use crate::errors::{TemplateError, TemplateResult};
use crate::graph::{PageRequest, TemplateGraph};
use crate::pipeline::ActionPipeline;
use crate::projector::GraphProjector;
use crate::property_validator::PropertyValidator;
use crate::template::RosettaStoneTemplate;
use crate::vocabulary::predicates;
use tracing::debug;

/// Pipeline type of template updates
pub type UpdatePipeline<'a> = ActionPipeline<'a, UpdateRosettaStoneTemplateCommand, UpdateState>;

/// Parse the proposed label, `None` when absent
fn proposed_label(command: &UpdateRosettaStoneTemplateCommand) -> TemplateResult<Option<DynamicLabel>> {
    command
        .dynamic_label
        .as_deref()
        .map(DynamicLabel::parse)
        .transpose()
}

/// Number of leading properties the update leaves untouched
fn unchanged_prefix(current: &RosettaStoneTemplate, proposed: &[TemplatePropertyDefinition]) -> usize {
    current
        .properties
        .iter()
        .zip(proposed)
        .take_while(|(old, new)| new.matches(old))
        .count()
}

/// Build the update pipeline
///
/// The loader resolves the template and its usage state; validators then
/// check label, description, example usage, properties and dynamic label in
/// that order; updaters write only the fields that actually change.
pub fn update_pipeline<'a, G>(graph: &'a G, config: &'a TemplateEngineConfig) -> UpdatePipeline<'a>
where
    G: TemplateGraph + ?Sized,
{
    let projector = move || GraphProjector::new(graph, config);

    UpdatePipeline::new("update_rosetta_stone_template")
        .step("template_loader", move |c, mut s| {
            let (template, statements) = projector().load(&c.template_id)?;
            if !template.modifiable {
                return Err(TemplateError::RosettaStoneTemplateNotModifiable(template.id));
            }
            let probe = graph.find_instances(
                &template.id,
                PageRequest::first(config.usage_probe_page_size),
            )?;
            s.usage = TemplateUsage::from_probe(!probe.is_empty());
            debug!(template = %template.id, usage = %s.usage, "template loaded");
            s.template = Some(template);
            s.statements = statements;
            Ok(s)
        })
        .step("label_validator", move |c, s| {
            if let Some(label) = c.label.as_deref() {
                if !config.is_valid_label(label) {
                    return Err(TemplateError::InvalidLabel {
                        max_length: config.max_label_length,
                    });
                }
            }
            s.compatibility()?.check_label(c.label.as_deref())?;
            Ok(s)
        })
        .step("description_validator", move |c, s| {
            if let Some(description) = c.description.as_deref() {
                if !config.is_valid_description(description) {
                    return Err(TemplateError::InvalidDescription {
                        max_length: config.max_label_length,
                    });
                }
            }
            s.compatibility()?.check_description(c.description.as_deref())?;
            Ok(s)
        })
        .step("example_usage_validator", move |c, s| {
            if let Some(example) = c.example_usage.as_deref() {
                if !config.is_valid_description(example) {
                    return Err(TemplateError::InvalidDescription {
                        max_length: config.max_label_length,
                    });
                }
            }
            s.compatibility()?.check_example_usage(c.example_usage.as_deref())?;
            Ok(s)
        })
        .step("properties_validator", move |c, s| {
            s.compatibility()?.check_properties(c.properties.as_deref())?;
            if let Some(properties) = c.properties.as_deref() {
                PropertyValidator::new(graph, config).validate(properties)?;
            }
            Ok(s)
        })
        .step("dynamic_label_validator", move |c, s| {
            let proposed = proposed_label(c)?;
            s.compatibility()?
                .check_dynamic_label(proposed.as_ref(), c.properties.as_deref())?;

            if proposed.is_some() || c.properties.is_some() {
                let current = s.template()?;
                let label = proposed.as_ref().unwrap_or(&current.dynamic_label);
                let placeholders: Vec<Option<&str>> = match c.properties.as_deref() {
                    Some(properties) => properties.iter().map(|p| p.placeholder()).collect(),
                    None => current.placeholders(),
                };
                label.validate_coverage(&placeholders)?;
            }
            Ok(s)
        })
        .step("label_updater", move |c, s| {
            let current = s.template()?;
            if let Some(label) = c.label.as_deref().filter(|label| *label != current.label) {
                graph.update_resource_label(&current.id, label)?;
                graph.update_class_label(&current.target_class, label)?;
            }
            Ok(s)
        })
        .step("description_updater", move |c, s| {
            let current = s.template()?;
            if let Some(description) = c
                .description
                .as_deref()
                .filter(|d| Some(*d) != current.description.as_deref())
            {
                let projector = projector();
                projector.replace_literal(c.contributor_id, &s.statements, &current.id, predicates::DESCRIPTION, description)?;
                projector.replace_literal(
                    c.contributor_id,
                    &s.statements,
                    &current.target_class,
                    predicates::DESCRIPTION,
                    description,
                )?;
            }
            Ok(s)
        })
        .step("example_usage_updater", move |c, s| {
            let current = s.template()?;
            if let Some(example) = c
                .example_usage
                .as_deref()
                .filter(|e| Some(*e) != current.example_usage.as_deref())
            {
                projector().replace_literal(
                    c.contributor_id,
                    &s.statements,
                    &current.target_class,
                    predicates::EXAMPLE_OF_USAGE,
                    example,
                )?;
            }
            Ok(s)
        })
        .step("properties_updater", move |c, s| {
            let current = s.template()?;
            if let Some(proposed) = c.properties.as_deref() {
                let keep = unchanged_prefix(current, proposed);
                let projector = projector();
                for old in &current.properties[keep..] {
                    projector.delete_property(&s.statements, &current.id, old.id())?;
                }
                for (index, property) in proposed.iter().enumerate().skip(keep) {
                    projector.create_property(c.contributor_id, &current.id, index, property)?;
                }
                debug!(
                    template = %current.id,
                    kept = keep,
                    removed = current.properties.len() - keep,
                    created = proposed.len() - keep,
                    "properties updated"
                );
            }
            Ok(s)
        })
        .step("formatted_label_updater", move |c, s| {
            let current = s.template()?;
            if let Some(label) = c
                .dynamic_label
                .as_deref()
                .filter(|label| *label != current.dynamic_label.as_str())
            {
                projector().replace_literal(
                    c.contributor_id,
                    &s.statements,
                    &current.id,
                    predicates::TEMPLATE_LABEL_FORMAT,
                    label,
                )?;
            }
            Ok(s)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::create::create_pipeline;
    use crate::actions::state::CreateState;
    use crate::commands::{
        CreateRosettaStoneTemplateCommand, LiteralPropertyDefinition, ResourcePropertyDefinition,
    };
    use crate::identifiers::{ContributorId, ThingId};
    use crate::in_memory::InMemoryGraph;
    use pretty_assertions::assert_eq;

    fn subject() -> TemplatePropertyDefinition {
        TemplatePropertyDefinition::Resource(ResourcePropertyDefinition {
            label: "subject".to_string(),
            placeholder: Some("subject".to_string()),
            description: None,
            min_count: Some(1),
            max_count: None,
            path: ThingId::new(predicates::HAS_SUBJECT_POSITION),
            class: None,
        })
    }

    fn literal(placeholder: &str, min_count: u32) -> TemplatePropertyDefinition {
        TemplatePropertyDefinition::Literal(LiteralPropertyDefinition {
            label: placeholder.to_string(),
            placeholder: Some(placeholder.to_string()),
            description: None,
            min_count: Some(min_count),
            max_count: None,
            path: ThingId::new(predicates::HAS_OBJECT_POSITION),
            datatype: None,
        })
    }

    fn seed(graph: &InMemoryGraph, config: &TemplateEngineConfig) -> ThingId {
        let command = CreateRosettaStoneTemplateCommand {
            contributor_id: ContributorId::unknown(),
            label: "measurement".to_string(),
            description: "a measured value".to_string(),
            dynamic_label: "{0} has value {1}".to_string(),
            example_usage: Some("x has value".to_string()),
            properties: vec![subject(), literal("value", 1)],
            observatories: vec![],
            organizations: vec![],
        };
        create_pipeline(graph, config)
            .execute(&command, CreateState::default())
            .unwrap()
            .template_id
            .unwrap()
    }

    fn run(graph: &InMemoryGraph, config: &TemplateEngineConfig, command: &UpdateRosettaStoneTemplateCommand) -> TemplateResult<UpdateState> {
        update_pipeline(graph, config).execute(command, UpdateState::new(command.template_id.clone()))
    }

    #[test]
    fn test_step_order() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        assert_eq!(
            update_pipeline(&graph, &config).step_names(),
            vec![
                "template_loader",
                "label_validator",
                "description_validator",
                "example_usage_validator",
                "properties_validator",
                "dynamic_label_validator",
                "label_updater",
                "description_updater",
                "example_usage_updater",
                "properties_updater",
                "formatted_label_updater",
            ]
        );
    }

    #[test]
    fn test_loader_computes_usage() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let id = seed(&graph, &config);
        let command = UpdateRosettaStoneTemplateCommand::new(id.clone(), ContributorId::unknown());

        assert!(!run(&graph, &config, &command).unwrap().is_used_in_rosetta_stone_statement());

        graph.record_instance(ContributorId::unknown(), &id).unwrap();
        assert!(run(&graph, &config, &command).unwrap().is_used_in_rosetta_stone_statement());
    }

    #[test]
    fn test_unmodifiable_template_is_rejected() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let id = seed(&graph, &config);
        graph.freeze_resource(&id).unwrap();

        let command = UpdateRosettaStoneTemplateCommand::new(id.clone(), ContributorId::unknown());
        assert_eq!(
            run(&graph, &config, &command).unwrap_err(),
            TemplateError::RosettaStoneTemplateNotModifiable(id)
        );
    }

    #[test]
    fn test_unused_template_is_rewritten() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let id = seed(&graph, &config);

        let mut command = UpdateRosettaStoneTemplateCommand::new(id.clone(), ContributorId::unknown());
        command.label = Some("reading".to_string());
        command.description = Some("a reading".to_string());
        command.example_usage = Some("thermometer reads 20".to_string());
        command.dynamic_label = Some("{0} reads {1} [in {2}]".to_string());
        command.properties = Some(vec![subject(), literal("reading", 1), literal("unit", 0)]);
        run(&graph, &config, &command).unwrap();

        let (template, _) = GraphProjector::new(&graph, &config).load(&id).unwrap();
        assert_eq!(template.label, "reading");
        assert_eq!(template.description.as_deref(), Some("a reading"));
        assert_eq!(template.example_usage.as_deref(), Some("thermometer reads 20"));
        assert_eq!(template.dynamic_label.as_str(), "{0} reads {1} [in {2}]");
        let placeholders = template.placeholders();
        assert_eq!(placeholders, vec![Some("subject"), Some("reading"), Some("unit")]);
    }

    #[test]
    fn test_properties_without_label_must_stay_covered() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let id = seed(&graph, &config);

        let mut command = UpdateRosettaStoneTemplateCommand::new(id, ContributorId::unknown());
        command.properties = Some(vec![subject(), literal("value", 1), literal("unit", 0)]);
        assert_eq!(
            run(&graph, &config, &command).unwrap_err(),
            TemplateError::MissingDynamicLabelPlaceholder {
                index: 2,
                placeholder: Some("unit".to_string()),
            }
        );
    }

    #[test]
    fn test_unchanged_prefix() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let id = seed(&graph, &config);
        let (template, _) = GraphProjector::new(&graph, &config).load(&id).unwrap();

        assert_eq!(unchanged_prefix(&template, &[subject(), literal("value", 1)]), 2);
        assert_eq!(unchanged_prefix(&template, &[subject(), literal("other", 1)]), 1);
        assert_eq!(unchanged_prefix(&template, &[literal("value", 1)]), 0);
    }
}

// Copyright 2025 Cowboy AI, LLC.

//! The create pipeline

use super::state::CreateState;
use crate::commands::CreateRosettaStoneTemplateCommand;
use crate::config::TemplateEngineConfig;
use crate::dynamic_label::DynamicLabel;
use crate::errors::TemplateError;
use crate::graph::TemplateGraph;
use crate::identifiers::{ObservatoryId, OrganizationId};
use crate::pipeline::ActionPipeline;
use crate::projector::GraphProjector;
use crate::property_validator::PropertyValidator;

/// Pipeline type of template creation
pub type CreatePipeline<'a> = ActionPipeline<'a, CreateRosettaStoneTemplateCommand, CreateState>;

/// Build the create pipeline
///
/// Validators run before any creator so a rejected command leaves the graph
/// untouched. Creators then write the root, the formatted label, the
/// properties in index order, the target class and the closed marker.
pub fn create_pipeline<'a, G>(graph: &'a G, config: &'a TemplateEngineConfig) -> CreatePipeline<'a>
where
    G: TemplateGraph + ?Sized,
{
    let projector = move || GraphProjector::new(graph, config);

    CreatePipeline::new("create_rosetta_stone_template")
        .step("label_validator", move |c, s| {
            if !config.is_valid_label(&c.label) {
                return Err(TemplateError::InvalidLabel {
                    max_length: config.max_label_length,
                });
            }
            Ok(s)
        })
        .step("description_validator", move |c, s| {
            if !config.is_valid_description(&c.description) {
                return Err(TemplateError::InvalidDescription {
                    max_length: config.max_label_length,
                });
            }
            Ok(s)
        })
        .step("example_usage_validator", move |c, s| {
            match c.example_usage.as_deref() {
                Some(example) if !config.is_valid_description(example) => {
                    Err(TemplateError::InvalidDescription {
                        max_length: config.max_label_length,
                    })
                }
                _ => Ok(s),
            }
        })
        .step("properties_validator", move |c, s| {
            PropertyValidator::new(graph, config).validate(&c.properties)?;
            Ok(s)
        })
        .step("dynamic_label_validator", move |c, s| {
            let placeholders: Vec<Option<&str>> =
                c.properties.iter().map(|p| p.placeholder()).collect();
            DynamicLabel::parse(c.dynamic_label.as_str())?.validate_coverage(&placeholders)?;
            Ok(s)
        })
        .step("resource_creator", move |c, mut s| {
            let template_id = projector().create_root(
                c.contributor_id,
                &c.label,
                c.observatories.first().copied().unwrap_or_else(ObservatoryId::unknown),
                c.organizations.first().copied().unwrap_or_else(OrganizationId::unknown),
            )?;
            s.template_id = Some(template_id);
            Ok(s)
        })
        .step("formatted_label_creator", move |c, s| {
            projector().create_formatted_label(c.contributor_id, s.template_id()?, &c.dynamic_label)?;
            Ok(s)
        })
        .step("properties_creator", move |c, mut s| {
            let root = s.template_id()?.clone();
            for (index, property) in c.properties.iter().enumerate() {
                let shape = projector().create_property(c.contributor_id, &root, index, property)?;
                s.property_ids.push(shape);
            }
            Ok(s)
        })
        .step("target_class_creator", move |c, mut s| {
            let class = projector().create_target_class(
                c.contributor_id,
                s.template_id()?,
                &c.label,
                &c.description,
                c.example_usage.as_deref(),
            )?;
            s.target_class_id = Some(class);
            Ok(s)
        })
        .step("closed_marker_creator", move |c, s| {
            projector().create_closed_marker(c.contributor_id, s.template_id()?)?;
            Ok(s)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{LiteralPropertyDefinition, ResourcePropertyDefinition, TemplatePropertyDefinition};
    use crate::identifiers::{ContributorId, ThingId};
    use crate::in_memory::InMemoryGraph;
    use crate::vocabulary::predicates;

    fn command(dynamic_label: &str) -> CreateRosettaStoneTemplateCommand {
        CreateRosettaStoneTemplateCommand {
            contributor_id: ContributorId::unknown(),
            label: "measurement".to_string(),
            description: "a measured value".to_string(),
            dynamic_label: dynamic_label.to_string(),
            example_usage: None,
            properties: vec![
                TemplatePropertyDefinition::Resource(ResourcePropertyDefinition {
                    label: "subject".to_string(),
                    placeholder: Some("subject".to_string()),
                    description: None,
                    min_count: Some(1),
                    max_count: None,
                    path: ThingId::new(predicates::HAS_SUBJECT_POSITION),
                    class: None,
                }),
                TemplatePropertyDefinition::Literal(LiteralPropertyDefinition {
                    label: "value".to_string(),
                    placeholder: Some("value".to_string()),
                    description: None,
                    min_count: Some(1),
                    max_count: None,
                    path: ThingId::new(predicates::HAS_OBJECT_POSITION),
                    datatype: None,
                }),
            ],
            observatories: vec![],
            organizations: vec![],
        }
    }

    #[test]
    fn test_step_order() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        assert_eq!(
            create_pipeline(&graph, &config).step_names(),
            vec![
                "label_validator",
                "description_validator",
                "example_usage_validator",
                "properties_validator",
                "dynamic_label_validator",
                "resource_creator",
                "formatted_label_creator",
                "properties_creator",
                "target_class_creator",
                "closed_marker_creator",
            ]
        );
    }

    #[test]
    fn test_creates_template() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let state = create_pipeline(&graph, &config)
            .execute(&command("{0} has value {1}"), CreateState::default())
            .unwrap();

        assert!(state.template_id.is_some());
        assert!(state.target_class_id.is_some());
        assert_eq!(state.property_ids.len(), 2);
    }

    #[test]
    fn test_rejected_command_writes_nothing() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let before = graph.statement_count().unwrap();

        let err = create_pipeline(&graph, &config)
            .execute(&command("{0} has a value"), CreateState::default())
            .unwrap_err();

        assert_eq!(
            err,
            TemplateError::MissingDynamicLabelPlaceholder {
                index: 1,
                placeholder: Some("value".to_string()),
            }
        );
        assert_eq!(graph.statement_count().unwrap(), before);
    }

    #[test]
    fn test_invalid_label_is_rejected_first() {
        let graph = InMemoryGraph::new();
        let config = TemplateEngineConfig::default();
        let mut command = command("{0} has a value");
        command.label = "two\nlines".to_string();

        let err = create_pipeline(&graph, &config)
            .execute(&command, CreateState::default())
            .unwrap_err();
        assert_eq!(err, TemplateError::InvalidLabel { max_length: 8164 });
    }
}

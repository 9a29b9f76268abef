// Copyright 2025 Cowboy AI, LLC.

//! In-process graph adapter
//!
//! [`InMemoryGraph`] implements every port of [`crate::graph`] over a shared
//! `Arc<RwLock<..>>`. Clones share the same graph. It also acts as a
//! [`UnitOfWork`] that restores a snapshot when the work fails.

use crate::errors::{TemplateError, TemplateResult};
use crate::graph::{
    Class, ClassHierarchy, CreateResource, GraphStatement, Literal, Page, PageRequest, Predicate,
    Resource, StatementRepository, Thing, ThingLookup, ThingWriter, UnitOfWork,
};
use crate::identifiers::{ContributorId, StatementId, ThingId};
use crate::vocabulary::{self, predicates, REQUIRED_CLASSES, REQUIRED_PREDICATES};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct StoredStatement {
    id: StatementId,
    subject: ThingId,
    predicate: ThingId,
    object: ThingId,
    created_by: ContributorId,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct GraphState {
    resources: HashMap<ThingId, Resource>,
    classes: HashMap<ThingId, Class>,
    predicates: HashMap<ThingId, Predicate>,
    literals: HashMap<ThingId, Literal>,
    statements: Vec<StoredStatement>,
    parents: HashMap<ThingId, ThingId>,
    next_id: u64,
}

impl GraphState {
    fn mint(&mut self, prefix: char) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn thing(&self, id: &ThingId) -> Option<Thing> {
        if let Some(r) = self.resources.get(id) {
            return Some(Thing::Resource(r.clone()));
        }
        if let Some(c) = self.classes.get(id) {
            return Some(Thing::Class(c.clone()));
        }
        if let Some(p) = self.predicates.get(id) {
            return Some(Thing::Predicate(p.clone()));
        }
        self.literals.get(id).cloned().map(Thing::Literal)
    }

    fn resolve(&self, stored: &StoredStatement) -> TemplateResult<GraphStatement> {
        let endpoint = |id: &ThingId| {
            self.thing(id).ok_or_else(|| {
                TemplateError::MalformedGraph(format!(
                    "statement {} references missing thing {id}",
                    stored.id
                ))
            })
        };
        Ok(GraphStatement {
            id: stored.id.clone(),
            subject: endpoint(&stored.subject)?,
            predicate: stored.predicate.clone(),
            object: endpoint(&stored.object)?,
            created_by: stored.created_by,
            created_at: stored.created_at,
        })
    }
}

/// Thread-safe in-memory graph
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    state: Arc<RwLock<GraphState>>,
}

impl InMemoryGraph {
    /// A graph seeded with the reserved template vocabulary
    pub fn new() -> Self {
        let graph = Self::empty();
        {
            let mut state = graph
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            for id in REQUIRED_PREDICATES.iter().chain([&predicates::HAS_TEMPLATE]) {
                state.predicates.insert(
                    vocabulary::id(id),
                    Predicate {
                        id: vocabulary::id(id),
                        label: id.to_string(),
                    },
                );
            }
            for id in REQUIRED_CLASSES {
                state.classes.insert(
                    vocabulary::id(id),
                    Class {
                        id: vocabulary::id(id),
                        label: id.to_string(),
                    },
                );
            }
        }
        graph
    }

    /// A graph without any things
    pub fn empty() -> Self {
        Self::default()
    }

    fn read(&self) -> TemplateResult<RwLockReadGuard<'_, GraphState>> {
        self.state
            .read()
            .map_err(|_| TemplateError::Storage("graph lock poisoned".to_string()))
    }

    fn write(&self) -> TemplateResult<RwLockWriteGuard<'_, GraphState>> {
        self.state
            .write()
            .map_err(|_| TemplateError::Storage("graph lock poisoned".to_string()))
    }

    /// Register a predicate under a fixed id
    pub fn add_predicate(&self, id: impl Into<String>, label: impl Into<String>) -> TemplateResult<ThingId> {
        let id = ThingId::new(id);
        self.write()?.predicates.insert(
            id.clone(),
            Predicate {
                id: id.clone(),
                label: label.into(),
            },
        );
        Ok(id)
    }

    /// Register a class under a fixed id
    pub fn add_class(&self, id: impl Into<String>, label: impl Into<String>) -> TemplateResult<ThingId> {
        let id = ThingId::new(id);
        self.write()?.classes.insert(
            id.clone(),
            Class {
                id: id.clone(),
                label: label.into(),
            },
        );
        Ok(id)
    }

    /// Record a rosetta stone statement authored from `template_id`
    ///
    /// Mints a statement resource and links it to the template, which makes
    /// the template count as in use.
    pub fn record_instance(
        &self,
        contributor_id: ContributorId,
        template_id: &ThingId,
    ) -> TemplateResult<StatementId> {
        let instance = self.create_resource(CreateResource::new(
            contributor_id,
            "rosetta stone statement",
            vocabulary::id(vocabulary::classes::ROSETTA_STONE_STATEMENT),
        ))?;
        self.create_statement(
            contributor_id,
            &instance,
            &vocabulary::id(predicates::HAS_TEMPLATE),
            template_id,
        )
    }

    /// Parent of a class, if attached
    pub fn parent_of(&self, class: &ThingId) -> TemplateResult<Option<ThingId>> {
        Ok(self.read()?.parents.get(class).cloned())
    }

    /// Number of stored statements
    pub fn statement_count(&self) -> TemplateResult<usize> {
        Ok(self.read()?.statements.len())
    }

    /// Mark a resource as not modifiable
    pub fn freeze_resource(&self, id: &ThingId) -> TemplateResult<()> {
        let mut state = self.write()?;
        let resource = state
            .resources
            .get_mut(id)
            .ok_or_else(|| TemplateError::ResourceNotFound(id.clone()))?;
        resource.modifiable = false;
        Ok(())
    }
}

impl ThingLookup for InMemoryGraph {
    fn find_predicate(&self, id: &ThingId) -> TemplateResult<Option<Predicate>> {
        Ok(self.read()?.predicates.get(id).cloned())
    }

    fn find_class(&self, id: &ThingId) -> TemplateResult<Option<Class>> {
        Ok(self.read()?.classes.get(id).cloned())
    }

    fn find_resource(&self, id: &ThingId) -> TemplateResult<Option<Resource>> {
        Ok(self.read()?.resources.get(id).cloned())
    }
}

impl ThingWriter for InMemoryGraph {
    fn create_resource(&self, request: CreateResource) -> TemplateResult<ThingId> {
        let mut state = self.write()?;
        let id = ThingId::new(state.mint('R'));
        state.resources.insert(
            id.clone(),
            Resource {
                id: id.clone(),
                label: request.label,
                classes: request.classes,
                observatory_id: request.observatory_id,
                organization_id: request.organization_id,
                created_by: request.contributor_id,
                created_at: Utc::now(),
                modifiable: request.modifiable,
            },
        );
        Ok(id)
    }

    fn create_literal(
        &self,
        _contributor_id: ContributorId,
        value: &str,
        datatype: &str,
    ) -> TemplateResult<ThingId> {
        let mut state = self.write()?;
        let id = ThingId::new(state.mint('L'));
        state.literals.insert(
            id.clone(),
            Literal {
                id: id.clone(),
                value: value.to_string(),
                datatype: datatype.to_string(),
            },
        );
        Ok(id)
    }

    fn create_class(&self, _contributor_id: ContributorId, label: &str) -> TemplateResult<ThingId> {
        let mut state = self.write()?;
        let id = ThingId::new(state.mint('C'));
        state.classes.insert(
            id.clone(),
            Class {
                id: id.clone(),
                label: label.to_string(),
            },
        );
        Ok(id)
    }

    fn update_resource_label(&self, id: &ThingId, label: &str) -> TemplateResult<()> {
        let mut state = self.write()?;
        let resource = state
            .resources
            .get_mut(id)
            .ok_or_else(|| TemplateError::ResourceNotFound(id.clone()))?;
        resource.label = label.to_string();
        Ok(())
    }

    fn update_class_label(&self, id: &ThingId, label: &str) -> TemplateResult<()> {
        let mut state = self.write()?;
        let class = state
            .classes
            .get_mut(id)
            .ok_or_else(|| TemplateError::ClassNotFound(id.clone()))?;
        class.label = label.to_string();
        Ok(())
    }

    fn delete_resource(&self, id: &ThingId) -> TemplateResult<()> {
        self.write()?.resources.remove(id);
        Ok(())
    }
}

impl StatementRepository for InMemoryGraph {
    fn create_statement(
        &self,
        contributor_id: ContributorId,
        subject: &ThingId,
        predicate: &ThingId,
        object: &ThingId,
    ) -> TemplateResult<StatementId> {
        let mut state = self.write()?;
        if state.thing(subject).is_none() {
            return Err(TemplateError::ResourceNotFound(subject.clone()));
        }
        if !state.predicates.contains_key(predicate) {
            return Err(TemplateError::PredicateNotFound(predicate.clone()));
        }
        if state.thing(object).is_none() {
            return Err(TemplateError::ResourceNotFound(object.clone()));
        }

        let id = StatementId::new(state.mint('S'));
        state.statements.push(StoredStatement {
            id: id.clone(),
            subject: subject.clone(),
            predicate: predicate.clone(),
            object: object.clone(),
            created_by: contributor_id,
            created_at: Utc::now(),
        });
        debug!(statement = %id, %subject, %predicate, %object, "statement created");
        Ok(id)
    }

    fn fetch_bundle(&self, root: &ThingId, max_level: usize) -> TemplateResult<Vec<GraphStatement>> {
        let state = self.read()?;
        let mut included = BTreeSet::new();
        let mut visited = HashSet::from([root.clone()]);
        let mut frontier = HashSet::from([root.clone()]);

        for _ in 0..max_level {
            let mut next = HashSet::new();
            for (position, statement) in state.statements.iter().enumerate() {
                if frontier.contains(&statement.subject) && included.insert(position) {
                    let expandable = state.resources.contains_key(&statement.object)
                        || state.classes.contains_key(&statement.object);
                    if expandable && visited.insert(statement.object.clone()) {
                        next.insert(statement.object.clone());
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        included
            .into_iter()
            .map(|position| state.resolve(&state.statements[position]))
            .collect()
    }

    fn find_instances(
        &self,
        template_id: &ThingId,
        page: PageRequest,
    ) -> TemplateResult<Page<StatementId>> {
        let state = self.read()?;
        let has_template = vocabulary::id(predicates::HAS_TEMPLATE);
        let matching: Vec<StatementId> = state
            .statements
            .iter()
            .filter(|s| s.predicate == has_template && &s.object == template_id)
            .map(|s| s.id.clone())
            .collect();
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page.page.saturating_mul(page.size))
            .take(page.size)
            .collect();
        Ok(Page { items, total })
    }

    fn delete_statements(&self, ids: &[StatementId]) -> TemplateResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let doomed: HashSet<&StatementId> = ids.iter().collect();
        self.write()?.statements.retain(|s| !doomed.contains(&s.id));
        Ok(())
    }
}

impl ClassHierarchy for InMemoryGraph {
    fn attach_child(
        &self,
        _contributor_id: ContributorId,
        parent: &ThingId,
        child: &ThingId,
    ) -> TemplateResult<()> {
        let mut state = self.write()?;
        if !state.classes.contains_key(parent) {
            return Err(TemplateError::ClassNotFound(parent.clone()));
        }
        if !state.classes.contains_key(child) {
            return Err(TemplateError::ClassNotFound(child.clone()));
        }
        state.parents.insert(child.clone(), parent.clone());
        Ok(())
    }
}

impl UnitOfWork for InMemoryGraph {
    fn run<T, F>(&self, work: F) -> TemplateResult<T>
    where
        F: FnOnce() -> TemplateResult<T>,
    {
        let snapshot = self.read()?.clone();
        match work() {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, "unit of work failed, restoring snapshot");
                *self.write()? = snapshot;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::classes;

    fn contributor() -> ContributorId {
        ContributorId::unknown()
    }

    #[test]
    fn test_seeded_vocabulary() {
        let graph = InMemoryGraph::new();
        for id in REQUIRED_PREDICATES {
            assert!(graph.find_predicate(&vocabulary::id(id)).unwrap().is_some(), "{id}");
        }
        assert!(graph
            .find_class(&vocabulary::id(classes::ROSETTA_NODE_SHAPE))
            .unwrap()
            .is_some());
        assert!(InMemoryGraph::empty()
            .find_predicate(&vocabulary::id(predicates::SH_PATH))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_statement_requires_existing_endpoints() {
        let graph = InMemoryGraph::new();
        let resource = graph
            .create_resource(CreateResource::new(contributor(), "a", ThingId::new("C0")))
            .unwrap();
        let err = graph
            .create_statement(contributor(), &resource, &ThingId::new("nope"), &resource)
            .unwrap_err();
        assert_eq!(err, TemplateError::PredicateNotFound(ThingId::new("nope")));
    }

    #[test]
    fn test_bundle_respects_level_and_order() {
        let graph = InMemoryGraph::new();
        let p = vocabulary::id(predicates::SH_PROPERTY);
        let root = graph
            .create_resource(CreateResource::new(contributor(), "root", ThingId::new("C0")))
            .unwrap();
        let child = graph
            .create_resource(CreateResource::new(contributor(), "child", ThingId::new("C0")))
            .unwrap();
        let grandchild = graph
            .create_resource(CreateResource::new(contributor(), "grandchild", ThingId::new("C0")))
            .unwrap();
        let s1 = graph.create_statement(contributor(), &root, &p, &child).unwrap();
        let s2 = graph.create_statement(contributor(), &child, &p, &grandchild).unwrap();
        let s3 = graph.create_statement(contributor(), &grandchild, &p, &root).unwrap();

        let one: Vec<_> = graph.fetch_bundle(&root, 1).unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(one, vec![s1.clone()]);

        let two: Vec<_> = graph.fetch_bundle(&root, 2).unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(two, vec![s1.clone(), s2.clone()]);

        let all: Vec<_> = graph.fetch_bundle(&root, 5).unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(all, vec![s1, s2, s3]);
    }

    #[test]
    fn test_instances_are_paged() {
        let graph = InMemoryGraph::new();
        let template = graph
            .create_resource(CreateResource::new(contributor(), "t", ThingId::new("C0")))
            .unwrap();
        assert!(graph.find_instances(&template, PageRequest::first(1)).unwrap().is_empty());

        graph.record_instance(contributor(), &template).unwrap();
        graph.record_instance(contributor(), &template).unwrap();

        let page = graph.find_instances(&template, PageRequest::first(1)).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_unit_of_work_restores_on_failure() {
        let graph = InMemoryGraph::new();
        let before = graph.statement_count().unwrap();

        let result: TemplateResult<()> = graph.run(|| {
            graph.record_instance(contributor(), &vocabulary::id(classes::ROSETTA_NODE_SHAPE))?;
            Err(TemplateError::Storage("late failure".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(graph.statement_count().unwrap(), before);
    }

    #[test]
    fn test_attach_child_records_parent() {
        let graph = InMemoryGraph::new();
        let child = graph.create_class(contributor(), "child").unwrap();
        let parent = vocabulary::id(classes::ROSETTA_STONE_STATEMENT);
        graph.attach_child(contributor(), &parent, &child).unwrap();
        assert_eq!(graph.parent_of(&child).unwrap(), Some(parent));
    }
}

//! In-process project store.
//!
//! Used when no database is configured and by the test suites. All writes
//! happen under a single [`RwLock`] write guard; multi-record writes are
//! staged and only applied once every step has succeeded, so a failed
//! `bulk_set_order` leaves no trace.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use folio_core::reorder::order_assignments;
use folio_core::types::SortOrder;

use crate::models::project::{listing_cmp, Project, ProjectDraft};
use crate::store::{ProjectStore, StoreError};

#[derive(Debug, Default)]
struct State {
    records: HashMap<String, Entry>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry {
    project: Project,
    /// Insertion sequence; breaks ties between same-instant inserts.
    seq: u64,
}

/// A [`ProjectStore`] backed by a `HashMap` behind an async `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    state: RwLock<State>,
    write_fault: Option<String>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `bulk_set_order` that reaches `slug` fail with a backend
    /// error at that record, after earlier records have been staged.
    ///
    /// Exists to exercise rollback paths.
    pub fn with_write_fault(mut self, slug: impl Into<String>) -> Self {
        self.write_fault = Some(slug.into());
        self
    }

    fn sorted(state: &State) -> Vec<Project> {
        let mut entries: Vec<&Entry> = state.records.values().collect();
        entries.sort_by(|a, b| listing_cmp(&a.project, &b.project).then(b.seq.cmp(&a.seq)));
        entries.into_iter().map(|e| e.project.clone()).collect()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        let state = self.state.read().await;
        Ok(Self::sorted(&state))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        let state = self.state.read().await;
        Ok(state.records.get(slug).map(|e| e.project.clone()))
    }

    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, StoreError> {
        let mut state = self.state.write().await;
        if state.records.contains_key(&draft.slug) {
            return Err(StoreError::Conflict(draft.slug.clone()));
        }

        let order: SortOrder = state
            .records
            .values()
            .map(|e| e.project.order)
            .max()
            .map_or(0, |max| max + 1);

        let now = Utc::now();
        let project = Project {
            slug: draft.slug.clone(),
            name: draft.name.clone(),
            color: draft.color.clone(),
            order,
            hero: draft.hero.clone(),
            main_image: draft.main_image.clone(),
            sections: draft.sections.clone(),
            created_at: now,
            updated_at: now,
        };

        let seq = state.next_seq;
        state.next_seq += 1;
        state.records.insert(
            project.slug.clone(),
            Entry {
                project: project.clone(),
                seq,
            },
        );
        Ok(project)
    }

    async fn replace(&self, slug: &str, draft: &ProjectDraft) -> Result<Project, StoreError> {
        let mut state = self.state.write().await;
        let entry = state
            .records
            .get_mut(slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))?;

        let project = &mut entry.project;
        project.name = draft.name.clone();
        project.color = draft.color.clone();
        project.hero = draft.hero.clone();
        project.main_image = draft.main_image.clone();
        project.sections = draft.sections.clone();
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .records
            .remove(slug)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    async fn bulk_set_order(&self, order: &[String]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        let found = order
            .iter()
            .filter(|slug| state.records.contains_key(slug.as_str()))
            .count();
        if found != order.len() {
            return Err(StoreError::ConcurrentModification {
                expected: order.len(),
                found,
            });
        }

        let mut staged = Vec::with_capacity(order.len());
        for (slug, position) in order_assignments(order) {
            if self.write_fault.as_deref() == Some(slug) {
                tracing::debug!(slug, "Injected write fault, rolling back");
                return Err(StoreError::Backend(format!("injected write failure at '{slug}'")));
            }
            if !state.records.contains_key(slug) {
                return Err(StoreError::NotFound(slug.to_string()));
            }
            staged.push((slug, position));
        }

        for (slug, position) in staged {
            if let Some(entry) = state.records.get_mut(slug) {
                entry.project.order = position;
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

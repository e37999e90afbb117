//! Integration tests for the reorder coordinator.
//!
//! Runs against [`MemoryProjectStore`], wrapped where needed to count store
//! access or to delete a project between validation and the transaction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use folio_core::reorder::ReorderError;
use folio_db::models::project::{Hero, Project, ProjectDraft};
use folio_db::reorder::reorder_projects;
use folio_db::{MemoryProjectStore, ProjectStore, StoreError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn draft(slug: &str) -> ProjectDraft {
    ProjectDraft {
        slug: slug.to_string(),
        name: format!("Project {slug}"),
        color: "#000000".to_string(),
        hero: Hero::default(),
        main_image: None,
        sections: Vec::new(),
    }
}

fn slugs(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

async fn seed(store: &dyn ProjectStore, values: &[&str]) {
    for slug in values {
        store.insert(&draft(slug)).await.expect("seed insert");
    }
}

async fn orders(store: &dyn ProjectStore) -> Vec<(String, i32)> {
    let mut all: Vec<(String, i32)> = store
        .list_all()
        .await
        .expect("listing")
        .into_iter()
        .map(|p| (p.slug, p.order))
        .collect();
    all.sort();
    all
}

fn listing_slugs(listing: &[Project]) -> Vec<&str> {
    listing.iter().map(|p| p.slug.as_str()).collect()
}

fn assert_sorted(listing: &[Project]) {
    for pair in listing.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.order < b.order || (a.order == b.order && a.created_at >= b.created_at),
            "listing out of order: {} ({}) before {} ({})",
            a.slug,
            a.order,
            b.slug,
            b.order
        );
    }
}

/// Counts every call that reaches the wrapped store.
struct CountingStore {
    inner: MemoryProjectStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new(inner: MemoryProjectStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProjectStore for CountingStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        self.tick();
        self.inner.list_all().await
    }
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        self.tick();
        self.inner.find_by_slug(slug).await
    }
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, StoreError> {
        self.tick();
        self.inner.insert(draft).await
    }
    async fn replace(&self, slug: &str, draft: &ProjectDraft) -> Result<Project, StoreError> {
        self.tick();
        self.inner.replace(slug, draft).await
    }
    async fn delete_by_slug(&self, slug: &str) -> Result<(), StoreError> {
        self.tick();
        self.inner.delete_by_slug(slug).await
    }
    async fn bulk_set_order(&self, order: &[String]) -> Result<(), StoreError> {
        self.tick();
        self.inner.bulk_set_order(order).await
    }
    async fn health_check(&self) -> Result<(), StoreError> {
        self.tick();
        self.inner.health_check().await
    }
}

/// Deletes `victim` right before the transactional write, as a concurrent
/// admin session would.
struct RacingDeleteStore {
    inner: MemoryProjectStore,
    victim: String,
}

#[async_trait]
impl ProjectStore for RacingDeleteStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        self.inner.list_all().await
    }
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        self.inner.find_by_slug(slug).await
    }
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, StoreError> {
        self.inner.insert(draft).await
    }
    async fn replace(&self, slug: &str, draft: &ProjectDraft) -> Result<Project, StoreError> {
        self.inner.replace(slug, draft).await
    }
    async fn delete_by_slug(&self, slug: &str) -> Result<(), StoreError> {
        self.inner.delete_by_slug(slug).await
    }
    async fn bulk_set_order(&self, order: &[String]) -> Result<(), StoreError> {
        let _ = self.inner.delete_by_slug(&self.victim).await;
        self.inner.bulk_set_order(order).await
    }
    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_write_mid_transaction_leaves_orders_unchanged() {
    let store = MemoryProjectStore::new().with_write_fault("b");
    seed(&store, &["a", "b", "c", "d"]).await;
    let before = orders(&store).await;

    let result = reorder_projects(&store, &slugs(&["d", "c", "b", "a"])).await;

    assert_matches!(result, Err(ReorderError::StorageFailure(_)));
    assert_eq!(orders(&store).await, before);
}

#[tokio::test]
async fn concurrent_delete_aborts_without_partial_write() {
    let inner = MemoryProjectStore::new();
    seed(&inner, &["a", "b", "c"]).await;
    let store = RacingDeleteStore {
        inner,
        victim: "b".to_string(),
    };

    let result = reorder_projects(&store, &slugs(&["c", "b", "a"])).await;

    assert_matches!(result, Err(ReorderError::ConcurrentModification(_)));
    assert_eq!(
        orders(&store).await,
        vec![("a".to_string(), 0), ("c".to_string(), 2)]
    );
}

// ---------------------------------------------------------------------------
// Permutation correctness and idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_slug_gets_its_position() {
    let store = MemoryProjectStore::new();
    let names = ["p0", "p1", "p2", "p3", "p4", "p5"];
    seed(&store, &names).await;

    let permutation = slugs(&["p3", "p5", "p0", "p4", "p1", "p2"]);
    reorder_projects(&store, &permutation).await.unwrap();

    for (i, slug) in permutation.iter().enumerate() {
        let project = store.find_by_slug(slug).await.unwrap().unwrap();
        assert_eq!(project.order, i as i32, "position of {slug}");
    }
}

#[tokio::test]
async fn repeating_the_same_reorder_is_idempotent() {
    let store = MemoryProjectStore::new();
    seed(&store, &["a", "b", "c"]).await;
    let request = slugs(&["b", "c", "a"]);

    let first = reorder_projects(&store, &request).await.unwrap();
    let after_once = orders(&store).await;
    let second = reorder_projects(&store, &request).await.unwrap();

    assert_eq!(orders(&store).await, after_once);
    assert_eq!(listing_slugs(&first), listing_slugs(&second));
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_slug_is_rejected_and_nothing_changes() {
    let store = MemoryProjectStore::new();
    seed(&store, &["a", "b"]).await;
    let before = orders(&store).await;

    let result = reorder_projects(&store, &slugs(&["a", "b", "ghost"])).await;

    assert_eq!(result.unwrap_err(), ReorderError::UnknownSlugs(slugs(&["ghost"])));
    assert_eq!(orders(&store).await, before);
}

#[tokio::test]
async fn empty_input_is_rejected_without_touching_the_store() {
    let store = CountingStore::new(MemoryProjectStore::new());

    let result = reorder_projects(&store, &[]).await;

    assert_matches!(result, Err(ReorderError::InvalidInput(_)));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn duplicate_input_is_rejected_without_touching_the_store() {
    let store = CountingStore::new(MemoryProjectStore::new());

    let result = reorder_projects(&store, &slugs(&["a", "a"])).await;

    assert_matches!(result, Err(ReorderError::InvalidInput(_)));
    assert_eq!(store.calls(), 0);
}

// ---------------------------------------------------------------------------
// Listing consistency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_stays_sorted_across_mutations() {
    let store = MemoryProjectStore::new();
    seed(&store, &["a", "b", "c", "d"]).await;
    assert_sorted(&store.list_all().await.unwrap());

    let mut changed = draft("b");
    changed.name = "Renamed".into();
    store.replace("b", &changed).await.unwrap();
    assert_sorted(&store.list_all().await.unwrap());

    store.delete_by_slug("c").await.unwrap();
    assert_sorted(&store.list_all().await.unwrap());

    // Partial reorder creates a tie on order 0 between `d` and `a`.
    let listing = reorder_projects(&store, &slugs(&["d"])).await.unwrap();
    assert_sorted(&listing);
    assert_eq!(listing_slugs(&listing), vec!["d", "a", "b"]);
}

#[tokio::test]
async fn partial_reorder_leaves_omitted_projects_alone() {
    let store = MemoryProjectStore::new();
    seed(&store, &["a", "b", "c"]).await;

    reorder_projects(&store, &slugs(&["c", "b"])).await.unwrap();

    assert_eq!(
        orders(&store).await,
        vec![
            ("a".to_string(), 0),
            ("b".to_string(), 1),
            ("c".to_string(), 0)
        ]
    );
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_move_last_to_front() {
    let store = MemoryProjectStore::new();
    seed(&store, &["a", "b", "c"]).await;
    assert_eq!(
        orders(&store).await,
        vec![
            ("a".to_string(), 0),
            ("b".to_string(), 1),
            ("c".to_string(), 2)
        ]
    );

    let listing = reorder_projects(&store, &slugs(&["c", "a", "b"])).await.unwrap();

    assert_eq!(
        orders(&store).await,
        vec![
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("c".to_string(), 0)
        ]
    );
    assert_eq!(listing_slugs(&listing), vec!["c", "a", "b"]);
    assert_eq!(
        listing_slugs(&store.list_all().await.unwrap()),
        vec!["c", "a", "b"]
    );
}

#[tokio::test]
async fn scenario_ghost_slug() {
    let store = MemoryProjectStore::new();
    seed(&store, &["a", "b"]).await;

    let err = reorder_projects(&store, &slugs(&["a", "b", "ghost"]))
        .await
        .unwrap_err();

    assert_eq!(err, ReorderError::UnknownSlugs(slugs(&["ghost"])));
    assert_eq!(store.find_by_slug("a").await.unwrap().unwrap().order, 0);
    assert_eq!(store.find_by_slug("b").await.unwrap().unwrap().order, 1);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reorders_never_interleave() {
    let store = Arc::new(MemoryProjectStore::new());
    seed(store.as_ref(), &["a", "b", "c", "d"]).await;

    let forward = slugs(&["a", "b", "c", "d"]);
    let backward = slugs(&["d", "c", "b", "a"]);

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        let request = if i % 2 == 0 { forward.clone() } else { backward.clone() };
        handles.push(tokio::spawn(async move {
            reorder_projects(store.as_ref(), &request).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let listing = listing_slugs(&store.list_all().await.unwrap())
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    assert!(
        listing == forward || listing == backward,
        "final ordering must be one whole request, got {listing:?}"
    );
}

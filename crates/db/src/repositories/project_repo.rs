//! Repository for the `projects` table.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use folio_core::reorder::order_assignments;
use folio_core::section::Section;
use folio_core::types::{SortOrder, Timestamp};

use crate::models::project::{Hero, Project, ProjectDraft};
use crate::store::{ProjectStore, StoreError};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "slug, name, color, sort_order, hero_title, hero_description, \
    main_image, sections, created_at, updated_at";

/// Listing order; `id DESC` settles same-instant inserts.
const LISTING_ORDER: &str = "ORDER BY sort_order ASC, created_at DESC, id DESC";

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct ProjectRow {
    slug: String,
    name: String,
    color: String,
    sort_order: SortOrder,
    hero_title: String,
    hero_description: String,
    main_image: Option<String>,
    sections: Json<Vec<Section>>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            slug: row.slug,
            name: row.name,
            color: row.color,
            order: row.sort_order,
            hero: Hero {
                title: row.hero_title,
                description: row.hero_description,
            },
            main_image: row.main_image,
            sections: row.sections.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Provides queries for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project after every existing one (`MAX(sort_order) + 1`).
    pub async fn create(pool: &PgPool, draft: &ProjectDraft) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (slug, name, color, sort_order, hero_title, hero_description, main_image, sections)
             VALUES
                ($1, $2, $3, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM projects), $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&draft.slug)
            .bind(&draft.name)
            .bind(&draft.color)
            .bind(&draft.hero.title)
            .bind(&draft.hero.description)
            .bind(&draft.main_image)
            .bind(Json(&draft.sections))
            .fetch_one(pool)
            .await
            .map(Project::from)
    }

    /// Find a project by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE slug = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Project::from))
    }

    /// List all projects in presentation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects {LISTING_ORDER}");
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    /// Replace a project's content. `sort_order` and `created_at` are kept.
    ///
    /// Returns `None` if no row with the given slug exists.
    pub async fn replace(
        pool: &PgPool,
        slug: &str,
        draft: &ProjectDraft,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = $2,
                color = $3,
                hero_title = $4,
                hero_description = $5,
                main_image = $6,
                sections = $7,
                updated_at = NOW()
             WHERE slug = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(slug)
            .bind(&draft.name)
            .bind(&draft.color)
            .bind(&draft.hero.title)
            .bind(&draft.hero.description)
            .bind(&draft.main_image)
            .bind(Json(&draft.sections))
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Project::from))
    }

    /// Permanently delete a project. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign `sort_order = index` to every slug in `order` in one
    /// transaction.
    ///
    /// The target rows are locked first; if any is missing the transaction
    /// is rolled back before a single row is written.
    pub async fn set_order(pool: &PgPool, order: &[String]) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;

        let locked: Vec<String> =
            sqlx::query_scalar("SELECT slug FROM projects WHERE slug = ANY($1) FOR UPDATE")
                .bind(order)
                .fetch_all(&mut *tx)
                .await?;

        if locked.len() != order.len() {
            tx.rollback().await?;
            return Err(StoreError::ConcurrentModification {
                expected: order.len(),
                found: locked.len(),
            });
        }

        for (slug, position) in order_assignments(order) {
            let result = sqlx::query("UPDATE projects SET sort_order = $2 WHERE slug = $1")
                .bind(slug)
                .bind(position)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(StoreError::NotFound(slug.to_string()));
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

/// [`ProjectStore`] over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        Ok(ProjectRepo::list(&self.pool).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, StoreError> {
        ProjectRepo::create(&self.pool, draft).await.map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Conflict(draft.slug.clone())
            } else {
                err.into()
            }
        })
    }

    async fn replace(&self, slug: &str, draft: &ProjectDraft) -> Result<Project, StoreError> {
        ProjectRepo::replace(&self.pool, slug, draft)
            .await?
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), StoreError> {
        if ProjectRepo::delete(&self.pool, slug).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound(slug.to_string()))
        }
    }

    async fn bulk_set_order(&self, order: &[String]) -> Result<(), StoreError> {
        ProjectRepo::set_order(&self.pool, order).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

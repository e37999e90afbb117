//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::reorder::ReorderError;
use folio_db::models::project::{ProjectInput, ProjectSummary};
use folio_db::reorder::reorder_projects;
use serde_json::Value;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AdminUser;
use crate::response::{ApiResponse, Empty, ProjectBody, ProjectsBody, SummariesBody};
use crate::state::AppState;

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ProjectsBody>>> {
    let projects = state.store.list_all().await?;
    Ok(Json(ApiResponse::ok(ProjectsBody { projects })))
}

/// GET /api/projects/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ProjectBody>>> {
    let project = state
        .store
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| CoreError::project_not_found(&slug))?;
    Ok(Json(ApiResponse::ok(ProjectBody {
        project,
        warnings: Vec::new(),
    })))
}

/// GET /api/projects/{slug}/others
///
/// Cards for every project except `slug`, in listing order.
pub async fn others(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<SummariesBody>>> {
    let projects = state
        .store
        .list_all()
        .await?
        .iter()
        .filter(|p| p.slug != slug)
        .map(ProjectSummary::from)
        .collect();
    Ok(Json(ApiResponse::ok(SummariesBody { projects })))
}

/// POST /api/projects
pub async fn create(
    admin: AdminUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProjectBody>>)> {
    let (draft, warnings) = input.into_new_draft()?;
    let project = state.store.insert(&draft).await?;

    tracing::info!(
        slug = %project.slug,
        order = project.order,
        dropped_sections = warnings.len(),
        jti = %admin.token_id,
        "Project created"
    );
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(ProjectBody { project, warnings })
                .with_message("Project created successfully"),
        ),
    ))
}

/// PUT /api/projects/{slug}
///
/// Full replace. The path slug is authoritative; `order` and `createdAt`
/// are kept.
pub async fn update(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> AppResult<Json<ApiResponse<ProjectBody>>> {
    let (draft, warnings) = input.into_replacement_draft(&slug)?;
    let project = state.store.replace(&slug, &draft).await?;

    tracing::info!(
        slug = %project.slug,
        dropped_sections = warnings.len(),
        jti = %admin.token_id,
        "Project updated"
    );
    Ok(Json(
        ApiResponse::ok(ProjectBody { project, warnings })
            .with_message("Project updated successfully"),
    ))
}

/// DELETE /api/projects/{slug}
pub async fn delete(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<Empty>>> {
    state.store.delete_by_slug(&slug).await?;

    tracing::info!(slug = %slug, jti = %admin.token_id, "Project deleted");
    Ok(Json(ApiResponse::message("Project deleted successfully")))
}

/// PUT /api/projects/reorder
///
/// Body: `{ "order": ["slug-a", "slug-b", ...] }`. Responds with the full
/// listing after the new order is committed.
pub async fn reorder(
    admin: AdminUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<Json<ApiResponse<ProjectsBody>>> {
    let order = parse_order(&body)?;
    let projects = reorder_projects(state.store.as_ref(), &order).await?;

    tracing::debug!(jti = %admin.token_id, "Reorder applied");
    Ok(Json(
        ApiResponse::ok(ProjectsBody { projects })
            .with_message("Project order updated successfully"),
    ))
}

/// Pull the slug list out of a reorder body.
///
/// The body is taken as loose JSON so every shape problem surfaces as
/// [`ReorderError::InvalidInput`] with a specific message.
fn parse_order(body: &Value) -> Result<Vec<String>, ReorderError> {
    let invalid = |msg: &str| ReorderError::InvalidInput(msg.to_string());

    let order = match body.get("order") {
        None | Some(Value::Null) => return Err(invalid("order is required")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid("order must be an array of slugs")),
    };

    order
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| invalid("order must contain only strings"))
        })
        .collect()
}

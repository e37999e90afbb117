//! Shared response envelope types for API handlers.
//!
//! Every successful API response is `{ "success": true, ...payload }`, with
//! an optional human-readable `message`. Use [`ApiResponse`] instead of
//! ad-hoc `serde_json::json!` bodies to get compile-time type safety and
//! consistent serialization. Failures are rendered by
//! [`AppError`](crate::error::AppError).

use folio_core::section::SectionIssue;
use folio_db::models::project::{Project, ProjectSummary};
use serde::Serialize;

/// Standard `{ "success": true, "message"?, ...body }` envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(ProjectsBody { projects }).with_message("Project order updated")))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            success: true,
            message: None,
            body,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<Empty> {
    /// A success envelope with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(Empty {}).with_message(message)
    }
}

/// No payload beyond the envelope.
#[derive(Debug, Serialize)]
pub struct Empty {}

#[derive(Debug, Serialize)]
pub struct ProjectsBody {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct SummariesBody {
    pub projects: Vec<ProjectSummary>,
}

/// A single project plus any sections dropped while saving it.
#[derive(Debug, Serialize)]
pub struct ProjectBody {
    pub project: Project,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SectionIssue>,
}

#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyBody {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct DestroyBody {
    pub result: String,
}

//! Project entity model and DTOs.

use std::cmp::Ordering;

use folio_core::error::CoreError;
use folio_core::media::resolve_image_url;
use folio_core::section::{normalize_sections, Section, SectionIssue};
use folio_core::slug::{resolve_slug, validate_slug};
use folio_core::types::{SortOrder, Timestamp};
use serde::{Deserialize, Serialize};

/// Theme colour stored when the admin does not pick one.
pub const DEFAULT_COLOR: &str = "#000000";

/// A portfolio project as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub slug: String,
    pub name: String,
    pub color: String,
    pub order: SortOrder,
    pub hero: Hero,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Project {
    /// Image shown on the project's card: the first full-width image
    /// section, falling back to `mainImage`.
    pub fn preview_image(&self) -> Option<&str> {
        self.sections
            .iter()
            .find_map(|section| match section {
                Section::FullWidthImage(s) if !s.image.is_empty() => Some(s.image.as_str()),
                _ => None,
            })
            .or(self.main_image.as_deref())
    }
}

/// Listing order: `order` ascending, newest first among equal orders.
pub fn listing_cmp(a: &Project, b: &Project) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Compact card shown in a page's "other projects" strip.
///
/// `previewImage` is already resolved to a loadable URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub slug: String,
    pub name: String,
    pub order: SortOrder,
    pub preview_image: Option<String>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            slug: project.slug.clone(),
            name: project.name.clone(),
            order: project.order,
            preview_image: project.preview_image().map(resolve_image_url),
        }
    }
}

/// Request body for creating or fully replacing a project.
///
/// `order` and timestamps are server-managed and not accepted here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub slug: Option<String>,
    #[serde(default)]
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub hero: Hero,
    pub main_image: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Validated project content ready to be written by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub slug: String,
    pub name: String,
    pub color: String,
    pub hero: Hero,
    pub main_image: Option<String>,
    pub sections: Vec<Section>,
}

impl ProjectInput {
    /// Validate for creation. The slug is taken from the body or derived
    /// from the name.
    pub fn into_new_draft(self) -> Result<(ProjectDraft, Vec<SectionIssue>), CoreError> {
        let slug = resolve_slug(self.slug.as_deref(), &self.name)?;
        self.into_draft(slug)
    }

    /// Validate for a full replace of the project at `path_slug`.
    ///
    /// Slugs are immutable: a body slug that differs from the path is
    /// rejected rather than silently renaming the project.
    pub fn into_replacement_draft(
        self,
        path_slug: &str,
    ) -> Result<(ProjectDraft, Vec<SectionIssue>), CoreError> {
        validate_slug(path_slug)?;
        if let Some(body_slug) = self.slug.as_deref().map(str::trim) {
            if !body_slug.is_empty() && body_slug != path_slug {
                return Err(CoreError::Validation(format!(
                    "Slug cannot be changed (from '{path_slug}' to '{body_slug}')"
                )));
            }
        }
        self.into_draft(path_slug.to_string())
    }

    fn into_draft(self, slug: String) -> Result<(ProjectDraft, Vec<SectionIssue>), CoreError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation("Project name is required".into()));
        }

        let color = self
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());

        let main_image = self
            .main_image
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let (sections, issues) = normalize_sections(self.sections);

        Ok((
            ProjectDraft {
                slug,
                name,
                color,
                hero: self.hero,
                main_image,
                sections,
            },
            issues,
        ))
    }
}

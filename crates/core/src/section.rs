//! Page sections: the ordered content blocks of a project page.
//!
//! Sections are stored as free-form JSON documents discriminated by a
//! `type` field. Known kinds deserialize into typed variants that carry
//! any fields they do not model in `extra`; anything else is kept verbatim
//! in [`Section::Unknown`]. A read-modify-write cycle never loses data the
//! server does not understand.

use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::media::vimeo_id_digits;

pub const KIND_FULL_WIDTH_IMAGE: &str = "full-width-image";
pub const KIND_VIMEO_VIDEO: &str = "vimeo-video";
pub const KIND_TWO_COLUMN_TEXT: &str = "two-column-text";
pub const KIND_PROJECTS_LIST: &str = "projects-list";

/// Aspect ratio applied when a video section does not name one.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    FullWidthImage(FullWidthImage),
    VimeoVideo(VimeoVideo),
    TwoColumnText(TwoColumnText),
    /// Marker for the dynamically rendered "other projects" strip.
    ProjectsList,
    /// A section whose `type` is missing or unrecognised, preserved as-is.
    Unknown(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullWidthImage {
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VimeoVideo {
    #[serde(default)]
    pub vimeo_id: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoColumnText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TwoColumnText {
    fn has_content(&self) -> bool {
        [
            &self.left_title,
            &self.left_content,
            &self.right_title,
            &self.right_content,
        ]
        .into_iter()
        .any(|field| field.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

impl Section {
    /// The `type` discriminator, or `None` for an unknown section without one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Section::FullWidthImage(_) => Some(KIND_FULL_WIDTH_IMAGE),
            Section::VimeoVideo(_) => Some(KIND_VIMEO_VIDEO),
            Section::TwoColumnText(_) => Some(KIND_TWO_COLUMN_TEXT),
            Section::ProjectsList => Some(KIND_PROJECTS_LIST),
            Section::Unknown(fields) => fields.get("type").and_then(Value::as_str),
        }
    }

    pub fn is_projects_list(&self) -> bool {
        matches!(self, Section::ProjectsList)
    }

    /// Why this section cannot be rendered, if it is incomplete.
    ///
    /// Unknown sections are never reported: the server cannot judge them.
    pub fn incompleteness(&self) -> Option<&'static str> {
        match self {
            Section::FullWidthImage(s) if s.image.trim().is_empty() => Some("missing image"),
            Section::VimeoVideo(s) if vimeo_id_digits(&s.vimeo_id).is_empty() => {
                Some("missing or invalid Vimeo id")
            }
            Section::TwoColumnText(s) if !s.has_content() => Some("no text content"),
            _ => None,
        }
    }

    /// Render this section as its stored JSON document.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let (kind, body) = match self {
            Section::FullWidthImage(s) => (KIND_FULL_WIDTH_IMAGE, serde_json::to_value(s)?),
            Section::VimeoVideo(s) => (KIND_VIMEO_VIDEO, serde_json::to_value(s)?),
            Section::TwoColumnText(s) => (KIND_TWO_COLUMN_TEXT, serde_json::to_value(s)?),
            Section::ProjectsList => (KIND_PROJECTS_LIST, Value::Object(Map::new())),
            Section::Unknown(fields) => return Ok(Value::Object(fields.clone())),
        };

        let mut map = Map::new();
        map.insert("type".into(), Value::String(kind.into()));
        if let Value::Object(fields) = body {
            map.extend(fields);
        }
        Ok(Value::Object(map))
    }

    /// Interpret a stored JSON document. Never fails on objects: a known
    /// `type` whose fields do not fit the typed shape is kept as unknown.
    pub fn from_json_object(fields: Map<String, Value>) -> Self {
        let kind = fields.get("type").and_then(Value::as_str).map(str::to_owned);
        let mut body = fields.clone();
        body.remove("type");
        let body = Value::Object(body);
        let typed = match kind.as_deref() {
            Some(KIND_FULL_WIDTH_IMAGE) => {
                serde_json::from_value(body).map(Section::FullWidthImage)
            }
            Some(KIND_VIMEO_VIDEO) => serde_json::from_value(body).map(Section::VimeoVideo),
            Some(KIND_TWO_COLUMN_TEXT) => {
                serde_json::from_value(body).map(Section::TwoColumnText)
            }
            Some(KIND_PROJECTS_LIST) => Ok(Section::ProjectsList),
            _ => return Section::Unknown(fields),
        };
        typed.unwrap_or(Section::Unknown(fields))
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(fields) => Ok(Section::from_json_object(fields)),
            other => Err(serde::de::Error::custom(format!(
                "section must be a JSON object, got {other}"
            ))),
        }
    }
}

/// A section dropped by [`normalize_sections`] because it cannot render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionIssue {
    /// Position in the submitted list (0-based).
    pub index: usize,
    pub kind: String,
    pub reason: &'static str,
}

/// Prepare a submitted section list for storage.
///
/// Drops incomplete sections, strips every `projects-list` marker and
/// appends exactly one at the end. Unknown sections pass through untouched.
pub fn normalize_sections(submitted: Vec<Section>) -> (Vec<Section>, Vec<SectionIssue>) {
    let mut kept = Vec::with_capacity(submitted.len() + 1);
    let mut issues = Vec::new();

    for (index, section) in submitted.into_iter().enumerate() {
        if section.is_projects_list() {
            continue;
        }
        if let Some(reason) = section.incompleteness() {
            issues.push(SectionIssue {
                index,
                kind: section.kind().unwrap_or("unknown").to_string(),
                reason,
            });
            continue;
        }
        kept.push(section);
    }

    kept.push(Section::ProjectsList);
    (kept, issues)
}

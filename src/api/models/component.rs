use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::ComponentStatus;

/// A stored UI code snippet with metadata.
///
/// `tags` is held in its persisted comma-joined form; `tag_list` and the
/// `join_tags`/`split_tags` helpers convert at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    pub section: String,
    pub tags: String,
    pub date_added: NaiveDate,
    pub code: String,
    pub description: String,
    pub notes: String,
    pub instructions: String,
    pub status: ComponentStatus,
}

impl Component {
    /// Tags as an ordered sequence of trimmed, non-empty strings.
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }

    /// Wire form without the attachments sequence.
    pub fn to_view(&self) -> ComponentView {
        ComponentView {
            id: self.id.to_string(),
            name: self.name.clone(),
            section: self.section.clone(),
            tags: self.tag_list(),
            date_iso: self.date_added.to_string(),
            code: self.code.clone(),
            description: self.description.clone(),
            notes: self.notes.clone(),
            instructions: self.instructions.clone(),
            status: self.status,
            files: None,
        }
    }

    /// Wire form with the owned attachments embedded.
    pub fn to_detail_view(&self, files: &[ComponentFile]) -> ComponentView {
        let mut view = self.to_view();
        view.files = Some(files.iter().map(|f| f.to_view()).collect());
        view
    }
}

/// A binary file owned by exactly one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentFile {
    pub id: i64,
    pub component_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl ComponentFile {
    pub fn to_view(&self) -> FileView {
        FileView {
            id: self.id,
            name: self.file_name.clone(),
            url: self.url.clone(),
            size: self.size,
        }
    }
}

/// Editable fields supplied to the store's create operation; `tags` must
/// already be in the joined storage form.
#[derive(Debug, Clone, Default)]
pub struct NewComponent {
    pub name: String,
    pub section: String,
    pub tags: String,
    pub code: String,
    pub description: String,
    pub notes: String,
    pub instructions: String,
    pub status: ComponentStatus,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ComponentPatch {
    pub name: Option<String>,
    pub section: Option<String>,
    pub tags: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub instructions: Option<String>,
    pub status: Option<ComponentStatus>,
    pub date_added: Option<NaiveDate>,
}

/// Wire form of a component.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentView {
    pub id: String,
    pub name: String,
    pub section: String,
    pub tags: Vec<String>,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub code: String,
    pub description: String,
    pub notes: String,
    pub instructions: String,
    pub status: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileView>>,
}

/// Wire form of an attachment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileView {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub size: i64,
}

/// Normalize an ordered sequence of tag strings into the joined storage form.
/// Entries are trimmed, empty entries dropped, order preserved.
pub fn join_tags<I, S>(tags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|t| {
            let t = t.as_ref().trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Split the joined storage form back into an ordered tag sequence.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl ComponentStatus {
    /// Stored database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::NotStarted => "not_started",
            ComponentStatus::InProgress => "in_progress",
            ComponentStatus::Completed => "completed",
        }
    }

    /// Parse the stored/form representation. Unknown values are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(ComponentStatus::NotStarted),
            "in_progress" => Some(ComponentStatus::InProgress),
            "completed" => Some(ComponentStatus::Completed),
            _ => None,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Warning,
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Warning => "Advertencia",
            Self::Success => "Éxito",
            Self::Error => "Error",
            Self::Info => "Información",
        }
    }

    /// Badge styling class used by the dashboard panel.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Warning => "bg-amber-50 border-amber-200",
            Self::Success => "bg-emerald-50 border-emerald-200",
            Self::Error => "bg-rose-50 border-rose-200",
            Self::Info => "bg-blue-50 border-blue-200",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(
        id: &str,
        kind: NotificationKind,
        title: &str,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            message,
            created_at,
            read: false,
        }
    }
}

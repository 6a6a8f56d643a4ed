use serde::{Deserialize, Serialize};

use super::domain::RecordId;

/// Icons the home-screen service grid knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    AlertCircle,
    Gift,
    Trophy,
    BookOpen,
    PieChart,
    Download,
    PiggyBank,
    MessageSquarePlus,
    Placeholder,
}

impl IconKind {
    /// Map a configured icon name to a known icon; anything unrecognised draws the placeholder.
    pub fn resolve(name: &str) -> Self {
        match name.trim() {
            "AlertCircle" => Self::AlertCircle,
            "Gift" => Self::Gift,
            "Trophy" => Self::Trophy,
            "BookOpen" => Self::BookOpen,
            "PieChart" => Self::PieChart,
            "Download" => Self::Download,
            "PiggyBank" => Self::PiggyBank,
            "MessageSquarePlus" => Self::MessageSquarePlus,
            _ => Self::Placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub id: RecordId,
    pub title: String,
    pub icon: IconKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl ServiceEntry {
    pub fn new(id: &str, title: &str, icon_name: &str) -> Self {
        Self {
            id: RecordId::from(id),
            title: title.to_string(),
            icon: IconKind::resolve(icon_name),
            count: None,
        }
    }
}

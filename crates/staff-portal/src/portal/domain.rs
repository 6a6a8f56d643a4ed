use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier shared by every portal record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Professional ladder an employee climbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankTrack {
    /// 专业 (professional / technical)
    F,
    /// 管理 (managerial)
    Y,
    /// 通用 (general)
    G,
}

impl RankTrack {
    pub const fn ordered() -> [Self; 3] {
        [Self::F, Self::Y, Self::G]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::F => "专业",
            Self::Y => "管理",
            Self::G => "通用",
        }
    }

    pub const fn code(self) -> char {
        match self {
            Self::F => 'F',
            Self::Y => 'Y',
            Self::G => 'G',
        }
    }
}

/// Hierarchy position used to decide who evaluates whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Manager,
    Supervisor,
    Member,
}

impl EmployeeRole {
    /// Role whose members this role evaluates, if any.
    pub const fn evaluates(self) -> Option<Self> {
        match self {
            Self::Manager => Some(Self::Supervisor),
            Self::Supervisor => Some(Self::Member),
            Self::Member => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: RecordId,
    pub name: String,
    pub position: String,
    pub department: String,
    /// Display level such as "F7"; matched against course level allow-lists.
    pub level: String,
    pub tenure: String,
    pub role: EmployeeRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superior_id: Option<RecordId>,
    pub rank_track: RankTrack,
    pub rank_level: u8,
    pub total_points: u32,
    /// Percentage towards the next rank level, 0..=100.
    pub next_level_progress: f64,
    #[serde(default)]
    pub medals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Same,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: RecordId,
    pub rank: u32,
    pub name: String,
    pub score: i64,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    pub role: EmployeeRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superior_id: Option<RecordId>,
    pub rank_track: RankTrack,
    pub rank_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Promotion,
    General,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub title: String,
    pub date: NaiveDate,
    pub kind: NoticeKind,
    pub content: String,
    pub read_count: u32,
    pub is_pinned: bool,
    pub publisher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseCategory {
    #[serde(rename = "企业文化")]
    Culture,
    #[serde(rename = "通用技能")]
    GeneralSkills,
    #[serde(rename = "专业技能")]
    ProfessionalSkills,
}

impl CourseCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Culture => "企业文化",
            Self::GeneralSkills => "通用技能",
            Self::ProfessionalSkills => "专业技能",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "企业文化" => Some(Self::Culture),
            "通用技能" => Some(Self::GeneralSkills),
            "专业技能" => Some(Self::ProfessionalSkills),
            _ => None,
        }
    }
}

/// Allow-lists gating course visibility. Either list may hold the `"all"` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePermissions {
    pub departments: Vec<String>,
    pub levels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: RecordId,
    pub title: String,
    pub category: CourseCategory,
    pub image_url: String,
    pub permissions: CoursePermissions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitItem {
    pub id: RecordId,
    pub title: String,
    pub points: u32,
    /// Cash price in yuan; non-zero routes the item to hybrid checkout.
    pub price: u32,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionStatus {
    Unused,
    Used,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionRecord {
    pub id: RecordId,
    pub title: String,
    pub points: u32,
    pub date: NaiveDate,
    pub image_url: String,
    pub status: RedemptionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub category: String,
    pub is_pinned: bool,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRule {
    pub id: RecordId,
    pub category: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDimension {
    pub name: String,
    /// Percentage contribution, 0..=100.
    pub weight: u8,
    #[serde(default)]
    pub description: String,
}

/// Evaluation rubric for reaching `level` on `track`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankStandard {
    pub id: RecordId,
    pub track: RankTrack,
    pub level: u8,
    pub dimensions: Vec<RankDimension>,
}

impl RankStandard {
    pub fn total_weight(&self) -> u32 {
        self.dimensions.iter().map(|dim| u32::from(dim.weight)).sum()
    }
}

/// Direction of money through the fund, carrying the grouping keys of that direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FundFlow {
    Income {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        department: Option<String>,
    },
    Expense {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expense_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        project: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        needed_amount: Option<i64>,
    },
}

impl FundFlow {
    pub fn is_income(&self) -> bool {
        matches!(self, FundFlow::Income { .. })
    }
}

/// Single ledger line of the donation fund. Amounts are whole yuan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundRecord {
    pub id: RecordId,
    pub month: String,
    pub amount: i64,
    #[serde(flatten)]
    pub flow: FundFlow,
    #[serde(default)]
    pub invoice_images: Vec<String>,
    #[serde(default)]
    pub product_images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Suggestion,
    Complaint,
    Report,
}

impl FeedbackKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Suggestion => "建议",
            Self::Complaint => "投诉",
            Self::Report => "举报",
        }
    }

    /// Complaints and reports start out anonymous.
    pub const fn anonymous_by_default(self) -> bool {
        !matches!(self, Self::Suggestion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Pending,
    Read,
}

impl FeedbackStatus {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Read,
            Self::Read => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: RecordId,
    pub kind: FeedbackKind,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub status: FeedbackStatus,
    pub name: String,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftKind {
    Lollipop,
    Cake,
    Car,
    Yacht,
    Rocket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gift {
    pub id: RecordId,
    pub kind: GiftKind,
    pub name: String,
    pub points: u32,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftDirection {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftHistoryItem {
    pub id: RecordId,
    pub direction: GiftDirection,
    pub counterpart: String,
    pub gift_name: String,
    pub gift_icon: String,
    /// Signed point movement for the current user.
    pub points: i64,
    pub message: String,
    pub date: NaiveDate,
}

//! Admin CMS edit forms.
//!
//! Each draft carries the id of the record being edited (absent for a new record) and the
//! form fields, most of them optional. Turning a draft into a record applies the field
//! defaults and rejects forms with missing required fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    BenefitItem, Course, CourseCategory, CoursePermissions, DownloadItem, FundFlow, FundRecord,
    NoticeKind, Notification, PointRule, RecordId,
};
use super::error::{require_text, ValidationError};
use super::notices::ALL_DOWNLOADS_CATEGORY;

pub const DEFAULT_PUBLISHER: &str = "行政部";
pub const DEFAULT_RULE_CATEGORY: &str = "全员";
pub const DEFAULT_FILE_NAME: &str = "file.pdf";
pub const DEFAULT_INCOME_DEPARTMENT: &str = "技术部";
pub const DEFAULT_EXPENSE_TYPE: &str = "日常支出";
pub const DEFAULT_COURSE_IMAGE: &str = "https://picsum.photos/400/300";
pub const DEFAULT_BENEFIT_IMAGE: &str = "https://picsum.photos/300/300";

/// Records addressable by id inside a portal list.
pub trait Keyed {
    fn id(&self) -> &RecordId;
}

macro_rules! keyed {
    ($($record:ty),* $(,)?) => {
        $(impl Keyed for $record {
            fn id(&self) -> &RecordId {
                &self.id
            }
        })*
    };
}

keyed!(
    Notification,
    Course,
    BenefitItem,
    DownloadItem,
    PointRule,
    FundRecord,
    super::domain::Feedback,
);

/// Where a newly created record lands in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Prepend,
    Append,
}

/// Form that creates or updates one kind of record.
pub trait RecordDraft {
    type Record: Keyed;

    const PLACEMENT: Placement;

    /// Id of the record being edited; `None` creates a new one.
    fn existing_id(&self) -> Option<&RecordId>;

    fn into_record(
        self,
        id: RecordId,
        previous: Option<&Self::Record>,
        today: NaiveDate,
    ) -> Result<Self::Record, ValidationError>;
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: Option<NoticeKind>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub publisher: Option<String>,
    /// ISO date as typed in the form; blank means the notice never expires.
    #[serde(default)]
    pub expiry_date: Option<String>,
}

impl RecordDraft for NoticeDraft {
    type Record = Notification;

    const PLACEMENT: Placement = Placement::Prepend;

    fn existing_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn into_record(
        self,
        id: RecordId,
        previous: Option<&Notification>,
        today: NaiveDate,
    ) -> Result<Notification, ValidationError> {
        let title = require_text("title", &self.title)?;
        let content = require_text("content", &self.content)?;
        let expiry_date = match optional_text(self.expiry_date) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| ValidationError::missing("expiry_date"))?,
            ),
            None => None,
        };

        Ok(Notification {
            id,
            title,
            date: self.date.unwrap_or(today),
            kind: self.kind.unwrap_or(NoticeKind::General),
            content,
            read_count: previous.map(|notice| notice.read_count).unwrap_or(0),
            is_pinned: self.is_pinned,
            publisher: or_default(self.publisher, DEFAULT_PUBLISHER),
            expiry_date,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<CourseCategory>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub permissions: Option<CoursePermissions>,
}

impl RecordDraft for CourseDraft {
    type Record = Course;

    const PLACEMENT: Placement = Placement::Append;

    fn existing_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn into_record(
        self,
        id: RecordId,
        _previous: Option<&Course>,
        _today: NaiveDate,
    ) -> Result<Course, ValidationError> {
        Ok(Course {
            id,
            title: require_text("title", &self.title)?,
            category: self.category.unwrap_or(CourseCategory::GeneralSkills),
            image_url: or_default(self.image_url, DEFAULT_COURSE_IMAGE),
            permissions: self.permissions.unwrap_or_else(CoursePermissions::open),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RecordDraft for BenefitDraft {
    type Record = BenefitItem;

    const PLACEMENT: Placement = Placement::Prepend;

    fn existing_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn into_record(
        self,
        id: RecordId,
        _previous: Option<&BenefitItem>,
        _today: NaiveDate,
    ) -> Result<BenefitItem, ValidationError> {
        Ok(BenefitItem {
            id,
            title: require_text("title", &self.title)?,
            points: self.points,
            price: self.price,
            image_url: or_default(self.image_url, DEFAULT_BENEFIT_IMAGE),
            description: optional_text(self.description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl RecordDraft for DownloadDraft {
    type Record = DownloadItem;

    const PLACEMENT: Placement = Placement::Prepend;

    fn existing_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    // saving re-dates the item
    fn into_record(
        self,
        id: RecordId,
        _previous: Option<&DownloadItem>,
        today: NaiveDate,
    ) -> Result<DownloadItem, ValidationError> {
        Ok(DownloadItem {
            id,
            title: require_text("title", &self.title)?,
            content: self.content.trim().to_string(),
            date: today,
            category: or_default(self.category, ALL_DOWNLOADS_CATEGORY),
            is_pinned: self.is_pinned,
            file_name: or_default(self.file_name, DEFAULT_FILE_NAME),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRuleDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl RecordDraft for PointRuleDraft {
    type Record = PointRule;

    const PLACEMENT: Placement = Placement::Append;

    fn existing_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn into_record(
        self,
        id: RecordId,
        _previous: Option<&PointRule>,
        _today: NaiveDate,
    ) -> Result<PointRule, ValidationError> {
        Ok(PointRule {
            id,
            category: or_default(self.category, DEFAULT_RULE_CATEGORY),
            title: require_text("title", &self.title)?,
            content: self.content.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundDirection {
    #[default]
    Income,
    Expense,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundDraft {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default, rename = "type")]
    pub direction: FundDirection,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub expense_type: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub needed_amount: Option<i64>,
    #[serde(default)]
    pub invoice_images: Vec<String>,
    #[serde(default)]
    pub product_images: Vec<String>,
}

impl RecordDraft for FundDraft {
    type Record = FundRecord;

    const PLACEMENT: Placement = Placement::Prepend;

    fn existing_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn into_record(
        self,
        id: RecordId,
        _previous: Option<&FundRecord>,
        _today: NaiveDate,
    ) -> Result<FundRecord, ValidationError> {
        let month = require_text("month", &self.month)?;
        if self.amount == 0 {
            return Err(ValidationError::missing("amount"));
        }

        let flow = match self.direction {
            FundDirection::Income => FundFlow::Income {
                department: Some(or_default(self.department, DEFAULT_INCOME_DEPARTMENT)),
            },
            FundDirection::Expense => FundFlow::Expense {
                expense_type: Some(or_default(self.expense_type, DEFAULT_EXPENSE_TYPE)),
                project: optional_text(self.project),
                needed_amount: self.needed_amount.filter(|amount| *amount != 0),
            },
        };

        Ok(FundRecord {
            id,
            month,
            amount: self.amount,
            flow,
            invoice_images: self.invoice_images,
            product_images: self.product_images,
        })
    }
}

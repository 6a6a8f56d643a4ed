use serde::Serialize;

use super::benefits::CheckoutStage;
use super::domain::{RankTrack, RecordId};

/// A create/update was rejected because a required form field is empty or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("请填写完整信息: {field}")]
pub struct ValidationError {
    pub field: &'static str,
}

impl ValidationError {
    pub const fn missing(field: &'static str) -> Self {
        Self { field }
    }
}

/// Return `value` trimmed, or a validation failure naming `field` when it is blank.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Non-blocking notice that a rubric's weights do not add up to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightWarning {
    pub track: RankTrack,
    pub level: u8,
    pub total_weight: u32,
}

impl WeightWarning {
    pub fn message(&self) -> String {
        format!(
            "{}{} 维度权重合计 {}%，应为 100%",
            self.track.code(),
            self.level,
            self.total_weight
        )
    }
}

/// Which list a record lives in; used in not-found errors and deletion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Notice,
    Course,
    Benefit,
    Download,
    PointRule,
    FundRecord,
    Feedback,
    Employee,
    Gift,
    RankStandard,
    Dimension,
}

impl RecordKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Course => "course",
            Self::Benefit => "benefit",
            Self::Download => "download",
            Self::PointRule => "point rule",
            Self::FundRecord => "fund record",
            Self::Feedback => "feedback",
            Self::Employee => "employee",
            Self::Gift => "gift",
            Self::RankStandard => "rank standard",
            Self::Dimension => "dimension",
        }
    }
}

/// Error raised by portal state operations.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{} {id} not found", .kind.label())]
    NotFound { kind: RecordKind, id: RecordId },
    #[error("dimension '{name}' already exists for {}{level}", .track.code())]
    DuplicateDimension {
        track: RankTrack,
        level: u8,
        name: String,
    },
    #[error("积分不足: requires {required}, available {available}")]
    InsufficientPoints { required: u32, available: u32 },
    #[error("checkout is at stage {actual:?}, expected {expected:?}")]
    InvalidStage {
        expected: CheckoutStage,
        actual: CheckoutStage,
    },
    #[error("deduction of {requested} points exceeds the allowed maximum of {maximum}")]
    DeductionOutOfRange { requested: u32, maximum: u32 },
    #[error("no checkout in progress")]
    NoActiveCheckout,
    #[error("benefit {0} is not redeemable through this checkout path")]
    WrongCheckoutPath(RecordId),
    #[error("no rank standard configured for {}{level}", .track.code())]
    NoStandard { track: RankTrack, level: u8 },
}

impl PortalError {
    pub(crate) fn not_found(kind: RecordKind, id: &RecordId) -> Self {
        Self::NotFound {
            kind,
            id: id.clone(),
        }
    }
}

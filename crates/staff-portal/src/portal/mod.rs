//! Employee portal domain: data model, aggregate views, and the owned state the admin CMS
//! edits.

pub mod benefits;
pub mod domain;
pub mod drafts;
pub mod error;
pub mod feedback;
pub mod funds;
pub mod gifts;
pub mod leaderboard;
pub mod learning;
pub mod notices;
pub mod promotion;
pub mod router;
pub(crate) mod seed;
pub mod services;
pub mod state;

#[cfg(test)]
mod tests;

pub use benefits::{
    CheckoutPath, CheckoutStage, ContactForm, HybridCheckout, PaymentReceipt, PointExchange,
};
pub use domain::{
    BenefitItem, Course, CourseCategory, CoursePermissions, DownloadItem, Employee, EmployeeRole,
    Feedback, FeedbackKind, FeedbackStatus, FundFlow, FundRecord, Gift, GiftDirection,
    GiftHistoryItem, GiftKind, LeaderboardEntry, NoticeKind, Notification, PointRule,
    RankDimension, RankStandard, RankTrack, RecordId, RedemptionRecord, RedemptionStatus, Trend,
};
pub use drafts::{
    BenefitDraft, CourseDraft, DownloadDraft, FundDirection, FundDraft, NoticeDraft,
    PointRuleDraft,
};
pub use error::{PortalError, RecordKind, ValidationError, WeightWarning};
pub use feedback::{FeedbackSubmission, ANONYMOUS_NAME};
pub use funds::{
    build_expense_matrix, build_income_matrix, ExpenseMatrix, FundImportError, FundLayout,
    FundRecordImporter, FundReport, FundSummary, IncomeMatrix, ProjectProofs,
};
pub use gifts::GiftDelivery;
pub use leaderboard::{adjust_and_rerank, rerank};
pub use learning::{visible_courses, CourseQuery, PermissionAxis, Viewer, WILDCARD};
pub use notices::{days_remaining, filter_downloads, rank_notices, RankedNotice, NO_EXPIRY_DAYS};
pub use promotion::{score_promotion, EvaluationSheet, PromotionScore, PROMOTION_THRESHOLD};
pub use router::{portal_router, SharedPortal};
pub use services::{IconKind, ServiceEntry};
pub use state::{DeletionTarget, DimensionDraft, EvaluationResult, PendingDeletion, PortalState};

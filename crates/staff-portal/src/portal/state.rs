//! Owned in-memory state of the portal.
//!
//! [`PortalState`] is the only owner of every list the portal shows. Screens read through
//! accessors and the admin CMS mutates through the methods below, which validate input,
//! keep derived values (leaderboard ranks, the current user's balance) in sync, and log
//! each change.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PortalConfig;

use super::benefits::{CheckoutPath, ContactForm, HybridCheckout, PaymentReceipt, PointExchange};
use super::domain::{
    BenefitItem, Course, DownloadItem, Employee, EmployeeRole, Feedback, FeedbackStatus,
    FundRecord, Gift, GiftHistoryItem, LeaderboardEntry, Notification, PointRule, RankDimension,
    RankStandard, RankTrack, RecordId, RedemptionRecord, RedemptionStatus,
};
use super::drafts::{
    BenefitDraft, CourseDraft, DownloadDraft, FundDraft, Keyed, NoticeDraft, Placement,
    PointRuleDraft, RecordDraft, DEFAULT_RULE_CATEGORY,
};
use super::error::{require_text, PortalError, RecordKind, ValidationError, WeightWarning};
use super::feedback::FeedbackSubmission;
use super::funds::{FundLayout, FundReport, ProjectProofs};
use super::gifts::{self, GiftDelivery};
use super::leaderboard;
use super::learning::{self, CourseQuery, Viewer};
use super::notices::{self, RankedNotice};
use super::promotion::{self, EvaluationSheet, PromotionScore, PROMOTION_THRESHOLD};
use super::seed;
use super::services::ServiceEntry;

static LAST_RECORD_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp id, bumped past the previous one when two creates share a tick.
fn next_record_id() -> RecordId {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_RECORD_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    RecordId(now.max(previous + 1).to_string())
}

/// Record the admin asked to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DeletionTarget {
    Notice(RecordId),
    Course(RecordId),
    Benefit(RecordId),
    Download(RecordId),
    PointRule(RecordId),
    FundRecord(RecordId),
    Feedback(RecordId),
}

impl DeletionTarget {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Notice(_) => RecordKind::Notice,
            Self::Course(_) => RecordKind::Course,
            Self::Benefit(_) => RecordKind::Benefit,
            Self::Download(_) => RecordKind::Download,
            Self::PointRule(_) => RecordKind::PointRule,
            Self::FundRecord(_) => RecordKind::FundRecord,
            Self::Feedback(_) => RecordKind::Feedback,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            Self::Notice(id)
            | Self::Course(id)
            | Self::Benefit(id)
            | Self::Download(id)
            | Self::PointRule(id)
            | Self::FundRecord(id)
            | Self::Feedback(id) => id,
        }
    }
}

/// Confirmation token for a deletion. Only [`PortalState::request_deletion`] creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    target: DeletionTarget,
}

impl PendingDeletion {
    pub fn target(&self) -> &DeletionTarget {
        &self.target
    }

    /// Prompt shown before the admin confirms.
    pub fn prompt(&self) -> &'static str {
        match self.target {
            DeletionTarget::FundRecord(_) => "删除此记录?",
            DeletionTarget::Feedback(_) => "删除此反馈?",
            _ => "确定删除?",
        }
    }
}

/// New rubric dimension as entered in the rank configuration screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: u8,
    #[serde(default)]
    pub description: String,
}

/// Outcome of a promotion evaluation together with the progress it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub employee_id: RecordId,
    pub score: PromotionScore,
    pub next_level_progress: Option<f64>,
    pub promotion_due: bool,
}

fn find_index<T: Keyed>(list: &[T], id: &RecordId) -> Option<usize> {
    list.iter().position(|record| record.id() == id)
}

fn upsert<D: RecordDraft>(
    list: &mut Vec<D::Record>,
    draft: D,
    kind: RecordKind,
    today: NaiveDate,
) -> Result<D::Record, PortalError>
where
    D::Record: Clone,
{
    match draft.existing_id().cloned() {
        Some(id) => {
            let index = find_index(list, &id).ok_or_else(|| PortalError::not_found(kind, &id))?;
            let record = draft.into_record(id, Some(&list[index]), today)?;
            list[index] = record.clone();
            info!(kind = kind.label(), id = %record.id(), "record updated");
            Ok(record)
        }
        None => {
            let record = draft.into_record(next_record_id(), None, today)?;
            match D::PLACEMENT {
                Placement::Prepend => list.insert(0, record.clone()),
                Placement::Append => list.push(record.clone()),
            }
            info!(kind = kind.label(), id = %record.id(), "record created");
            Ok(record)
        }
    }
}

fn remove_by_id<T: Keyed>(list: &mut Vec<T>, id: &RecordId) -> bool {
    let before = list.len();
    list.retain(|record| record.id() != id);
    list.len() != before
}

#[derive(Debug, Clone)]
pub struct PortalState {
    exchange: PointExchange,
    fund_layout: FundLayout,
    today_override: Option<NaiveDate>,
    user: Employee,
    notices: Vec<Notification>,
    courses: Vec<Course>,
    benefits: Vec<BenefitItem>,
    redemptions: Vec<RedemptionRecord>,
    downloads: Vec<DownloadItem>,
    point_rules: Vec<PointRule>,
    fund_records: Vec<FundRecord>,
    feedback: Vec<Feedback>,
    gifts: Vec<Gift>,
    gift_history: Vec<GiftHistoryItem>,
    rank_standards: Vec<RankStandard>,
    leaderboard: Vec<LeaderboardEntry>,
    rank_progress: HashMap<RecordId, f64>,
    services: Vec<ServiceEntry>,
    promotion_alert: bool,
    checkout: Option<HybridCheckout>,
}

impl PortalState {
    /// Empty portal acting as `user`.
    pub fn new(config: &PortalConfig, user: Employee) -> Self {
        let promotion_alert = user.next_level_progress >= PROMOTION_THRESHOLD;
        Self {
            exchange: PointExchange::new(config.point_exchange_rate),
            fund_layout: FundLayout::standard(),
            today_override: None,
            user,
            notices: Vec::new(),
            courses: Vec::new(),
            benefits: Vec::new(),
            redemptions: Vec::new(),
            downloads: Vec::new(),
            point_rules: Vec::new(),
            fund_records: Vec::new(),
            feedback: Vec::new(),
            gifts: Vec::new(),
            gift_history: Vec::new(),
            rank_standards: Vec::new(),
            leaderboard: Vec::new(),
            rank_progress: HashMap::new(),
            services: Vec::new(),
            promotion_alert,
            checkout: None,
        }
    }

    /// Portal preloaded with the demo data set.
    pub fn seeded(config: &PortalConfig) -> Self {
        let user = seed::current_user();
        if user.id.as_str() != config.current_user {
            warn!(
                configured = %config.current_user,
                acting_as = %user.id,
                "configured user is not part of the demo data"
            );
        }

        let mut state = Self::new(config, user);
        state.notices = seed::notices();
        state.courses = seed::courses();
        state.benefits = seed::benefits();
        state.downloads = seed::downloads();
        state.point_rules = seed::point_rules();
        state.fund_records = seed::fund_records();
        state.gifts = seed::gifts();
        state.rank_standards = seed::rank_standards();
        state.services = seed::service_entries();
        state.set_leaderboard(seed::leaderboard());
        state
    }

    /// Pin "today" for date-stamped operations.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today_override = Some(today);
        self
    }

    pub fn with_fund_layout(mut self, layout: FundLayout) -> Self {
        self.fund_layout = layout;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn exchange(&self) -> PointExchange {
        self.exchange
    }

    pub fn user(&self) -> &Employee {
        &self.user
    }

    pub fn viewer(&self) -> Viewer {
        Viewer {
            department: self.user.department.clone(),
            level: self.user.level.clone(),
        }
    }

    pub fn promotion_alert(&self) -> bool {
        self.promotion_alert
    }

    pub fn dismiss_promotion_alert(&mut self) {
        self.promotion_alert = false;
    }

    pub fn services(&self) -> &[ServiceEntry] {
        &self.services
    }

    pub fn notices(&self) -> &[Notification] {
        &self.notices
    }

    pub fn ranked_notices(&self, today: NaiveDate) -> Vec<RankedNotice> {
        notices::rank_notices(self.notices.iter().cloned(), today)
    }

    pub fn set_notices(&mut self, notices: Vec<Notification>) {
        self.notices = notices;
    }

    pub fn save_notice(&mut self, draft: NoticeDraft) -> Result<Notification, PortalError> {
        let today = self.today();
        upsert(&mut self.notices, draft, RecordKind::Notice, today)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn visible_courses(&self, viewer: &Viewer, query: &CourseQuery) -> Vec<&Course> {
        learning::visible_courses(&self.courses, viewer, query)
    }

    pub fn set_courses(&mut self, courses: Vec<Course>) {
        self.courses = courses;
    }

    pub fn save_course(&mut self, draft: CourseDraft) -> Result<Course, PortalError> {
        let today = self.today();
        upsert(&mut self.courses, draft, RecordKind::Course, today)
    }

    pub fn downloads(&self, category: Option<&str>, search: &str) -> Vec<&DownloadItem> {
        notices::filter_downloads(&self.downloads, category, search)
    }

    pub fn save_download(&mut self, draft: DownloadDraft) -> Result<DownloadItem, PortalError> {
        let today = self.today();
        upsert(&mut self.downloads, draft, RecordKind::Download, today)
    }

    pub fn point_rules(&self) -> &[PointRule] {
        &self.point_rules
    }

    /// Rules shown under a category tab. The company-wide tab lists only company-wide
    /// rules; any other tab lists its own rules together with the company-wide ones.
    pub fn point_rules_for(&self, tab: &str) -> Vec<&PointRule> {
        self.point_rules
            .iter()
            .filter(|rule| {
                rule.category == DEFAULT_RULE_CATEGORY
                    || (tab != DEFAULT_RULE_CATEGORY && rule.category == tab)
            })
            .collect()
    }

    pub fn save_point_rule(&mut self, draft: PointRuleDraft) -> Result<PointRule, PortalError> {
        let today = self.today();
        upsert(&mut self.point_rules, draft, RecordKind::PointRule, today)
    }

    pub fn fund_records(&self) -> &[FundRecord] {
        &self.fund_records
    }

    pub fn set_fund_records(&mut self, records: Vec<FundRecord>) {
        info!(count = records.len(), "fund ledger replaced");
        self.fund_records = records;
    }

    pub fn save_fund_record(&mut self, draft: FundDraft) -> Result<FundRecord, PortalError> {
        let today = self.today();
        upsert(&mut self.fund_records, draft, RecordKind::FundRecord, today)
    }

    pub fn fund_report(&self) -> FundReport {
        FundReport::build(&self.fund_records, &self.fund_layout)
    }

    pub fn project_proofs(&self, project: &str) -> ProjectProofs {
        ProjectProofs::collect(&self.fund_records, project)
    }

    /// First half of a delete: checks the record exists and hands back a token to confirm.
    pub fn request_deletion(&self, target: DeletionTarget) -> Result<PendingDeletion, PortalError> {
        let id = target.id();
        let exists = match &target {
            DeletionTarget::Notice(_) => find_index(&self.notices, id).is_some(),
            DeletionTarget::Course(_) => find_index(&self.courses, id).is_some(),
            DeletionTarget::Benefit(_) => find_index(&self.benefits, id).is_some(),
            DeletionTarget::Download(_) => find_index(&self.downloads, id).is_some(),
            DeletionTarget::PointRule(_) => find_index(&self.point_rules, id).is_some(),
            DeletionTarget::FundRecord(_) => find_index(&self.fund_records, id).is_some(),
            DeletionTarget::Feedback(_) => find_index(&self.feedback, id).is_some(),
        };

        if !exists {
            return Err(PortalError::not_found(target.kind(), id));
        }
        Ok(PendingDeletion { target })
    }

    pub fn confirm_deletion(&mut self, pending: PendingDeletion) -> Result<(), PortalError> {
        let target = pending.target;
        let id = target.id();
        let removed = match &target {
            DeletionTarget::Notice(_) => remove_by_id(&mut self.notices, id),
            DeletionTarget::Course(_) => remove_by_id(&mut self.courses, id),
            DeletionTarget::Benefit(_) => remove_by_id(&mut self.benefits, id),
            DeletionTarget::Download(_) => remove_by_id(&mut self.downloads, id),
            DeletionTarget::PointRule(_) => remove_by_id(&mut self.point_rules, id),
            DeletionTarget::FundRecord(_) => remove_by_id(&mut self.fund_records, id),
            DeletionTarget::Feedback(_) => remove_by_id(&mut self.feedback, id),
        };

        if !removed {
            return Err(PortalError::not_found(target.kind(), id));
        }
        info!(kind = target.kind().label(), id = %id, "record deleted");
        Ok(())
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn set_leaderboard(&mut self, mut entries: Vec<LeaderboardEntry>) {
        leaderboard::rerank(&mut entries);
        self.leaderboard = entries;
    }

    /// Award or dock points, re-rank, and keep the current user's balance in step.
    pub fn adjust_points(&mut self, id: &RecordId, delta: i64) -> Result<&[LeaderboardEntry], PortalError> {
        if !leaderboard::adjust_and_rerank(&mut self.leaderboard, id, delta)? {
            return Err(PortalError::not_found(RecordKind::Employee, id));
        }

        if *id == self.user.id {
            let magnitude = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
            self.user.total_points = if delta >= 0 {
                self.user.total_points.saturating_add(magnitude)
            } else {
                self.user.total_points.saturating_sub(magnitude)
            };
        }

        info!(id = %id, delta, "points adjusted");
        Ok(&self.leaderboard)
    }

    pub fn rank_standards(&self) -> &[RankStandard] {
        &self.rank_standards
    }

    pub fn standard(&self, track: RankTrack, level: u8) -> Option<&RankStandard> {
        self.rank_standards
            .iter()
            .find(|standard| standard.track == track && standard.level == level)
    }

    /// Employees the given role is responsible for evaluating.
    pub fn subordinates(&self, evaluator: EmployeeRole) -> Vec<&LeaderboardEntry> {
        match evaluator.evaluates() {
            Some(role) => self
                .leaderboard
                .iter()
                .filter(|entry| entry.role == role)
                .collect(),
            None => Vec::new(),
        }
    }

    fn entry(&self, id: &RecordId) -> Result<&LeaderboardEntry, PortalError> {
        self.leaderboard
            .iter()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| PortalError::not_found(RecordKind::Employee, id))
    }

    /// Zeroed score sheet for the rubric the employee is measured against.
    pub fn evaluation_sheet(&self, employee_id: &RecordId) -> Result<EvaluationSheet, PortalError> {
        let entry = self.entry(employee_id)?;
        promotion::standard_for_next_level(&self.rank_standards, entry.rank_track, entry.rank_level)
            .map(promotion::blank_sheet)
            .ok_or(PortalError::NoStandard {
                track: entry.rank_track,
                level: entry.rank_level.saturating_add(1),
            })
    }

    pub fn rank_progress(&self, employee_id: &RecordId) -> Option<f64> {
        if *employee_id == self.user.id {
            return Some(self.user.next_level_progress);
        }
        self.rank_progress.get(employee_id).copied()
    }

    /// Score an employee and store the result as their promotion progress.
    ///
    /// `NoStandard` leaves any previous progress untouched.
    pub fn evaluate_promotion(
        &mut self,
        employee_id: &RecordId,
        sheet: &EvaluationSheet,
    ) -> Result<EvaluationResult, PortalError> {
        promotion::validate_sheet(sheet)?;
        let (track, level) = {
            let entry = self.entry(employee_id)?;
            (entry.rank_track, entry.rank_level)
        };

        let score = promotion::score_promotion(&self.rank_standards, track, level, sheet);
        let Some(value) = score.value() else {
            warn!(id = %employee_id, track = %track.code(), level, "no rubric for next level");
            return Ok(EvaluationResult {
                employee_id: employee_id.clone(),
                score,
                next_level_progress: self.rank_progress(employee_id),
                promotion_due: false,
            });
        };

        let progress = value.clamp(0.0, 100.0);
        self.rank_progress.insert(employee_id.clone(), progress);
        if *employee_id == self.user.id {
            self.user.next_level_progress = progress;
            self.promotion_alert = progress >= PROMOTION_THRESHOLD;
        }

        info!(id = %employee_id, score = value, "promotion evaluated");
        Ok(EvaluationResult {
            employee_id: employee_id.clone(),
            score,
            next_level_progress: Some(progress),
            promotion_due: progress >= PROMOTION_THRESHOLD,
        })
    }

    /// Add a dimension to the rubric of `(track, level)`, creating the rubric when needed.
    ///
    /// Returns a warning when the weights no longer add up to 100; the change is kept.
    pub fn add_dimension(
        &mut self,
        track: RankTrack,
        level: u8,
        draft: DimensionDraft,
    ) -> Result<Option<WeightWarning>, PortalError> {
        let name = require_text("name", &draft.name)?;
        if draft.weight == 0 || draft.weight > 100 {
            return Err(ValidationError::missing("weight").into());
        }

        let dimension = RankDimension {
            name,
            weight: draft.weight,
            description: draft.description.trim().to_string(),
        };

        let index = match self
            .rank_standards
            .iter()
            .position(|standard| standard.track == track && standard.level == level)
        {
            Some(index) => index,
            None => {
                self.rank_standards.push(RankStandard {
                    id: next_record_id(),
                    track,
                    level,
                    dimensions: Vec::new(),
                });
                self.rank_standards.len() - 1
            }
        };

        let standard = &mut self.rank_standards[index];
        if standard.dimensions.iter().any(|dim| dim.name == dimension.name) {
            return Err(PortalError::DuplicateDimension {
                track,
                level,
                name: dimension.name,
            });
        }

        info!(track = %track.code(), level, dimension = %dimension.name, "dimension added");
        standard.dimensions.push(dimension);
        Ok(promotion::weight_warning(standard))
    }

    pub fn remove_dimension(
        &mut self,
        track: RankTrack,
        level: u8,
        name: &str,
    ) -> Result<Option<WeightWarning>, PortalError> {
        let standard = self
            .rank_standards
            .iter_mut()
            .find(|standard| standard.track == track && standard.level == level)
            .ok_or(PortalError::NoStandard { track, level })?;

        let before = standard.dimensions.len();
        standard.dimensions.retain(|dim| dim.name != name);
        if standard.dimensions.len() == before {
            return Err(PortalError::not_found(
                RecordKind::Dimension,
                &RecordId::from(name),
            ));
        }

        info!(track = %track.code(), level, dimension = name, "dimension removed");
        Ok(promotion::weight_warning(standard))
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn submit_feedback(&mut self, submission: FeedbackSubmission) -> Result<Feedback, PortalError> {
        let feedback = submission.into_feedback(next_record_id(), &self.user.name, self.today())?;
        info!(id = %feedback.id, kind = feedback.kind.label(), "feedback submitted");
        self.feedback.insert(0, feedback.clone());
        Ok(feedback)
    }

    pub fn toggle_feedback(&mut self, id: &RecordId) -> Result<FeedbackStatus, PortalError> {
        let feedback = self
            .feedback
            .iter_mut()
            .find(|feedback| &feedback.id == id)
            .ok_or_else(|| PortalError::not_found(RecordKind::Feedback, id))?;
        feedback.status = feedback.status.toggled();
        debug!(id = %id, status = ?feedback.status, "feedback status toggled");
        Ok(feedback.status)
    }

    pub fn benefits(&self) -> &[BenefitItem] {
        &self.benefits
    }

    pub fn save_benefit(&mut self, draft: BenefitDraft) -> Result<BenefitItem, PortalError> {
        let today = self.today();
        upsert(&mut self.benefits, draft, RecordKind::Benefit, today)
    }

    pub fn redemptions(&self) -> &[RedemptionRecord] {
        &self.redemptions
    }

    fn benefit(&self, id: &RecordId) -> Result<&BenefitItem, PortalError> {
        self.benefits
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| PortalError::not_found(RecordKind::Benefit, id))
    }

    fn record_redemption(&mut self, title: String, points: u32, image_url: String) -> RedemptionRecord {
        self.user.total_points = self.user.total_points.saturating_sub(points);
        let record = RedemptionRecord {
            id: next_record_id(),
            title,
            points,
            date: self.today(),
            image_url,
            status: RedemptionStatus::Unused,
        };
        self.redemptions.insert(0, record.clone());
        record
    }

    /// Redeem a points-only item in one step.
    pub fn redeem_points(&mut self, id: &RecordId) -> Result<RedemptionRecord, PortalError> {
        let item = self.benefit(id)?.clone();
        if item.checkout_path() != CheckoutPath::Points {
            return Err(PortalError::WrongCheckoutPath(item.id));
        }

        let available = self.user.total_points;
        if available < item.points {
            return Err(PortalError::InsufficientPoints {
                required: item.points,
                available,
            });
        }

        let record = self.record_redemption(item.title, item.points, item.image_url);
        info!(benefit = %id, points = record.points, "benefit redeemed");
        Ok(record)
    }

    /// Open a hybrid checkout for a cash-priced item, replacing any unfinished one.
    pub fn start_checkout(&mut self, id: &RecordId) -> Result<&HybridCheckout, PortalError> {
        let item = self.benefit(id)?.clone();
        let checkout = HybridCheckout::start(item, self.exchange)?;
        debug!(benefit = %id, "checkout started");
        Ok(&*self.checkout.insert(checkout))
    }

    pub fn checkout(&self) -> Option<&HybridCheckout> {
        self.checkout.as_ref()
    }

    pub fn cancel_checkout(&mut self) {
        if self.checkout.take().is_some() {
            debug!("checkout cancelled");
        }
    }

    fn active_checkout(&mut self) -> Result<&mut HybridCheckout, PortalError> {
        self.checkout
            .as_mut()
            .ok_or(PortalError::NoActiveCheckout)
    }

    pub fn choose_deduction(&mut self, points: u32) -> Result<&HybridCheckout, PortalError> {
        let balance = self.user.total_points;
        let checkout = self.active_checkout()?;
        checkout.choose_deduction(points, balance)?;
        Ok(&*checkout)
    }

    pub fn proceed_to_form(&mut self) -> Result<&HybridCheckout, PortalError> {
        let checkout = self.active_checkout()?;
        checkout.proceed_to_form()?;
        Ok(&*checkout)
    }

    pub fn back_to_deduction(&mut self) -> Result<&HybridCheckout, PortalError> {
        let checkout = self.active_checkout()?;
        checkout.back_to_deduction()?;
        Ok(&*checkout)
    }

    pub fn submit_contact(&mut self, form: ContactForm) -> Result<&HybridCheckout, PortalError> {
        let checkout = self.active_checkout()?;
        checkout.submit_contact(form)?;
        Ok(&*checkout)
    }

    /// Settle the open checkout, deducting the chosen points and closing it.
    pub fn confirm_payment(&mut self) -> Result<PaymentReceipt, PortalError> {
        let balance = self.user.total_points;
        let checkout = self.active_checkout()?;
        let receipt = checkout.confirm_payment(balance)?;
        let image_url = checkout.item().image_url.clone();
        self.checkout = None;

        if receipt.points_deducted > 0 {
            self.record_redemption(
                format!("{} (抵扣)", receipt.title),
                receipt.points_deducted,
                image_url,
            );
        }

        info!(
            title = %receipt.title,
            points = receipt.points_deducted,
            cash = receipt.cash_paid,
            "hybrid payment confirmed"
        );
        Ok(receipt)
    }

    pub fn gifts(&self) -> &[Gift] {
        &self.gifts
    }

    pub fn gift_history(&self) -> &[GiftHistoryItem] {
        &self.gift_history
    }

    fn gift(&self, id: &RecordId) -> Result<&Gift, PortalError> {
        self.gifts
            .iter()
            .find(|gift| &gift.id == id)
            .ok_or_else(|| PortalError::not_found(RecordKind::Gift, id))
    }

    pub fn send_gift(&mut self, delivery: GiftDelivery) -> Result<GiftHistoryItem, PortalError> {
        let gift = match &delivery.gift_id {
            Some(id) => Some(self.gift(id)?.clone()),
            None => None,
        };

        let remaining = gifts::charge(self.user.total_points, gifts::delivery_cost(gift.as_ref()))?;
        let entry = gifts::sent_entry(next_record_id(), &delivery, gift.as_ref(), self.today())?;
        self.user.total_points = remaining;
        info!(to = %entry.counterpart, gift = %entry.gift_name, "gift sent");
        self.gift_history.insert(0, entry.clone());
        Ok(entry)
    }

    pub fn receive_gift(
        &mut self,
        sender: &str,
        gift_id: &RecordId,
        message: &str,
    ) -> Result<GiftHistoryItem, PortalError> {
        let gift = self.gift(gift_id)?.clone();
        let entry = gifts::received_entry(next_record_id(), sender, &gift, message, self.today());
        self.user.total_points = self.user.total_points.saturating_add(gift.points);
        info!(from = sender, gift = %gift.name, "gift received");
        self.gift_history.insert(0, entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let ids: Vec<i64> = (0..50)
            .map(|_| next_record_id().0.parse::<i64>().expect("numeric id"))
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::domain::{CourseCategory, RecordId, RedemptionRecord};
use super::error::{PortalError, ValidationError};
use super::feedback::FeedbackSubmission;
use super::learning::{CourseQuery, Viewer};
use super::promotion::EvaluationSheet;
use super::state::PortalState;

/// Portal state shared between request handlers.
pub type SharedPortal = Arc<RwLock<PortalState>>;

/// Category filter value meaning "every category".
const ANY_CATEGORY: &str = "全部";

/// Router exposing the read models and the mutating actions of the portal.
pub fn portal_router(portal: SharedPortal) -> Router {
    Router::new()
        .route("/api/v1/notices", get(notices_handler))
        .route("/api/v1/funds/report", get(fund_report_handler))
        .route(
            "/api/v1/funds/projects/:project/proofs",
            get(project_proofs_handler),
        )
        .route("/api/v1/leaderboard", get(leaderboard_handler))
        .route("/api/v1/leaderboard/adjust", post(adjust_points_handler))
        .route("/api/v1/promotion/evaluate", post(evaluate_handler))
        .route("/api/v1/courses", get(courses_handler))
        .route("/api/v1/feedback", post(feedback_handler))
        .route("/api/v1/benefits/:benefit_id/redeem", post(redeem_handler))
        .with_state(portal)
}

fn failure(error: PortalError) -> Response {
    AppError::from(error).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoticeParams {
    today: Option<NaiveDate>,
}

pub(crate) async fn notices_handler(
    State(portal): State<SharedPortal>,
    Query(params): Query<NoticeParams>,
) -> Response {
    let portal = portal.read().expect("portal state lock poisoned");
    let today = params.today.unwrap_or_else(|| portal.today());
    (StatusCode::OK, Json(portal.ranked_notices(today))).into_response()
}

pub(crate) async fn fund_report_handler(State(portal): State<SharedPortal>) -> Response {
    let portal = portal.read().expect("portal state lock poisoned");
    (StatusCode::OK, Json(portal.fund_report())).into_response()
}

pub(crate) async fn project_proofs_handler(
    State(portal): State<SharedPortal>,
    Path(project): Path<String>,
) -> Response {
    let portal = portal.read().expect("portal state lock poisoned");
    (StatusCode::OK, Json(portal.project_proofs(&project))).into_response()
}

pub(crate) async fn leaderboard_handler(State(portal): State<SharedPortal>) -> Response {
    let portal = portal.read().expect("portal state lock poisoned");
    (StatusCode::OK, Json(portal.leaderboard())).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdjustRequest {
    id: RecordId,
    delta: i64,
}

pub(crate) async fn adjust_points_handler(
    State(portal): State<SharedPortal>,
    Json(request): Json<AdjustRequest>,
) -> Response {
    let mut portal = portal.write().expect("portal state lock poisoned");
    match portal.adjust_points(&request.id, request.delta) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => failure(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    employee_id: RecordId,
    #[serde(default)]
    scores: EvaluationSheet,
}

pub(crate) async fn evaluate_handler(
    State(portal): State<SharedPortal>,
    Json(request): Json<EvaluateRequest>,
) -> Response {
    let mut portal = portal.write().expect("portal state lock poisoned");
    match portal.evaluate_promotion(&request.employee_id, &request.scores) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => failure(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CourseParams {
    pub(crate) department: Option<String>,
    pub(crate) level: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) search: Option<String>,
}

impl CourseParams {
    fn query(&self) -> Result<CourseQuery, ValidationError> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") | Some(ANY_CATEGORY) => None,
            Some(label) => Some(
                CourseCategory::from_label(label).ok_or(ValidationError::missing("category"))?,
            ),
        };

        Ok(CourseQuery {
            category,
            search: self.search.clone(),
        })
    }
}

/// Courses visible to the viewer; department and level default to the current user's.
pub(crate) async fn courses_handler(
    State(portal): State<SharedPortal>,
    Query(params): Query<CourseParams>,
) -> Response {
    let query = match params.query() {
        Ok(query) => query,
        Err(error) => return failure(error.into()),
    };

    let portal = portal.read().expect("portal state lock poisoned");
    let current = portal.viewer();
    let viewer = Viewer {
        department: params.department.unwrap_or(current.department),
        level: params.level.unwrap_or(current.level),
    };
    (StatusCode::OK, Json(portal.visible_courses(&viewer, &query))).into_response()
}

pub(crate) async fn feedback_handler(
    State(portal): State<SharedPortal>,
    Json(submission): Json<FeedbackSubmission>,
) -> Response {
    let mut portal = portal.write().expect("portal state lock poisoned");
    match portal.submit_feedback(submission) {
        Ok(feedback) => (StatusCode::CREATED, Json(feedback)).into_response(),
        Err(error) => failure(error),
    }
}

#[derive(Debug, Serialize)]
struct RedeemResponse {
    record: RedemptionRecord,
    remaining_points: u32,
}

pub(crate) async fn redeem_handler(
    State(portal): State<SharedPortal>,
    Path(benefit_id): Path<String>,
) -> Response {
    let mut portal = portal.write().expect("portal state lock poisoned");
    match portal.redeem_points(&RecordId(benefit_id)) {
        Ok(record) => {
            let body = RedeemResponse {
                record,
                remaining_points: portal.user().total_points,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => failure(error),
    }
}

use super::common::*;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::portal::router::{portal_router, redeem_handler, CourseParams};

#[tokio::test]
async fn notices_route_ranks_for_requested_day() {
    let router = portal_router(shared_portal());
    let response = router
        .oneshot(get("/api/v1/notices?today=2025-11-21"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .expect("array payload")
        .iter()
        .map(|notice| notice["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["n1", "n2", "n3"]);
    assert_eq!(body[0]["effective_pin"], json!(true));
    assert_eq!(body[0]["days_remaining"], json!(19));
    assert_eq!(body[2]["is_expired"], json!(true));
    assert_eq!(body[2]["days_remaining"], json!(-1));
}

#[tokio::test]
async fn fund_report_route_returns_summary_and_matrices() {
    let router = portal_router(shared_portal());
    let response = router
        .oneshot(get("/api/v1/funds/report"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["summary"]["balance"], json!(-260));
    assert_eq!(body["income"]["grand_total"], json!(2290));
    assert_eq!(body["expense"]["grand_total"], json!(2550));
    assert_eq!(body["income"]["months"].as_array().map(Vec::len), Some(12));
}

#[tokio::test]
async fn project_proofs_route_decodes_project_name() {
    let router = portal_router(shared_portal());
    let response = router
        .oneshot(get(
            "/api/v1/funds/projects/%E4%B8%8B%E5%8D%88%E8%8C%B6/proofs",
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["project"], json!("下午茶"));
    assert_eq!(body["invoices"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn adjust_route_reranks_and_rejects_unknown_ids() {
    let portal = shared_portal();
    let response = portal_router(portal.clone())
        .oneshot(json_post(
            "/api/v1/leaderboard/adjust",
            &json!({ "id": "u1", "delta": 5000 }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body[1]["id"], json!("u1"));
    assert_eq!(body[1]["rank"], json!(2));

    let response = portal_router(portal)
        .oneshot(json_post(
            "/api/v1/leaderboard/adjust",
            &json!({ "id": "ghost", "delta": 1 }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adjust_route_rejects_overflow_and_keeps_serving() {
    let portal = shared_portal();
    let response = portal_router(portal.clone())
        .oneshot(json_post(
            "/api/v1/leaderboard/adjust",
            &json!({ "id": "u_boss", "delta": i64::MAX }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], json!("delta"));
    assert!(!portal.is_poisoned());

    let response = portal_router(portal)
        .oneshot(get("/api/v1/leaderboard"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body[0]["score"], json!(12000));
}

#[tokio::test]
async fn evaluate_route_rejects_scores_out_of_range() {
    let router = portal_router(shared_portal());
    let response = router
        .oneshot(json_post(
            "/api/v1/promotion/evaluate",
            &json!({ "employee_id": "u1", "scores": { "专业深度": 500 } }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], json!("scores"));
}

#[tokio::test]
async fn evaluate_route_reports_outcome() {
    let router = portal_router(shared_portal());
    let response = router
        .oneshot(json_post(
            "/api/v1/promotion/evaluate",
            &json!({
                "employee_id": "u1",
                "scores": { "专业深度": 100, "技术广度": 100, "业务贡献": 100, "人才培养": 100 }
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["score"]["outcome"], json!("scored"));
    assert_eq!(body["score"]["score"], json!(100.0));
    assert_eq!(body["promotion_due"], json!(true));
}

#[tokio::test]
async fn evaluate_route_distinguishes_missing_rubric() {
    let router = portal_router(shared_portal());
    let response = router
        .oneshot(json_post(
            "/api/v1/promotion/evaluate",
            &json!({ "employee_id": "u_boss" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["score"]["outcome"], json!("no_standard"));
}

#[tokio::test]
async fn courses_route_applies_permissions_and_filters() {
    let portal = shared_portal();
    let response = portal_router(portal.clone())
        .oneshot(get(
            "/api/v1/courses?department=%E6%8A%80%E6%9C%AF%E9%83%A8&level=F7",
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .expect("array payload")
        .iter()
        .map(|course| course["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["c1", "c2", "c3", "c5"]);

    let response = portal_router(portal)
        .oneshot(get(
            "/api/v1/courses?department=%E6%8A%80%E6%9C%AF%E9%83%A8&level=F7&category=%E4%B8%93%E4%B8%9A%E6%8A%80%E8%83%BD",
        ))
        .await
        .expect("router responds");
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], json!("c3"));
}

#[tokio::test]
async fn courses_handler_rejects_unknown_category() {
    let params = CourseParams {
        category: Some("烹饪".to_string()),
        ..CourseParams::default()
    };
    let response =
        crate::portal::router::courses_handler(State(shared_portal()), Query(params)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], json!("category"));
}

#[tokio::test]
async fn feedback_route_validates_and_creates() {
    let portal = shared_portal();
    let response = portal_router(portal.clone())
        .oneshot(json_post(
            "/api/v1/feedback",
            &json!({ "kind": "suggestion", "title": " ", "content": "内容" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], json!("title"));

    let response = portal_router(portal.clone())
        .oneshot(json_post(
            "/api/v1/feedback",
            &json!({ "kind": "complaint", "title": "空调太冷", "content": "3楼会议室" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["name"], json!("匿名用户"));
    assert_eq!(body["status"], json!("pending"));

    let stored = portal.read().expect("portal state lock poisoned");
    assert_eq!(stored.feedback().len(), 1);
}

#[tokio::test]
async fn redeem_route_deducts_points() {
    let portal = shared_portal();
    let response = portal_router(portal.clone())
        .oneshot(empty_post("/api/v1/benefits/105/redeem"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["remaining_points"], json!(3000));
    assert_eq!(body["record"]["status"], json!("unused"));
}

#[tokio::test]
async fn redeem_handler_maps_checkout_conflicts() {
    let portal = shared_portal();
    let response = redeem_handler(
        State(portal.clone()),
        axum::extract::Path("101".to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = redeem_handler(State(portal), axum::extract::Path("999".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

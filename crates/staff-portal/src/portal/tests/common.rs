use std::sync::{Arc, RwLock};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::PortalConfig;
use crate::portal::benefits::ContactForm;
use crate::portal::router::SharedPortal;
use crate::portal::state::PortalState;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 20).expect("valid date")
}

pub(super) fn portal() -> PortalState {
    PortalState::seeded(&PortalConfig::default()).with_today(today())
}

pub(super) fn shared_portal() -> SharedPortal {
    Arc::new(RwLock::new(portal()))
}

pub(super) fn contact() -> ContactForm {
    ContactForm {
        nickname: "李明哲".to_string(),
        phone: "13800000000".to_string(),
        address: "3号楼 502".to_string(),
    }
}

pub(super) fn json_post(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(payload).expect("serialize payload"),
        ))
        .expect("build request")
}

pub(super) fn empty_post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).expect("build request")
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("build request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

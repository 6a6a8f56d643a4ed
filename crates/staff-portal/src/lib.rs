//! Domain core of the internal employee portal.
//!
//! The [`portal`] module holds the typed data model, the aggregate computations the portal
//! screens display (notice ranking, fund matrices, promotion scoring, leaderboard ranking,
//! course permissions) and the single owner of in-memory state that the admin CMS mutates.

pub mod config;
pub mod error;
pub mod portal;
pub mod telemetry;

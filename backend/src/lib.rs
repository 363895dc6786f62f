//! # Attendance Rust Backend
//!
//! Student attendance tracking: students register their presence for a class
//! session with a six-digit join code on the day it takes place, and staff
//! get per-course attendance reports and low-attendance alerts.
//!
//! ## Architecture
//!
//! - [`api`]: identifier newtypes and the DTOs exchanged over HTTP
//! - [`models`]: students, courses, sessions, attendances and the clock
//! - [`db`]: repository traits, the in-memory and PostgreSQL backends,
//!   backend selection and configuration
//! - [`services`]: registration rules, reporting, catalog management
//! - [`routes`]: wire types grouped by feature, with operation names
//! - [`http`]: axum router and handlers (feature `http-server`)

// RepositoryError carries an ErrorContext, which makes Result<_, RepositoryError> large.
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

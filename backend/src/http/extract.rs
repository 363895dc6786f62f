//! Extractors whose rejections render as [`AppError`] bodies.
//!
//! axum's own `Json`, `Path` and `Query` answer malformed input with plain
//! text; these wrappers route the rejection through `AppError` so clients
//! always get `{code, message}`.

use axum::extract::{FromRequest, FromRequestParts};

use super::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

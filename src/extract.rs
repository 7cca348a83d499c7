//! Request extractors that report rejections as `AppError`.
//!
//! Axum's stock `Json` and `Path` extractors answer malformed input with their own
//! plain-text responses and a mix of 400/415/422 status codes. These wrappers route
//! every rejection through `AppError::Validation`, so clients always get a 422 with
//! the usual JSON error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` with rejections mapped to `AppError`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` with rejections mapped to `AppError`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

//! Request extractors whose rejections use the [`AppError`] body.
//!
//! Axum's own `Json` and `Query` reject malformed input with a plain-text
//! 400/415/422. These wrappers turn every rejection into a
//! `VALIDATION_ERROR`, so clients see one error shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body extractor. Rejections become 400 `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);

/// Query-string extractor. Rejections become 400 `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ValidQuery<T>(pub T);

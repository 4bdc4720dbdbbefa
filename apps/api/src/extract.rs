//! Body, path and query extractors whose rejections use the error envelope.
//!
//! Handlers import these in place of the axum originals so a malformed body,
//! a non-UUID path segment or a bad query string answers with the same
//! `{success, message, errors}` shape as field validation.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::admin::AdminGuard;
use super::domain::{ContactSubmission, WaitlistSubmission};
use super::repository::{SignupNotifier, WaitlistRepository};
use super::service::{SignupError, SignupService};
use crate::error::AppError;
use crate::response::ApiResponse;

pub struct SignupState<R, N> {
    pub service: Arc<SignupService<R, N>>,
    pub admin: AdminGuard,
}

impl<R, N> Clone for SignupState<R, N> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            admin: self.admin.clone(),
        }
    }
}

/// Router builder exposing waitlist intake, the admin listing, and the contact form.
pub fn signup_router<R, N>(service: Arc<SignupService<R, N>>, admin: AdminGuard) -> Router
where
    R: WaitlistRepository + 'static,
    N: SignupNotifier + 'static,
{
    Router::new()
        .route(
            "/api/waitlist",
            post(join_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route("/api/contact", post(contact_handler::<R, N>))
        .with_state(SignupState { service, admin })
}

pub(crate) async fn join_handler<R, N>(
    State(state): State<SignupState<R, N>>,
    submission: Result<Json<WaitlistSubmission>, JsonRejection>,
) -> Response
where
    R: WaitlistRepository + 'static,
    N: SignupNotifier + 'static,
{
    let Json(submission) = match submission {
        Ok(json) => json,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };
    match state.service.join_waitlist(submission) {
        Ok(entry) => ApiResponse::ok(json!({ "id": entry.id }))
            .with_message("Successfully registered for early access!")
            .into_response_with(StatusCode::OK),
        Err(err) => signup_failure(err, "Failed to save registration"),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(state): State<SignupState<R, N>>,
    headers: HeaderMap,
) -> Response
where
    R: WaitlistRepository + 'static,
    N: SignupNotifier + 'static,
{
    if !state.admin.authorize_headers(&headers) {
        return ApiResponse::failure("Invalid admin key. Access denied.")
            .into_response_with(StatusCode::UNAUTHORIZED);
    }

    match state.service.waitlist() {
        Ok(entries) => {
            let count = entries.len();
            ApiResponse::ok(json!({ "entries": entries, "count": count }))
                .into_response_with(StatusCode::OK)
        }
        Err(err) => signup_failure(err, "Failed to fetch waitlist"),
    }
}

pub(crate) async fn contact_handler<R, N>(
    State(state): State<SignupState<R, N>>,
    submission: Result<Json<ContactSubmission>, JsonRejection>,
) -> Response
where
    R: WaitlistRepository + 'static,
    N: SignupNotifier + 'static,
{
    let Json(submission) = match submission {
        Ok(json) => json,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };
    match state.service.submit_contact(submission) {
        Ok(_) => ApiResponse::ok(json!({ "message": "Contact form submitted successfully" }))
            .into_response_with(StatusCode::OK),
        Err(SignupError::Notify(err)) => {
            error!(error = %err, "support inbox unreachable");
            ApiResponse::failure(
                "Failed to send message. Please try again or email us directly at support@platetrend.com",
            )
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(err) => signup_failure(err, "An unexpected error occurred. Please try again."),
    }
}

fn signup_failure(err: SignupError, fallback: &str) -> Response {
    if err.is_client_error() {
        return ApiResponse::failure(err.to_string()).into_response_with(StatusCode::BAD_REQUEST);
    }
    error!(error = %err, "signup request failed");
    ApiResponse::failure(fallback).into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}

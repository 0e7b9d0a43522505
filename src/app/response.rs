use crate::domain::model::ReviewSnapshot;
use crate::utils::error::ReviewError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// Public shape of a lookup result. The rating is pre-formatted so callers
/// never see more than one (truncated) fraction digit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub reviews_count: u64,
    pub rating: String,
}

impl From<ReviewSnapshot> for ReviewResponse {
    fn from(snapshot: ReviewSnapshot) -> Self {
        Self {
            reviews_count: snapshot.reviews_count(),
            rating: snapshot.display_rating(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn from_review_error(err: &ReviewError, default_message: &str) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            body: ErrorBody {
                status: status.as_u16(),
                message: err.public_message(default_message),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

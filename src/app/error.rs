use crate::utils::error::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Missing data")]
    MissingData,

    #[error("Error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self {
            HttpError::MissingData => StatusCode::BAD_REQUEST,
            HttpError::Store(ref e) => {
                tracing::error!("Request failed: {} ({:?})", e, e.kind());
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

use crate::app::error::HttpError;
use crate::core::store::SubmissionStore;
use crate::core::{Record, SubmissionForm};
use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use std::sync::Arc;

const FORM_PAGE: &str = include_str!("../../assets/form.html");
const SAVED_PAGE: &str = "<h2>🎉 Saved! <a href='/'>Back</a></h2>";

pub fn build_router(store: Arc<SubmissionStore>) -> Router {
    Router::new()
        .route("/", get(form_handler))
        .route("/submit", post(submit_handler))
        .route("/data", get(data_handler))
        .with_state(store)
}

pub async fn form_handler() -> Html<&'static str> {
    Html(FORM_PAGE)
}

pub async fn submit_handler(
    State(store): State<Arc<SubmissionStore>>,
    form: Result<Form<SubmissionForm>, FormRejection>,
) -> Result<Html<&'static str>, HttpError> {
    // A body we can't read as a form counts as one with no fields.
    let form = form.map(|Form(form)| form).unwrap_or_else(|rejection| {
        tracing::debug!("Unreadable submission body: {}", rejection);
        SubmissionForm::default()
    });
    // Rejected before touching storage.
    let record = form.into_record().ok_or(HttpError::MissingData)?;
    store.append(record).await?;
    Ok(Html(SAVED_PAGE))
}

pub async fn data_handler(
    State(store): State<Arc<SubmissionStore>>,
) -> Result<Json<Vec<Record>>, HttpError> {
    let records = store.fetch_all().await?;
    tracing::debug!("Serving {} records", records.len());
    Ok(Json(records))
}

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use ddns_core::DdnsUpdater;
use tracing::{error, info};

use crate::errors::ApiError;

pub fn create_routes(updater: DdnsUpdater) -> Router {
    Router::new()
        .route("/message/{record_name}", get(update_record))
        .with_state(updater)
}

/// `GET /message/{record_name}`
///
/// 200 with `myIP: <ip> recordCount: <n>` after an upsert, 500 with the same
/// body when the name has more than one address record.
async fn update_record(
    State(updater): State<DdnsUpdater>,
    Path(record_name): Path<String>,
) -> Result<Response, ApiError> {
    info!(record = %record_name, "Update requested");

    let outcome = updater.update(&record_name).await.map_err(|e| {
        error!(record = %record_name, error = %e, "Update failed");
        ApiError(e)
    })?;

    let status = if outcome.is_upserted() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, outcome.summary()).into_response())
}

use axum::{
    extract::{
        rejection::{JsonRejection, StringRejection},
        Path, State,
    },
    Json,
};
use booking_ledger::{infrastructure::logging, types::TransactionName};
use serde_json::{json, Map, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{create_asset_arguments, AppState};
use crate::RestApiError;

const COMMITTED: &str = "Transaction committed successfully";

type JsonResult = Result<Json<Value>, RestApiError>;

fn start_request() {
    let request_id = Uuid::new_v4();
    logging::record_field("request_id", &request_id);
    info!("Handling new request.");
}

/// Wrap a contract payload as `{"result": ...}`. Payloads that are not JSON
/// are returned as a string.
fn result(payload: Vec<u8>) -> Json<Value> {
    let value = match serde_json::from_slice(&payload) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(&payload).into_owned()),
    };
    Json(json!({ "result": value }))
}

fn committed() -> Json<Value> {
    Json(json!({ "result": COMMITTED }))
}

#[instrument(skip_all, err(Debug), fields(request_id))]
pub(super) async fn create_asset(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> JsonResult {
    start_request();
    let Json(body) = body.map_err(|_| RestApiError::InvalidRequestFormat)?;
    let args = create_asset_arguments(&body)?;

    let _ = state
        .ledger
        .submit_transaction(TransactionName::CreateAsset, &args)
        .await
        .map_err(|error| RestApiError::Submit {
            action: "creating asset",
            error,
        })?;

    info!("Request completed.");
    Ok(committed())
}

/// Submit the request body as the invoice document, byte for byte. The body
/// must be a JSON object.
#[instrument(skip_all, err(Debug), fields(request_id))]
pub(super) async fn create_invoice(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> JsonResult {
    start_request();
    let document = body.map_err(|_| RestApiError::InvalidRequestFormat)?;
    let _: Map<String, Value> =
        serde_json::from_str(&document).map_err(|_| RestApiError::InvalidRequestFormat)?;

    let _ = state
        .ledger
        .submit_transaction(TransactionName::CreateInvoice, &[document])
        .await
        .map_err(|error| RestApiError::Submit {
            action: "creating invoice",
            error,
        })?;

    info!("Request completed.");
    Ok(committed())
}

#[instrument(skip_all, err(Debug), fields(request_id))]
pub(super) async fn get_all_assets(State(state): State<AppState>) -> JsonResult {
    start_request();
    let payload = state
        .ledger
        .evaluate_transaction(TransactionName::GetAllAssets, &[])
        .await
        .map_err(|error| RestApiError::Evaluate {
            action: "getting all assets",
            error,
        })?;

    info!("Request completed.");
    Ok(result(payload))
}

#[instrument(skip_all, err(Debug), fields(request_id))]
pub(super) async fn read_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> JsonResult {
    start_request();
    info!("Reading asset {}.", asset_id);
    let payload = state
        .ledger
        .evaluate_transaction(TransactionName::ReadAsset, &[asset_id])
        .await
        .map_err(|error| RestApiError::Evaluate {
            action: "reading asset",
            error,
        })?;

    info!("Request completed.");
    Ok(result(payload))
}

#[instrument(skip_all, err(Debug), fields(request_id))]
pub(super) async fn health(State(state): State<AppState>) -> JsonResult {
    start_request();
    state
        .ledger
        .health()
        .await
        .map_err(RestApiError::Unreachable)?;
    Ok(Json(json!({ "result": "healthy" })))
}

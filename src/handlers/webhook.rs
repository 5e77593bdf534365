use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::AppState;
use crate::error::AppError;
use crate::providers::{Digiflazz, TokoVoucher};
use crate::services::pipeline;

pub async fn digiflazz_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let ack = pipeline::handle_delivery(&state, &Digiflazz, &headers, body).await?;
    Ok((StatusCode::OK, Json(ack.body())))
}

pub async fn tokovoucher_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let ack = pipeline::handle_delivery(&state, &TokoVoucher, &headers, body).await?;
    Ok((StatusCode::OK, Json(ack.body())))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(ref_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .transactions
        .get_by_ref_id(&ref_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("transaction {ref_id} not found")))?;

    Ok(Json(tx))
}

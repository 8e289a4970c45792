//! Transfer handlers

use axum::{extract::State, Json};
use core_kernel::MemberId;
use validator::Validate;

use crate::dto::member::{TransferRequest, TransferResponse};
use crate::{error::ApiError, AppState};

/// Moves money between two members
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    request.validate()?;
    let from = MemberId::parse(request.from)?;
    let to = MemberId::parse(request.to)?;

    let receipt = state.service.account_transfer(&from, &to, request.amount).await?;

    Ok(Json(receipt.into()))
}

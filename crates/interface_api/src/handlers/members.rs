//! Member handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_kernel::{Member, MemberId};
use validator::Validate;

use crate::dto::member::*;
use crate::{error::ApiError, AppState};

/// Creates a member
pub async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    request.validate()?;
    let member = Member::new(request.member_id, request.money)?;

    let saved = state.members.save(&member).await?;

    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Gets a member by id
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let id = MemberId::parse(id)?;

    let member = state.members.find_by_id(&id).await?;

    Ok(Json(member.into()))
}

/// Sets a member's balance
///
/// Responds 404 when no row was updated.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let id = MemberId::parse(id)?;

    if state.members.update(&id, request.money).await? == 0 {
        return Err(ApiError::NotFound(format!("Member not found: {}", id)));
    }

    Ok(Json(Member::with_id(id, request.money).into()))
}

/// Deletes a member
///
/// Responds 404 when no row was deleted.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = MemberId::parse(id)?;

    if state.members.delete(&id).await? == 0 {
        return Err(ApiError::NotFound(format!("Member not found: {}", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

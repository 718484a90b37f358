use axum::{extract::State, Extension, Json};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use crate::entities::ride::{self, RideStatus};
use crate::entities::{booking, user};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileStatsResponse {
    pub success: bool,
    pub active_rides: u64,
    pub total_bookings: u64,
    pub rating: f64,
    pub days_joined: i64,
}

/// Dashboard statistics for the logged-in user
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<ProfileStatsResponse>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let active_rides = ride::Entity::find()
        .filter(ride::Column::UserId.eq(claims.sub))
        .filter(ride::Column::Status.eq(RideStatus::Active))
        .count(&state.db)
        .await?;

    let total_bookings = booking::Entity::find()
        .filter(booking::Column::PassengerId.eq(claims.sub))
        .count(&state.db)
        .await?;

    let days_joined = (Utc::now() - user.member_since.with_timezone(&Utc))
        .num_days()
        .max(1);

    Ok(Json(ProfileStatsResponse {
        success: true,
        active_rides,
        total_bookings,
        rating: user.rating,
        days_joined,
    }))
}

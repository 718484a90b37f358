use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entities::booking::{self, BookingStatus};
use crate::entities::ride;
use crate::error::AppResult;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BookRideRequest {
    pub ride_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct BookRideResponse {
    pub success: bool,
    pub booking_id: i32,
    pub total_amount: Decimal,
}

/// Book units on a ride for the logged-in passenger
pub async fn book_ride(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BookRideRequest>,
) -> AppResult<Json<BookRideResponse>> {
    let confirmation = state
        .booking
        .book_ride(payload.ride_id, claims.sub, payload.quantity)
        .await?;

    Ok(Json(BookRideResponse {
        success: true,
        booking_id: confirmation.booking_id,
        total_amount: confirmation.total_amount,
    }))
}

#[derive(Debug, Serialize)]
pub struct BookingSummary {
    pub id: i32,
    pub ride_id: i32,
    pub source_city: String,
    pub destination_city: String,
    pub departure_time: Option<DateTime<Utc>>,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MyBookingsResponse {
    pub success: bool,
    pub bookings: Vec<BookingSummary>,
}

/// List the logged-in user's bookings with their ride details
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<MyBookingsResponse>> {
    let rows = booking::Entity::find()
        .filter(booking::Column::PassengerId.eq(claims.sub))
        .find_also_related(ride::Entity)
        .order_by_desc(booking::Column::BookedAt)
        .all(&state.db)
        .await?;

    let bookings = rows
        .into_iter()
        .map(|(b, ride)| BookingSummary {
            id: b.id,
            ride_id: b.ride_id,
            source_city: ride
                .as_ref()
                .map(|r| r.source_city.clone())
                .unwrap_or_default(),
            destination_city: ride
                .as_ref()
                .map(|r| r.destination_city.clone())
                .unwrap_or_default(),
            departure_time: ride.map(|r| r.departure_time.with_timezone(&Utc)),
            quantity: b.quantity,
            total_amount: b.total_amount,
            status: b.status,
            booked_at: b.booked_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(MyBookingsResponse {
        success: true,
        bookings,
    }))
}

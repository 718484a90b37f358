use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entities::ride;
use crate::error::{AppError, AppResult};
use crate::services::{NewRide, RideFilter, RideListing};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRidesQuery {
    // `from`/`to`/`date` are the legacy parameter names; both spellings are
    // accepted.
    #[serde(default, alias = "from")]
    pub source: Option<String>,
    #[serde(default, alias = "to")]
    pub destination: Option<String>,
    #[serde(default, alias = "date")]
    pub travel_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchRidesResponse {
    pub success: bool,
    pub rides: Vec<RideListing>,
}

/// Search active rides by source, destination and travel date
pub async fn search_rides(
    State(state): State<AppState>,
    Query(query): Query<SearchRidesQuery>,
) -> AppResult<Json<SearchRidesResponse>> {
    let travel_date = parse_travel_date(query.travel_date.as_deref())?;

    let filter = RideFilter {
        source: query.source,
        destination: query.destination,
        travel_date,
    };

    let rides = state.catalog.list_rides(&filter).await?;
    Ok(Json(SearchRidesResponse {
        success: true,
        rides,
    }))
}

fn parse_travel_date(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| AppError::Validation("travel_date must be YYYY-MM-DD".to_string())),
    }
}

#[derive(Debug, Serialize)]
pub struct RideResponse {
    pub success: bool,
    pub ride: RideListing,
}

/// Get a single ride with its poster's details
pub async fn get_ride(
    State(state): State<AppState>,
    Path(ride_id): Path<i32>,
) -> AppResult<Json<RideResponse>> {
    let ride = state.catalog.get_ride(ride_id).await?;
    Ok(Json(RideResponse {
        success: true,
        ride,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PostRideRequest {
    pub ride_type: String,
    pub source_city: String,
    pub destination_city: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub available_capacity: i32,
    pub price_per_unit: Decimal,
    pub additional_info: Option<String>,
    pub contact_number: String,
    pub preferred_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostRideResponse {
    pub success: bool,
    pub ride_id: i32,
}

/// Post a new ride offering
pub async fn post_ride(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PostRideRequest>,
) -> AppResult<Json<PostRideResponse>> {
    let new_ride = NewRide {
        ride_type: payload.ride_type,
        source_city: payload.source_city,
        destination_city: payload.destination_city,
        departure_time: payload.departure_time,
        arrival_time: payload.arrival_time,
        vehicle_type: payload.vehicle_type,
        vehicle_number: payload.vehicle_number,
        available_capacity: payload.available_capacity,
        price_per_unit: payload.price_per_unit,
        additional_info: payload.additional_info,
        contact_number: payload.contact_number,
        preferred_language: payload.preferred_language,
    };

    let ride_id = state.catalog.create_ride(claims.sub, new_ride).await?;
    Ok(Json(PostRideResponse {
        success: true,
        ride_id,
    }))
}

#[derive(Debug, Serialize)]
pub struct MyRidesResponse {
    pub success: bool,
    pub rides: Vec<ride::Model>,
}

/// List rides posted by the logged-in user, newest departure last
pub async fn my_rides(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<MyRidesResponse>> {
    let rides = ride::Entity::find()
        .filter(ride::Column::UserId.eq(claims.sub))
        .order_by_asc(ride::Column::DepartureTime)
        .all(&state.db)
        .await?;

    Ok(Json(MyRidesResponse {
        success: true,
        rides,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CitySuggestionsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CitySuggestionsResponse {
    pub success: bool,
    pub suggestions: Vec<String>,
}

/// Autocomplete city names via the external place-search collaborator
pub async fn city_suggestions(
    State(state): State<AppState>,
    Query(query): Query<CitySuggestionsQuery>,
) -> AppResult<Json<CitySuggestionsResponse>> {
    let suggestions = state
        .suggestions
        .suggest(query.q.as_deref().unwrap_or_default())
        .await;

    Ok(Json(CitySuggestionsResponse {
        success: true,
        suggestions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_accepts_legacy_parameter_names() {
        let query: SearchRidesQuery =
            serde_json::from_str(r#"{"from": "Pune", "to": "Mumbai", "date": "2024-01-20"}"#)
                .unwrap();

        assert_eq!(query.source.as_deref(), Some("Pune"));
        assert_eq!(query.destination.as_deref(), Some("Mumbai"));
        assert_eq!(query.travel_date.as_deref(), Some("2024-01-20"));
    }

    #[test]
    fn search_query_prefers_canonical_parameter_names() {
        let query: SearchRidesQuery =
            serde_json::from_str(r#"{"source": "Nashik", "destination": "Delhi"}"#).unwrap();

        assert_eq!(query.source.as_deref(), Some("Nashik"));
        assert_eq!(query.destination.as_deref(), Some("Delhi"));
        assert_eq!(query.travel_date, None);
    }

    #[test]
    fn malformed_travel_date_is_a_validation_error() {
        assert!(parse_travel_date(Some("20-01-2024")).is_err());
        assert!(parse_travel_date(Some("")).unwrap().is_none());
        assert_eq!(
            parse_travel_date(Some("2024-01-20")).unwrap(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap())
        );
    }
}

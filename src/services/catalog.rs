use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    SelectTwo, Set,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::ride::{self, RideStatus, RideType};
use crate::entities::user;
use crate::error::{AppError, AppResult};

/// Search constraints for the ride listing. Empty or whitespace-only terms
/// are treated as absent.
#[derive(Debug, Default, Clone)]
pub struct RideFilter {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub travel_date: Option<NaiveDate>,
}

/// A ride denormalized with its poster's public details for display.
#[derive(Debug, Serialize)]
pub struct RideListing {
    pub id: i32,
    pub ride_type: RideType,
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
    pub preferred_language: String,
    pub driver_name: String,
    pub driver_rating: f64,
    pub driver_total_rides: i32,
}

impl RideListing {
    fn from_row(ride: ride::Model, owner: Option<user::Model>) -> Self {
        // Display fallbacks for a missing owner row; never written back.
        let (driver_name, driver_rating, driver_total_rides) = match owner {
            Some(owner) => (owner.name, owner.rating, owner.total_rides),
            None => ("Driver".to_string(), 4.5, 0),
        };

        Self {
            id: ride.id,
            ride_type: ride.ride_type,
            source_city: ride.source_city,
            destination_city: ride.destination_city,
            departure_time: ride.departure_time.with_timezone(&Utc),
            arrival_time: ride.arrival_time.map(|t| t.with_timezone(&Utc)),
            vehicle_type: ride.vehicle_type,
            vehicle_number: ride.vehicle_number,
            available_capacity: ride.available_capacity,
            price_per_unit: ride.price_per_unit,
            additional_info: ride.additional_info,
            contact_number: ride.contact_number,
            preferred_language: ride.preferred_language,
            driver_name,
            driver_rating,
            driver_total_rides,
        }
    }
}

/// Fields accepted when posting a new ride. `ride_type` arrives as free text
/// and is validated into the closed enum before anything touches the store.
#[derive(Debug)]
pub struct NewRide {
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

/// Read-mostly access to the ride listing plus ride creation. Reads carry no
/// side effects and are safe under arbitrary concurrency; capacity is never
/// mutated here.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List active rides matching the filter, ordered by departure time with
    /// ties broken by insertion order.
    pub async fn list_rides(&self, filter: &RideFilter) -> AppResult<Vec<RideListing>> {
        let rows = Self::search_select(filter).all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|(ride, owner)| RideListing::from_row(ride, owner))
            .collect())
    }

    pub async fn get_ride(&self, id: i32) -> AppResult<RideListing> {
        let (ride, owner) = ride::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Ride not found".to_string()))?;

        Ok(RideListing::from_row(ride, owner))
    }

    pub async fn create_ride(&self, owner_id: Uuid, new: NewRide) -> AppResult<i32> {
        let ride_type = validate(&new)?;

        let inserted = ride::ActiveModel {
            user_id: Set(owner_id),
            ride_type: Set(ride_type),
            source_city: Set(new.source_city.trim().to_string()),
            destination_city: Set(new.destination_city.trim().to_string()),
            departure_time: Set(new.departure_time.fixed_offset()),
            arrival_time: Set(new.arrival_time.map(|t| t.fixed_offset())),
            vehicle_type: Set(new.vehicle_type.trim().to_string()),
            vehicle_number: Set(new.vehicle_number.trim().to_string()),
            available_capacity: Set(new.available_capacity),
            price_per_unit: Set(new.price_per_unit),
            additional_info: Set(new.additional_info),
            contact_number: Set(new.contact_number.trim().to_string()),
            preferred_language: Set(new
                .preferred_language
                .unwrap_or_else(|| "hindi".to_string())),
            status: Set(RideStatus::Active),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(ride_id = inserted.id, %owner_id, "Ride posted");
        Ok(inserted.id)
    }

    fn search_select(filter: &RideFilter) -> SelectTwo<ride::Entity, user::Entity> {
        let mut query = ride::Entity::find()
            .find_also_related(user::Entity)
            .filter(ride::Column::Status.eq(RideStatus::Active));

        if let Some(term) = normalized(filter.source.as_deref()) {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    ride::Entity,
                    ride::Column::SourceCity,
                ))))
                .like(format!("%{term}%")),
            );
        }

        if let Some(term) = normalized(filter.destination.as_deref()) {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    ride::Entity,
                    ride::Column::DestinationCity,
                ))))
                .like(format!("%{term}%")),
            );
        }

        if let Some(date) = filter.travel_date {
            let day_start = date.and_time(NaiveTime::MIN).and_utc();
            let day_end = day_start + Duration::days(1);
            query = query
                .filter(ride::Column::DepartureTime.gte(day_start))
                .filter(ride::Column::DepartureTime.lt(day_end));
        }

        query
            .order_by_asc(ride::Column::DepartureTime)
            .order_by_asc(ride::Column::Id)
    }
}

fn normalized(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn validate(new: &NewRide) -> AppResult<RideType> {
    let ride_type = new
        .ride_type
        .trim()
        .to_lowercase()
        .parse::<RideType>()
        .map_err(|_| AppError::Validation(format!("Unknown ride type '{}'", new.ride_type)))?;

    let required = [
        ("source_city", &new.source_city),
        ("destination_city", &new.destination_city),
        ("vehicle_type", &new.vehicle_type),
        ("vehicle_number", &new.vehicle_number),
        ("contact_number", &new.contact_number),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    if new.available_capacity < 1 {
        return Err(AppError::Validation(
            "available_capacity must be a positive integer".to_string(),
        ));
    }

    if new.price_per_unit < Decimal::ZERO {
        return Err(AppError::Validation(
            "price_per_unit must not be negative".to_string(),
        ));
    }

    Ok(ride_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    fn new_ride() -> NewRide {
        NewRide {
            ride_type: "car".to_string(),
            source_city: "Pune".to_string(),
            destination_city: "Mumbai".to_string(),
            departure_time: Utc::now(),
            arrival_time: None,
            vehicle_type: "SUV".to_string(),
            vehicle_number: "MH14EF9012".to_string(),
            available_capacity: 4,
            price_per_unit: "500.00".parse().unwrap(),
            additional_info: None,
            contact_number: "9876543214".to_string(),
            preferred_language: None,
        }
    }

    #[test]
    fn source_filter_matches_substring_case_insensitively() {
        let filter = RideFilter {
            source: Some("PUN".to_string()),
            ..Default::default()
        };

        let sql = Catalog::search_select(&filter)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("ride"."source_city") LIKE '%pun%'"#), "{sql}");
    }

    #[test]
    fn blank_filters_add_no_constraints() {
        let filter = RideFilter {
            source: Some("   ".to_string()),
            destination: Some(String::new()),
            travel_date: None,
        };

        let sql = Catalog::search_select(&filter)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(!sql.contains("LIKE"), "{sql}");
    }

    #[test]
    fn date_filter_covers_the_whole_calendar_day() {
        let filter = RideFilter {
            travel_date: Some(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()),
            ..Default::default()
        };

        let sql = Catalog::search_select(&filter)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("2024-01-20 00:00:00"), "{sql}");
        assert!(sql.contains("2024-01-21 00:00:00"), "{sql}");
    }

    #[test]
    fn listing_orders_by_departure_then_insertion() {
        let sql = Catalog::search_select(&RideFilter::default())
            .build(DatabaseBackend::Postgres)
            .to_string();

        let order = sql.find(r#"ORDER BY "ride"."departure_time" ASC, "ride"."id" ASC"#);
        assert!(order.is_some(), "{sql}");
    }

    #[test]
    fn only_active_rides_are_listed() {
        let sql = Catalog::search_select(&RideFilter::default())
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("'active'"), "{sql}");
    }

    #[tokio::test]
    async fn unknown_ride_type_is_rejected_before_the_store() {
        let catalog = Catalog::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let mut ride = new_ride();
        ride.ride_type = "rickshaw".to_string();

        let err = catalog.create_ride(Uuid::new_v4(), ride).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn non_positive_capacity_is_rejected() {
        let catalog = Catalog::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let mut ride = new_ride();
        ride.available_capacity = 0;

        let err = catalog.create_ride(Uuid::new_v4(), ride).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected() {
        let catalog = Catalog::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let mut ride = new_ride();
        ride.vehicle_number = "  ".to_string();

        let err = catalog.create_ride(Uuid::new_v4(), ride).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

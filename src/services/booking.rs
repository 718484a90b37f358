use std::time::Duration;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel,
    QuerySelect, Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::ride::{self, RideStatus};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub booking_id: i32,
    pub total_amount: Decimal,
}

/// Books units against a ride's remaining capacity.
///
/// All capacity mutation in the system happens here, inside a transaction
/// that holds an exclusive lock on the ride row. Two bookings racing for the
/// same ride serialize on that lock; bookings against different rides never
/// block each other.
#[derive(Clone)]
pub struct BookingEngine {
    db: DatabaseConnection,
    timeout: Duration,
}

impl BookingEngine {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    /// Book `quantity` units on a ride for a passenger.
    ///
    /// The capacity check, booking insert and capacity decrement are a single
    /// atomic unit: either all of them commit or none do. A caller-side
    /// timeout while waiting on the store leaves the outcome ambiguous, which
    /// is reported distinctly so the caller re-reads state instead of
    /// retrying the mutation blindly.
    pub async fn book_ride(
        &self,
        ride_id: i32,
        passenger_id: Uuid,
        quantity: i32,
    ) -> AppResult<BookingConfirmation> {
        if quantity < 1 {
            return Err(AppError::Validation(
                "quantity must be a positive integer".to_string(),
            ));
        }

        let attempt = self.book_in_transaction(ride_id, passenger_id, quantity);
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(ride_id, %passenger_id, "Booking timed out before an outcome was observed");
                Err(AppError::Unknown(
                    "The booking did not complete in time; check your bookings before retrying"
                        .to_string(),
                ))
            }
        }
    }

    async fn book_in_transaction(
        &self,
        ride_id: i32,
        passenger_id: Uuid,
        quantity: i32,
    ) -> AppResult<BookingConfirmation> {
        let result = self
            .db
            .transaction::<_, BookingConfirmation, AppError>(move |txn| {
                Box::pin(async move { book_locked(txn, ride_id, passenger_id, quantity).await })
            })
            .await;

        match result {
            Ok(confirmation) => {
                tracing::info!(
                    ride_id,
                    booking_id = confirmation.booking_id,
                    %passenger_id,
                    "Booking confirmed"
                );
                Ok(confirmation)
            }
            Err(TransactionError::Connection(err)) => Err(AppError::Store(err)),
            Err(TransactionError::Transaction(err)) => Err(err),
        }
    }
}

async fn book_locked(
    txn: &DatabaseTransaction,
    ride_id: i32,
    passenger_id: Uuid,
    quantity: i32,
) -> AppResult<BookingConfirmation> {
    // SELECT ... FOR UPDATE: concurrent bookings of the same ride queue here
    // until this transaction commits or rolls back.
    let ride = ride::Entity::find_by_id(ride_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Ride not found".to_string()))?;

    if ride.status != RideStatus::Active {
        return Err(AppError::Validation(
            "This ride is no longer accepting bookings".to_string(),
        ));
    }

    if ride.available_capacity < quantity {
        return Err(AppError::InsufficientCapacity {
            available: ride.available_capacity,
        });
    }

    // Price snapshot: the total is fixed from the locked row and never
    // recomputed, even if the ride's price changes later.
    let total_amount = ride.price_per_unit * Decimal::from(quantity);

    let confirmed = booking::ActiveModel {
        ride_id: Set(ride.id),
        passenger_id: Set(passenger_id),
        quantity: Set(quantity),
        total_amount: Set(total_amount),
        status: Set(BookingStatus::Confirmed),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let remaining = ride.available_capacity - quantity;
    let mut decrement = ride.into_active_model();
    decrement.available_capacity = Set(remaining);
    decrement.update(txn).await?;

    Ok(BookingConfirmation {
        booking_id: confirmed.id,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::entities::ride::RideType;

    fn ride_fixture(capacity: i32, price: &str) -> ride::Model {
        ride::Model {
            id: 1,
            user_id: Uuid::new_v4(),
            ride_type: RideType::Car,
            source_city: "Nashik".to_string(),
            destination_city: "Delhi".to_string(),
            departure_time: Utc::now().fixed_offset(),
            arrival_time: None,
            vehicle_type: "SUV".to_string(),
            vehicle_number: "MH15AB1234".to_string(),
            available_capacity: capacity,
            price_per_unit: price.parse().unwrap(),
            additional_info: None,
            contact_number: "9876543210".to_string(),
            preferred_language: "hindi".to_string(),
            status: RideStatus::Active,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn booking_fixture(ride: &ride::Model, quantity: i32, total_amount: Decimal) -> booking::Model {
        booking::Model {
            id: 7,
            ride_id: ride.id,
            passenger_id: Uuid::new_v4(),
            quantity,
            total_amount,
            status: BookingStatus::Confirmed,
            booked_at: Utc::now().fixed_offset(),
        }
    }

    fn engine(db: DatabaseConnection) -> BookingEngine {
        BookingEngine::new(db, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn booking_snapshots_price_and_decrements_capacity() {
        let ride = ride_fixture(4, "500.00");
        let total: Decimal = "1500.00".parse().unwrap();
        let confirmed = booking_fixture(&ride, 3, total);
        let mut decremented = ride.clone();
        decremented.available_capacity = 1;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ride]])
            .append_query_results([vec![confirmed]])
            .append_query_results([vec![decremented]])
            .into_connection();

        let outcome = engine(db).book_ride(1, Uuid::new_v4(), 3).await.unwrap();

        assert_eq!(outcome.booking_id, 7);
        assert_eq!(outcome.total_amount, total);
    }

    #[tokio::test]
    async fn booking_more_than_capacity_is_rejected_without_mutation() {
        // Only the locked read is stubbed; if the engine attempted the insert
        // or the decrement the mock would fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ride_fixture(1, "500.00")]])
            .into_connection();

        let err = engine(db).book_ride(1, Uuid::new_v4(), 2).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::InsufficientCapacity { available: 1 }
        ));
    }

    #[tokio::test]
    async fn booking_unknown_ride_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<ride::Model>::new()])
            .into_connection();

        let err = engine(db).book_ride(99, Uuid::new_v4(), 1).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn booking_closed_ride_is_rejected() {
        let mut ride = ride_fixture(4, "500.00");
        ride.status = RideStatus::Closed;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ride]])
            .into_connection();

        let err = engine(db).book_ride(1, Uuid::new_v4(), 1).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn zero_quantity_fails_before_touching_the_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = engine(db).book_ride(1, Uuid::new_v4(), 0).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn locked_read_is_exclusive() {
        let ride = ride_fixture(4, "500.00");
        let total: Decimal = "500.00".parse().unwrap();
        let confirmed = booking_fixture(&ride, 1, total);
        let mut decremented = ride.clone();
        decremented.available_capacity = 3;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ride]])
            .append_query_results([vec![confirmed]])
            .append_query_results([vec![decremented]])
            .into_connection();

        engine(db.clone()).book_ride(1, Uuid::new_v4(), 1).await.unwrap();

        let log = db.into_transaction_log();
        let statements: Vec<String> = log.iter().map(|t| format!("{:?}", t)).collect();
        assert!(
            statements.iter().any(|s| s.contains("FOR UPDATE")),
            "ride row must be read under an exclusive lock: {statements:?}"
        );
    }
}

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::entities::sos_alert::{self, AlertStatus};
use crate::error::AppResult;

/// Append-only record of emergency alerts. There is no update path; alerts
/// only ever get inserted.
#[derive(Clone)]
pub struct Alerts {
    db: DatabaseConnection,
}

impl Alerts {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn raise_alert(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> AppResult<i32> {
        let alert = sos_alert::ActiveModel {
            user_id: Set(user_id),
            latitude: Set(latitude),
            longitude: Set(longitude),
            address: Set(address),
            status: Set(AlertStatus::Active),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::warn!(alert_id = alert.id, %user_id, latitude, longitude, "SOS alert raised");
        Ok(alert.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn raising_an_alert_returns_its_id() {
        let user_id = Uuid::new_v4();
        let stored = sos_alert::Model {
            id: 42,
            user_id,
            latitude: 18.5204,
            longitude: 73.8567,
            address: Some("FC Road, Pune".to_string()),
            status: AlertStatus::Active,
            created_at: Utc::now().fixed_offset(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .into_connection();

        let alert_id = Alerts::new(db)
            .raise_alert(user_id, 18.5204, 73.8567, Some("FC Road, Pune".to_string()))
            .await
            .unwrap();

        assert_eq!(alert_id, 42);
    }
}

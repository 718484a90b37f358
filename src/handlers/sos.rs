use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RaiseAlertRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RaiseAlertResponse {
    pub success: bool,
    pub alert_id: i32,
}

/// Record an emergency alert for the logged-in user
pub async fn raise_alert(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RaiseAlertRequest>,
) -> AppResult<Json<RaiseAlertResponse>> {
    let alert_id = state
        .alerts
        .raise_alert(
            claims.sub,
            payload.latitude,
            payload.longitude,
            payload.address,
        )
        .await?;

    Ok(Json(RaiseAlertResponse {
        success: true,
        alert_id,
    }))
}

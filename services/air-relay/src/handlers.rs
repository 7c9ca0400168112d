use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde_json::Value;

use crate::SharedState;
use crate::error::ApiError;
use crate::types::{DevicesResp, HealthResp, LatestQuery, Reading, StatusResp, SubmitResp};

fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

pub async fn root() -> Json<StatusResp> {
    Json(StatusResp { status: "ok" })
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResp> {
    Json(HealthResp {
        status: "healthy",
        devices: state.registry.len().await,
    })
}

pub async fn submit_reading(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResp>, ApiError> {
    let request_id = request_id(&headers);

    let Json(body) = payload.map_err(|rejection| {
        let err = ApiError::from(rejection);
        tracing::warn!(%request_id, error = %err, "reading rejected");
        err
    })?;
    let reading = Reading::from_json(&body).map_err(|errors| {
        let err = ApiError::Validation(errors);
        let device_id = body.get("device_id").and_then(Value::as_str).unwrap_or("-");
        tracing::warn!(%request_id, %device_id, error = %err, "reading rejected");
        err
    })?;

    tracing::info!(
        %request_id,
        device_id = %reading.device_id,
        temperature = reading.temperature,
        humidity = reading.humidity,
        pm25 = reading.pm25,
        pm10 = reading.pm10,
        mq135_raw = reading.mq135_raw,
        mq135_ppm = reading.mq135_ppm,
        "reading received"
    );
    let ack = state.registry.submit(reading).await;
    tracing::debug!(%request_id, device_id = %ack.device_id, replaced = ack.replaced, "registry updated");

    Ok(Json(SubmitResp {
        status: "ok",
        device_id: ack.device_id,
    }))
}

pub async fn latest(
    State(state): State<SharedState>,
    query: Option<Query<LatestQuery>>,
) -> Json<HashMap<String, Reading>> {
    // An unreadable query string is treated as no filter at all.
    let filter = query.and_then(|Query(q)| q.device_id);
    match filter {
        Some(device_id) => {
            let mut only = HashMap::new();
            if let Some(reading) = state.registry.get(&device_id).await {
                only.insert(device_id, reading);
            }
            Json(only)
        }
        None => Json(state.registry.latest().await),
    }
}

pub async fn devices(State(state): State<SharedState>) -> Json<DevicesResp> {
    Json(DevicesResp {
        devices: state.registry.devices().await,
    })
}

pub async fn device(
    State(state): State<SharedState>,
    Path(device_id): Path<String>,
) -> Result<Json<Reading>, ApiError> {
    state
        .registry
        .get(&device_id)
        .await
        .map(Json)
        .ok_or(ApiError::DeviceNotFound(device_id))
}

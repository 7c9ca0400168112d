//! Posts synthetic sensor readings to a running air-relay, the way an ESP32
//! node would. Run with `--continuous` to keep posting until interrupted.

use std::time::Duration;

use air_relay::types::Reading;
use anyhow::{Context, Result};
use rand::Rng;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn read_env(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Value ranges for generated readings.
#[derive(Debug, Clone, Copy)]
struct Profile {
    temperature: (f64, f64),
    humidity: (f64, f64),
    pm25: (f64, f64),
    pm10: (f64, f64),
    mq135_raw: (u32, u32),
    mq135_ppm: (f64, f64),
}

// Wide spread for a one-off connectivity check.
const SAMPLE: Profile = Profile {
    temperature: (18.0, 32.0),
    humidity: (40.0, 80.0),
    pm25: (15.0, 75.0),
    pm10: (25.0, 120.0),
    mq135_raw: (200, 600),
    mq135_ppm: (0.5, 3.0),
};

// Narrower, indoor-looking values for a long-running stream.
const STREAM: Profile = Profile {
    temperature: (20.0, 28.0),
    humidity: (45.0, 75.0),
    pm25: (20.0, 60.0),
    pm10: (30.0, 100.0),
    mq135_raw: (250, 550),
    mq135_ppm: (0.8, 2.5),
};

fn synthetic_reading(device_id: &str, profile: &Profile) -> Reading {
    let mut rng = rand::thread_rng();
    let mut pick = |(lo, hi): (f64, f64), places| round_to(rng.gen_range(lo..=hi), places);
    let temperature = pick(profile.temperature, 1);
    let humidity = pick(profile.humidity, 1);
    let pm25 = pick(profile.pm25, 1);
    let pm10 = pick(profile.pm10, 1);
    let mq135_ppm = pick(profile.mq135_ppm, 2);
    let (raw_lo, raw_hi) = profile.mq135_raw;
    let mq135_raw = f64::from(rng.gen_range(raw_lo..=raw_hi));
    Reading {
        device_id: device_id.to_string(),
        temperature,
        humidity,
        pm25,
        pm10,
        mq135_raw,
        mq135_ppm,
    }
}

async fn post_reading(client: &Client, base_url: &str, reading: &Reading) -> Result<Value> {
    let resp = client
        .post(format!("{base_url}/esp32/readings"))
        .json(reading)
        .send()
        .await
        .with_context(|| format!("could not reach {base_url}"))?;
    let status = resp.status();
    let body: Value = resp.json().await.context("decode submit response")?;
    if !status.is_success() {
        anyhow::bail!("submit rejected with {status}: {body}");
    }
    Ok(body)
}

async fn get_json(request: RequestBuilder, what: &str) -> Result<Value> {
    let body = request
        .send()
        .await
        .with_context(|| format!("GET {what}"))?
        .error_for_status()?
        .json()
        .await
        .with_context(|| format!("decode {what}"))?;
    Ok(body)
}

async fn single_shot(client: &Client, base_url: &str, device_id: &str) -> Result<()> {
    let reading = synthetic_reading(device_id, &SAMPLE);
    tracing::info!(reading = %serde_json::to_string(&reading)?, "sending sample reading");
    let ack = post_reading(client, base_url, &reading).await?;
    tracing::info!(%ack, "reading accepted");

    let latest = get_json(
        client
            .get(format!("{base_url}/esp32/latest"))
            .query(&[("device_id", device_id)]),
        "/esp32/latest",
    )
    .await?;
    tracing::info!(%latest, "latest reading");

    let devices = get_json(
        client.get(format!("{base_url}/esp32/devices")),
        "/esp32/devices",
    )
    .await?;
    tracing::info!(%devices, "known devices");
    Ok(())
}

async fn continuous(client: &Client, base_url: &str, device_id: &str, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let reading = synthetic_reading(device_id, &STREAM);
                match post_reading(client, base_url, &reading).await {
                    Ok(_) => tracing::info!(
                        pm25 = reading.pm25,
                        mq135_raw = reading.mq135_raw,
                        temperature = reading.temperature,
                        "reading sent"
                    ),
                    Err(e) => tracing::error!("send failed: {e:#}"),
                }
            }
            _ = &mut shutdown => {
                tracing::info!("stopping data stream");
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = read_env("AIR_RELAY_URL", "http://localhost:5008")
        .trim_end_matches('/')
        .to_string();
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

    if std::env::args().any(|a| a == "--continuous") {
        let device_id = read_env("AIR_RELAY_SIM_DEVICE", "esp32_001");
        let secs: u64 = read_env("AIR_RELAY_SIM_INTERVAL_SECS", "30")
            .parse()
            .unwrap_or(30);
        tracing::info!(%base_url, %device_id, secs, "starting continuous simulation");
        continuous(&client, &base_url, &device_id, Duration::from_secs(secs.max(1))).await;
        Ok(())
    } else {
        let device_id = read_env("AIR_RELAY_SIM_DEVICE", "esp32_test_001");
        single_shot(&client, &base_url, &device_id).await
    }
}

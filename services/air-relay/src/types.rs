use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FieldError;

const MEASUREMENTS: [&str; 6] = [
    "temperature",
    "humidity",
    "pm25",
    "pm10",
    "mq135_raw",
    "mq135_ppm",
];

/// One sample posted by a sensor node. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub device_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pm25: f64,
    pub pm10: f64,
    pub mq135_raw: f64,
    pub mq135_ppm: f64,
}

impl Reading {
    /// Builds a reading from a decoded request body, reporting every missing
    /// or mistyped field rather than stopping at the first one.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = body.as_object() else {
            return Err(vec![FieldError::new("body", "expected a JSON object")]);
        };

        let mut errors = Vec::new();
        let device_id = match object.get("device_id") {
            Some(Value::String(id)) if id.is_empty() => {
                errors.push(FieldError::new("device_id", "device_id must not be empty"));
                None
            }
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => {
                errors.push(FieldError::new("device_id", "expected a string"));
                None
            }
            None => {
                errors.push(FieldError::missing("device_id"));
                None
            }
        };

        let mut values = [0.0; 6];
        for (slot, field) in values.iter_mut().zip(MEASUREMENTS) {
            match object.get(field) {
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(v) => *slot = v,
                    None => errors.push(FieldError::new(field, "number out of range")),
                },
                Some(_) => errors.push(FieldError::new(field, "expected a number")),
                None => errors.push(FieldError::missing(field)),
            }
        }

        let Some(device_id) = device_id.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };
        let [temperature, humidity, pm25, pm10, mq135_raw, mq135_ppm] = values;
        let reading = Reading {
            device_id,
            temperature,
            humidity,
            pm25,
            pm10,
            mq135_raw,
            mq135_ppm,
        };
        reading.validate()?;
        Ok(reading)
    }

    fn measurements(&self) -> [(&'static str, f64); 6] {
        [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("pm25", self.pm25),
            ("pm10", self.pm10),
            ("mq135_raw", self.mq135_raw),
            ("mq135_ppm", self.mq135_ppm),
        ]
    }

    /// Checks what the type system cannot: a non-empty device id and finite values.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.device_id.is_empty() {
            errors.push(FieldError::new("device_id", "device_id must not be empty"));
        }
        for (field, value) in self.measurements() {
            if !value.is_finite() {
                errors.push(FieldError::new(field, "value must be a finite number"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// Query string for GET /esp32/latest
#[derive(Debug, Default, Deserialize)]
pub struct LatestQuery {
    pub device_id: Option<String>,
}

// Response body for POST /esp32/readings
#[derive(Debug, Serialize)]
pub struct SubmitResp {
    pub status: &'static str,
    pub device_id: String,
}

#[derive(Debug, Serialize)]
pub struct DevicesResp {
    pub devices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub devices: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResp {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Fields(Vec<FieldError>),
    Message(String),
}

// Body of every 4xx response
#[derive(Debug, Serialize)]
pub struct ErrorResp {
    pub detail: ErrorDetail,
}

//! The weather forecast record exposed over HTTP.

use serde::{Deserialize, Serialize};
use tabula_core::{ColumnSpec, Entity, FieldKind, FieldValue, ShapeError, StringField, ValueCursor};

/// A persisted weather forecast.
///
/// The identity is storage-assigned; a forecast with `id == None` has not
/// been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub id: Option<i64>,
    /// Forecast date, Unix milliseconds.
    pub date_ms: i64,
    pub temperature_c: i64,
    pub summary: Option<String>,
}

impl WeatherForecast {
    /// Temperature in Fahrenheit, truncated toward zero.
    pub fn temperature_f(&self) -> i64 {
        32 + (self.temperature_c as f64 / 0.5556) as i64
    }
}

fn forecast_summary(f: &WeatherForecast) -> Option<&str> {
    f.summary.as_deref()
}

fn set_forecast_summary(f: &mut WeatherForecast, v: String) {
    f.summary = Some(v);
}

impl Entity for WeatherForecast {
    type Key = i64;

    fn table() -> &'static str {
        "weather_forecast"
    }

    fn columns() -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::auto_identity("id"),
            ColumnSpec::new("date_ms", FieldKind::Integer),
            ColumnSpec::new("temperature_c", FieldKind::Integer),
            ColumnSpec::new("summary", FieldKind::Text),
        ];
        COLUMNS
    }

    fn string_fields() -> &'static [StringField<Self>] {
        const FIELDS: &[StringField<WeatherForecast>] = &[StringField {
            name: "summary",
            get: forecast_summary,
            set: set_forecast_summary,
            exempt: false,
        }];
        FIELDS
    }

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.id.into(),
            self.date_ms.into(),
            self.temperature_c.into(),
            self.summary.clone().into(),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self, ShapeError> {
        let mut cursor = ValueCursor::new(values);
        Ok(Self {
            id: cursor.integer_opt()?,
            date_ms: cursor.integer()?,
            temperature_c: cursor.integer()?,
            summary: cursor.text_opt()?,
        })
    }
}

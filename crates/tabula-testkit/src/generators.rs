//! Proptest generators for property-based testing.

use proptest::prelude::*;

use crate::fixtures::Reading;

/// Generate a short lowercase word.
pub fn word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}".prop_map(String::from)
}

/// Generate a word with random surrounding whitespace.
pub fn padded_string() -> impl Strategy<Value = String> {
    (" {0,3}".prop_map(String::from), word(), " {0,3}".prop_map(String::from))
        .prop_map(|(lead, core, trail)| format!("{lead}{core}{trail}"))
}

/// Generate a reasonable Unix-ms timestamp.
pub fn timestamp_ms() -> impl Strategy<Value = i64> {
    0i64..=1_700_000_000_000i64
}

/// Generate a plausible Celsius temperature.
pub fn temperature() -> impl Strategy<Value = i64> {
    -40i64..=50i64
}

/// Generate an unpersisted reading.
pub fn unsaved_reading() -> impl Strategy<Value = Reading> {
    (timestamp_ms(), temperature(), proptest::option::of(padded_string()))
        .prop_map(|(recorded_at_ms, temperature_c, summary)| Reading {
            id: None,
            recorded_at_ms,
            temperature_c,
            summary,
            station_tag: None,
        })
}

/// Generate a batch of unpersisted readings.
pub fn unsaved_readings(max: usize) -> impl Strategy<Value = Vec<Reading>> {
    prop::collection::vec(unsaved_reading(), 0..=max)
}

/// Generate pagination inputs, including the absent and below-1 cases the
/// repository must clamp or ignore.
pub fn page_params() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
    (
        proptest::option::of(-2i64..=6),
        proptest::option::of(-2i64..=6),
    )
}

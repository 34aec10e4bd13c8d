use chrono::{DateTime, Utc};

/// A single daily observation returned by a market data provider
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Timestamp of the bar (start of the trading day)
    pub time: DateTime<Utc>,

    /// Closing price
    pub close: f64,

    /// Trading volume, 0 when the provider reports none
    pub volume: f64,
}

impl Observation {
    /// Create a new observation, normalising a missing/NaN volume to zero
    pub fn new(time: DateTime<Utc>, close: f64, volume: Option<f64>) -> Self {
        let volume = match volume {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        };
        Self { time, close, volume }
    }

    /// Milliseconds since the Unix epoch, the key used in snapshot series
    pub fn timestamp_ms(&self) -> i64 {
        self.time.timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_normalisation() {
        let time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(Observation::new(time, 1.0, None).volume, 0.0);
        assert_eq!(Observation::new(time, 1.0, Some(f64::NAN)).volume, 0.0);
        assert_eq!(Observation::new(time, 1.0, Some(42.5)).volume, 42.5);
    }

    #[test]
    fn test_timestamp_ms() {
        let time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let obs = Observation::new(time, 1.0, Some(1.0));
        assert_eq!(obs.timestamp_ms(), 1_700_000_000_000);
    }
}

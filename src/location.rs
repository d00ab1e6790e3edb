//! Sources of the coordinates an interaction compares.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::error::LocationError;

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, LocationError> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);
        if !valid {
            return Err(LocationError::InvalidCoordinates {
                longitude,
                latitude,
            });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// Asynchronously yields the user's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// A position known up front, e.g. passed on the command line.
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

pub const LONGITUDE_VAR: &str = "RADAR_LONGITUDE";
pub const LATITUDE_VAR: &str = "RADAR_LATITUDE";

/// Reads the position from `RADAR_LONGITUDE` / `RADAR_LATITUDE` each time it
/// is asked.
pub struct EnvLocation;

impl EnvLocation {
    pub fn from_lookup<F>(lookup: F) -> Result<Coordinates, LocationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let longitude = read_var(&lookup, LONGITUDE_VAR)?;
        let latitude = read_var(&lookup, LATITUDE_VAR)?;
        Coordinates::new(longitude, latitude)
    }
}

fn read_var<F>(lookup: &F, var: &str) -> Result<f64, LocationError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var).ok_or_else(|| LocationError::Unavailable(format!("{var} is not set")))?;
    raw.trim()
        .parse()
        .map_err(|_| LocationError::Unavailable(format!("{var} is not a number: '{raw}'")))
}

#[async_trait]
impl LocationProvider for EnvLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Coordinates::new(-122.6, 45.5).is_ok());
        assert!(Coordinates::new(-181.0, 45.5).is_err());
        assert!(Coordinates::new(0.0, 90.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_display() {
        let c = Coordinates::new(-122.5, 45.25).unwrap();
        assert_eq!(c.to_string(), "-122.5,45.25");
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_position() {
        let c = EnvLocation::from_lookup(lookup(&[
            (LONGITUDE_VAR, "-122.5"),
            (LATITUDE_VAR, " 45.25 "),
        ]))
        .unwrap();
        assert_eq!(c, Coordinates::new(-122.5, 45.25).unwrap());
    }

    #[test]
    fn test_env_position_unset() {
        let err = EnvLocation::from_lookup(lookup(&[(LATITUDE_VAR, "45.25")])).unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
        assert_eq!(err.to_string(), "location unavailable: RADAR_LONGITUDE is not set");
    }

    #[test]
    fn test_env_position_not_a_number() {
        let err = EnvLocation::from_lookup(lookup(&[
            (LONGITUDE_VAR, "-122.5"),
            (LATITUDE_VAR, "north"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "location unavailable: RADAR_LATITUDE is not a number: 'north'"
        );
    }

    #[test]
    fn test_env_position_out_of_range() {
        let err = EnvLocation::from_lookup(lookup(&[
            (LONGITUDE_VAR, "200"),
            (LATITUDE_VAR, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LocationError::InvalidCoordinates { .. }));
    }

    #[tokio::test]
    async fn test_fixed_location() {
        let c = Coordinates::new(1.0, 2.0).unwrap();
        assert_eq!(FixedLocation(c).current_position().await.unwrap(), c);
    }
}

//! Forward geocoding: free-text address to candidate coordinates.

pub mod nominatim;
pub mod search;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::geo::LatLng;
use crate::Result;

pub use nominatim::NominatimClient;
pub use search::{AddressSearch, SearchOutcome, SearchState};

/// Anything that can turn an address into candidate places.
///
/// Implementations report failures as errors; [`AddressSearch`] decides what
/// the user sees.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>>;
}

/// One geocoding candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,
    pub display_name: String,
}

impl Place {
    pub fn new(lat: f64, lon: f64, display_name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            display_name: display_name.into(),
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

/// Nominatim sends coordinates as strings; other services send numbers.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("bad coordinate {:?}: {}", text, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_from_nominatim_strings() {
        let json = r#"{"place_id":1,"lat":"52.5170365","lon":"13.3888599","display_name":"Berlin, Deutschland"}"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert_eq!(place.lat, 52.5170365);
        assert_eq!(place.lon, 13.3888599);
        assert_eq!(place.display_name, "Berlin, Deutschland");
    }

    #[test]
    fn test_place_from_numbers() {
        let json = r#"{"lat":48.8566,"lon":2.3522,"display_name":"Paris"}"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert_eq!(place.position(), LatLng::new(48.8566, 2.3522));
    }

    #[test]
    fn test_place_rejects_non_numeric() {
        let json = r#"{"lat":"north","lon":"2.0","display_name":"Nowhere"}"#;
        assert!(serde_json::from_str::<Place>(json).is_err());
    }

    #[test]
    fn test_place_requires_display_name() {
        let json = r#"{"lat":"1.0","lon":"2.0"}"#;
        assert!(serde_json::from_str::<Place>(json).is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(YesNo::Yes),
            "No" => Ok(YesNo::No),
            other => Err(UnknownChoice(other.to_string())),
        }
    }
}

/// How the pub treats the football on the telly.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Commentary {
    #[serde(rename = "They get it")]
    TheyGetIt,
    #[default]
    Occasional,
    #[serde(rename = "Muted with Shit music on")]
    Muted,
}

impl Commentary {
    pub const ALL: [Commentary; 3] = [
        Commentary::TheyGetIt,
        Commentary::Occasional,
        Commentary::Muted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Commentary::TheyGetIt => "They get it",
            Commentary::Occasional => "Occasional",
            Commentary::Muted => "Muted with Shit music on",
        }
    }
}

impl fmt::Display for Commentary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commentary {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Commentary::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown choice '{0}'")]
pub struct UnknownChoice(pub String);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Amenities {
    pub pool_table: YesNo,
    pub darts: YesNo,
    pub commentary: Commentary,
    pub fosters_carling: YesNo,
    pub pint_price: f64,
    pub lock_ins: YesNo,
}

/// What is known about a stored pub beyond its name and position.
///
/// Rows written before the amenity columns existed only ever carried a star
/// rating; they are still loaded and shown but never written again.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum PubDetails {
    Amenities(Amenities),
    Legacy { rating: Option<f64> },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pub {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub details: PubDetails,
}

impl Pub {
    /// One-line summary used for map popups and the raw table.
    pub fn summary(&self) -> String {
        match &self.details {
            PubDetails::Amenities(a) => format!(
                "{} - £{:.2} a pint, pool: {}, darts: {}, Fosters/Carling: {}, lock-ins: {}, commentary: {}",
                self.name,
                a.pint_price,
                a.pool_table,
                a.darts,
                a.fosters_carling,
                a.lock_ins,
                a.commentary
            ),
            PubDetails::Legacy { rating: Some(rating) } => {
                format!("{} - Rating: {}", self.name, rating)
            }
            PubDetails::Legacy { rating: None } => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PubValidationError {
    #[error("pub name is required")]
    MissingName,
    #[error("coordinates ({latitude}, {longitude}) are not a valid position")]
    InvalidCoordinates { latitude: String, longitude: String },
    #[error("pint price must be a non-negative amount")]
    InvalidPintPrice,
}

/// A pub as submitted, before the store has assigned it an id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewPub {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub amenities: Amenities,
}

impl NewPub {
    pub fn validate(&self) -> Result<(), PubValidationError> {
        if self.name.trim().is_empty() {
            return Err(PubValidationError::MissingName);
        }

        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if !lat_ok || !lon_ok {
            return Err(PubValidationError::InvalidCoordinates {
                latitude: self.latitude.to_string(),
                longitude: self.longitude.to_string(),
            });
        }

        let price = self.amenities.pint_price;
        if !price.is_finite() || price < 0.0 {
            return Err(PubValidationError::InvalidPintPrice);
        }

        Ok(())
    }

    pub fn into_pub(self, id: i64) -> Pub {
        Pub {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            details: PubDetails::Amenities(self.amenities),
        }
    }
}

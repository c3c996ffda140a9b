//! Postal addresses
//!
//! Events, individuals and organisations all point at rows of the `address`
//! table, so the shape lives in the kernel.

use serde::{Deserialize, Serialize};

use crate::error::app_error::{AppError, AppResult};
use crate::id::AddressId;

/// Latitude / longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

impl Coordinates {
    pub fn new(lat: f64, long: f64) -> AppResult<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::bad_request("Input validation failed")
                .with_errors(["lat must be between -90 and 90"]));
        }
        if !(-180.0..=180.0).contains(&long) {
            return Err(AppError::bad_request("Input validation failed")
                .with_errors(["long must be between -180 and 180"]));
        }
        Ok(Self { lat, long })
    }
}

/// Address as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub address_1: String,
    pub address_2: String,
    pub postcode: String,
    pub city: String,
    pub region: String,
    pub lat: f64,
    pub long: f64,
}

impl Address {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            long: self.long,
        }
    }
}

/// Address that has not been inserted yet.
///
/// Coordinates are filled in by geocoding; `(0, 0)` means "unknown".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    pub postcode: String,
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub long: f64,
}

impl NewAddress {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if self.address_1.trim().is_empty() {
            errors.push("address1 is required");
        }
        if self.postcode.trim().is_empty() {
            errors.push("postcode is required");
        }
        if self.city.trim().is_empty() {
            errors.push("city is required");
        }
        if !errors.is_empty() {
            return Err(AppError::bad_request("Input validation failed").with_errors(errors));
        }
        Coordinates::new(self.lat, self.long).map(|_| ())
    }

    /// Single line form used as a geocoder query.
    pub fn one_line(&self) -> String {
        [
            self.address_1.as_str(),
            self.address_2.as_str(),
            self.city.as_str(),
            self.region.as_str(),
            self.postcode.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.lat = coordinates.lat;
        self.long = coordinates.long;
        self
    }

    /// True when both describe the same place, ignoring coordinates.
    pub fn same_place_as(&self, address: &Address) -> bool {
        self.address_1 == address.address_1
            && self.address_2 == address.address_2
            && self.postcode == address.postcode
            && self.city == address.city
            && self.region == address.region
    }

    pub fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            address_1: self.address_1,
            address_2: self.address_2,
            postcode: self.postcode,
            city: self.city,
            region: self.region,
            lat: self.lat,
            long: self.long,
        }
    }
}

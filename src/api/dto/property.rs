//! DTOs for property listings.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::sync::LazyLock;
use validator::Validate;

use super::not_blank;
use super::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{
    EnergyLabel, ListingStatus, NewProperty, Property, PropertyFilter, PropertyType,
};

/// Dutch postal code: four digits, optional space, two letters.
static POSTAL_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{3}\s?[A-Za-z]{2}$").expect("valid regex"));

/// House number with optional addition, e.g. `12`, `12A`, `12-2`.
static HOUSE_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,5}(\s?[-A-Za-z0-9]{1,4})?$").expect("valid regex"));

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(
        length(max = 200, message = "title must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub street: String,

    #[validate(regex(path = *HOUSE_NUMBER_REGEX, message = "Invalid house number"))]
    pub house_number: String,

    #[validate(regex(path = *POSTAL_CODE_REGEX, message = "Invalid Dutch postal code"))]
    pub postal_code: String,

    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub city: String,

    #[validate(range(min = 1, message = "asking_price must be positive"))]
    pub asking_price: i64,

    #[validate(range(min = 1, max = 100_000))]
    pub living_area_m2: i32,

    #[validate(range(min = 1, max = 100))]
    pub rooms: i32,

    pub property_type: PropertyType,

    pub energy_label: Option<EnergyLabel>,

    #[validate(range(min = 1))]
    pub woz_value: Option<i64>,
}

impl CreatePropertyRequest {
    /// Owner is filled in by the service from the caller.
    pub fn into_new_property(self) -> NewProperty {
        NewProperty {
            owner_id: 0,
            title: self.title.trim().to_string(),
            street: self.street.trim().to_string(),
            house_number: self.house_number.trim().to_string(),
            postal_code: normalize_postal_code(&self.postal_code),
            city: self.city.trim().to_string(),
            asking_price: self.asking_price,
            living_area_m2: self.living_area_m2,
            rooms: self.rooms,
            property_type: self.property_type,
            energy_label: self.energy_label,
            woz_value: self.woz_value,
        }
    }
}

/// `1234ab` and `1234 AB` both become `1234 AB`.
fn normalize_postal_code(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let (digits, letters) = compact.split_at(compact.len().min(4));
    format!("{digits} {}", letters.to_uppercase())
}

#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct PropertyListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    pub city: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_price: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 0))]
    pub max_price: Option<i64>,
}

impl PropertyListQuery {
    pub fn filter(&self) -> PropertyFilter {
        PropertyFilter {
            city: self
                .city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub address: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub asking_price: i64,
    pub living_area_m2: i32,
    pub price_per_m2: Option<i64>,
    pub rooms: i32,
    pub property_type: PropertyType,
    pub energy_label: Option<EnergyLabel>,
    pub woz_value: Option<i64>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        Self {
            address: p.address(),
            price_per_m2: p.price_per_m2(),
            id: p.id,
            owner_id: p.owner_id,
            title: p.title,
            street: p.street,
            house_number: p.house_number,
            postal_code: p.postal_code,
            city: p.city,
            asking_price: p.asking_price,
            living_area_m2: p.living_area_m2,
            rooms: p.rooms,
            property_type: p.property_type,
            energy_label: p.energy_label,
            woz_value: p.woz_value,
            status: p.status,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertyListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<PropertyResponse>,
}

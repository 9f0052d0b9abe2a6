//! Property listing entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of dwelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    Terraced,
    SemiDetached,
    Detached,
    Houseboat,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Terraced => "terraced",
            PropertyType::SemiDetached => "semi_detached",
            PropertyType::Detached => "detached",
            PropertyType::Houseboat => "houseboat",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment" => Ok(PropertyType::Apartment),
            "terraced" => Ok(PropertyType::Terraced),
            "semi_detached" => Ok(PropertyType::SemiDetached),
            "detached" => Ok(PropertyType::Detached),
            "houseboat" => Ok(PropertyType::Houseboat),
            other => Err(format!("unknown property type '{other}'")),
        }
    }
}

/// Dutch energy performance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyLabel {
    #[serde(rename = "A++++")]
    APlus4,
    #[serde(rename = "A+++")]
    APlus3,
    #[serde(rename = "A++")]
    APlus2,
    #[serde(rename = "A+")]
    APlus1,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl EnergyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLabel::APlus4 => "A++++",
            EnergyLabel::APlus3 => "A+++",
            EnergyLabel::APlus2 => "A++",
            EnergyLabel::APlus1 => "A+",
            EnergyLabel::A => "A",
            EnergyLabel::B => "B",
            EnergyLabel::C => "C",
            EnergyLabel::D => "D",
            EnergyLabel::E => "E",
            EnergyLabel::F => "F",
            EnergyLabel::G => "G",
        }
    }
}

impl fmt::Display for EnergyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A++++" => Ok(EnergyLabel::APlus4),
            "A+++" => Ok(EnergyLabel::APlus3),
            "A++" => Ok(EnergyLabel::APlus2),
            "A+" => Ok(EnergyLabel::APlus1),
            "A" => Ok(EnergyLabel::A),
            "B" => Ok(EnergyLabel::B),
            "C" => Ok(EnergyLabel::C),
            "D" => Ok(EnergyLabel::D),
            "E" => Ok(EnergyLabel::E),
            "F" => Ok(EnergyLabel::F),
            "G" => Ok(EnergyLabel::G),
            other => Err(format!("unknown energy label '{other}'")),
        }
    }
}

/// Listing availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Available,
    UnderOffer,
    Sold,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::UnderOffer => "under_offer",
            ListingStatus::Sold => "sold",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(ListingStatus::Available),
            "under_offer" => Ok(ListingStatus::UnderOffer),
            "sold" => Ok(ListingStatus::Sold),
            other => Err(format!("unknown listing status '{other}'")),
        }
    }
}

/// A property listed on the marketplace. Prices are whole euros.
#[derive(Debug, Clone)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub asking_price: i64,
    pub living_area_m2: i32,
    pub rooms: i32,
    pub property_type: PropertyType,
    pub energy_label: Option<EnergyLabel>,
    pub woz_value: Option<i64>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Asking price divided by living area, rounded to whole euros.
    pub fn price_per_m2(&self) -> Option<i64> {
        (self.living_area_m2 > 0)
            .then(|| (self.asking_price as f64 / self.living_area_m2 as f64).round() as i64)
    }

    /// Single-line postal address.
    pub fn address(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.street, self.house_number, self.postal_code, self.city
        )
    }
}

/// Input data for creating a listing.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub asking_price: i64,
    pub living_area_m2: i32,
    pub rooms: i32,
    pub property_type: PropertyType,
    pub energy_label: Option<EnergyLabel>,
    pub woz_value: Option<i64>,
}

/// Listing search filter.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub city: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

/// Aggregate over the listings of one city.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityListingStats {
    pub listing_count: i64,
    pub average_asking_price: Option<f64>,
    pub average_price_per_m2: Option<f64>,
}

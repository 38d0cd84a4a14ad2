use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use super::{ListingId, UserId};

/// Fixed set of service categories offered on the marketplace.
///
/// The serialized names are the Spanish display strings stored in the
/// record store and shown in the UI; keep them stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Category {
    #[serde(rename = "Diseño Gráfico")]
    #[strum(serialize = "Diseño Gráfico")]
    GraphicDesign,
    #[serde(rename = "Desarrollo Web")]
    #[strum(serialize = "Desarrollo Web")]
    WebDevelopment,
    #[serde(rename = "Marketing Digital")]
    #[strum(serialize = "Marketing Digital")]
    DigitalMarketing,
    #[serde(rename = "Redacción")]
    #[strum(serialize = "Redacción")]
    Writing,
    #[serde(rename = "Fotografía")]
    #[strum(serialize = "Fotografía")]
    Photography,
    #[serde(rename = "Traducción")]
    #[strum(serialize = "Traducción")]
    Translation,
    #[serde(rename = "Clases Particulares")]
    #[strum(serialize = "Clases Particulares")]
    Tutoring,
    #[serde(rename = "Reparaciones")]
    #[strum(serialize = "Reparaciones")]
    Repairs,
    #[serde(rename = "Otros")]
    #[strum(serialize = "Otros")]
    Other,
}

/// Unit the price refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum PriceType {
    #[serde(rename = "hora")]
    #[strum(serialize = "hora")]
    PerHour,
    #[serde(rename = "proyecto")]
    #[strum(serialize = "proyecto")]
    PerProject,
    #[serde(rename = "dia")]
    #[strum(serialize = "dia")]
    PerDay,
    #[serde(rename = "semana")]
    #[strum(serialize = "semana")]
    PerWeek,
    #[serde(rename = "mes")]
    #[strum(serialize = "mes")]
    PerMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Paused,
    Closed,
}

/// One published service offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub author_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    pub price_type: PriceType,
    pub location: Option<String>,
    pub contact_info: String,
    pub tags: Vec<String>,
    pub status: ListingStatus,
    /// Public image URLs in upload submission order.
    pub image_urls: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated form fields for a new listing. Image files travel separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    pub price_type: PriceType,
    pub location: Option<String>,
    pub contact_info: String,
    pub tags: Vec<String>,
}

impl NewListing {
    /// Check the record invariants: trimmed-non-empty required text fields
    /// and a strictly positive price.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        if self.contact_info.trim().is_empty() {
            return Err("contact info must not be empty".to_string());
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err("price must be a positive number".to_string());
        }
        Ok(())
    }
}

/// Owner-initiated partial edit. `None` fields are left untouched.
///
/// `location` is the only nullable column, so it is tri-state:
/// `None` leaves it untouched, `Some(None)` clears it, `Some(Some(v))`
/// sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub price_type: Option<PriceType>,
    pub location: Option<Option<String>>,
    pub contact_info: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
}

impl ListingPatch {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err("description must not be empty".to_string());
        }
        if matches!(&self.contact_info, Some(c) if c.trim().is_empty()) {
            return Err("contact info must not be empty".to_string());
        }
        if matches!(self.price, Some(p) if !p.is_finite() || p <= 0.0) {
            return Err("price must be a positive number".to_string());
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Browse filter; all predicates are conjunctive equality checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub category: Option<Category>,
    pub author: Option<UserId>,
    pub status: Option<ListingStatus>,
}

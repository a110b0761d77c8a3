//! Room record and room types.

use serde::{Deserialize, Serialize};

/// Room category as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    Family,
    Luxury,
}

impl RoomType {
    /// Russian display label, as shown by the original UI.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Стандартный",
            Self::Deluxe => "Делюкс",
            Self::Suite => "Люкс",
            Self::Family => "Семейный",
            Self::Luxury => "Президентский",
        }
    }
}

/// Room as returned by `/rooms` endpoints.
///
/// `available` is the only field an admin mutation toggles independently of
/// a full update (`PATCH /rooms/:id/availability`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub hotel_id: i64,
    pub name: String,
    pub room_type: RoomType,
    /// Maximum number of guests, at least 1.
    pub capacity: u32,
    pub price_per_night: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

//! Hotel record.

use serde::{Deserialize, Serialize};

/// Hotel as returned by `/hotels` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Rating on a 0–5 scale.
    #[serde(default)]
    pub rating: f64,
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hotel_deserializes_with_defaults() {
        let json = r#"{
            "id": 3,
            "name": "Гранд Отель",
            "address": "Невский пр. 1",
            "city": "Санкт-Петербург"
        }"#;
        let hotel: Hotel = serde_json::from_str(json).unwrap();
        assert_eq!(hotel.city, "Санкт-Петербург");
        assert!(hotel.amenities.is_empty());
        assert!(hotel.images.is_empty());
        assert_eq!(hotel.rating, 0.0);
    }

    #[test]
    fn hotel_serializes_camel_case() {
        let hotel = Hotel {
            id: 1,
            name: "Test".into(),
            description: String::new(),
            address: "addr".into(),
            city: "Москва".into(),
            phone: None,
            email: None,
            amenities: vec!["wifi".into()],
            images: Vec::new(),
            rating: 4.5,
        };
        let json = serde_json::to_string(&hotel).unwrap();
        assert!(json.contains("\"amenities\""));
        assert!(!json.contains("room_type"));
        assert!(json.contains("\"rating\":4.5"));
    }
}

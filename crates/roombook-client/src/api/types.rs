//! Request/response payloads for the booking backend.
//!
//! Domain records live in `roombook_core::models`; this module holds the
//! bodies the client sends and the auth/error envelopes it receives.

use serde::{Deserialize, Serialize};

use roombook_core::models::{RoomType, User};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Response of the auth endpoints: a bearer token plus the user record.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Body of `POST /hotels` and `PUT /hotels/:id`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelInput {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub rating: f64,
}

/// Body of `POST /rooms` and `PUT /rooms/:id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInput {
    pub hotel_id: i64,
    pub name: String,
    pub room_type: RoomType,
    pub capacity: u32,
    pub price_per_night: f64,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub available: bool,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub room_id: i64,
    pub hotel_id: i64,
    pub check_in_date: chrono::NaiveDate,
    pub check_out_date: chrono::NaiveDate,
    pub guests: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub special_requests: String,
}

/// Error envelope the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

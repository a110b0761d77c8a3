//! Booking record and its lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Booking lifecycle state.
///
/// created → PENDING/CONFIRMED → (CANCELLED | COMPLETED); the last two are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Terminal states cannot transition further.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Russian display label, as shown by the original UI.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Ожидает подтверждения",
            Self::Confirmed => "Подтверждено",
            Self::Cancelled => "Отменено",
            Self::Completed => "Завершено",
        }
    }

    /// Wire-format name, used in paths and query parameters.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Booking as returned by `/bookings` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub hotel_id: i64,
    pub room_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    #[serde(default)]
    pub special_requests: String,
    pub total_price: f64,
    pub status: BookingStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Display rule for the cancel affordance: only non-terminal bookings
    /// with a future check-in can be cancelled. The server is the authority;
    /// this mirrors its rule client-side.
    pub fn is_cancellable(&self, today: NaiveDate) -> bool {
        matches!(
            self.status,
            BookingStatus::Pending | BookingStatus::Confirmed
        ) && self.check_in_date > today
    }

    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus, check_in: NaiveDate) -> Booking {
        Booking {
            id: 1,
            user_id: 1,
            hotel_id: 1,
            room_id: 1,
            check_in_date: check_in,
            check_out_date: check_in + chrono::Duration::days(3),
            guests: 2,
            special_requests: String::new(),
            total_price: 300.0,
            status,
            created_at: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn status_round_trips_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        let status: BookingStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(status, BookingStatus::Pending);
    }

    #[test]
    fn terminal_states() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }

    #[test]
    fn status_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(
            BookingStatus::from_str("confirmed").unwrap(),
            BookingStatus::Confirmed
        );
        assert!(BookingStatus::from_str("unknown").is_err());
    }

    #[test]
    fn future_pending_booking_is_cancellable() {
        let today = date("2026-08-01");
        let b = booking(BookingStatus::Pending, date("2026-08-10"));
        assert!(b.is_cancellable(today));
    }

    #[test]
    fn past_or_terminal_booking_is_not_cancellable() {
        let today = date("2026-08-01");
        assert!(!booking(BookingStatus::Pending, date("2026-07-20")).is_cancellable(today));
        assert!(!booking(BookingStatus::Cancelled, date("2026-08-10")).is_cancellable(today));
        assert!(!booking(BookingStatus::Completed, date("2026-08-10")).is_cancellable(today));
        // Check-in today is already too late to cancel.
        assert!(!booking(BookingStatus::Confirmed, today).is_cancellable(today));
    }

    #[test]
    fn nights_counts_whole_days() {
        let b = booking(BookingStatus::Confirmed, date("2026-09-01"));
        assert_eq!(b.nights(), 3);
    }

    #[test]
    fn booking_deserializes_from_backend_json() {
        let json = r#"{
            "id": 42,
            "userId": 7,
            "hotelId": 3,
            "roomId": 12,
            "checkInDate": "2026-09-01",
            "checkOutDate": "2026-09-04",
            "guests": 2,
            "specialRequests": "Поздний заезд",
            "totalPrice": 22500.0,
            "status": "CONFIRMED",
            "createdAt": "2026-08-20T12:00:00Z"
        }"#;
        let b: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.nights(), 3);
        assert_eq!(b.special_requests, "Поздний заезд");
    }
}

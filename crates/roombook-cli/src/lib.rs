//! Roombook CLI library.
//!
//! Terminal client for the hotel booking backend: session management,
//! cached reads, and the write operations with their cache invalidation.

pub mod admin_cmd;
pub mod auth_cmd;
pub mod booking_cmd;
pub mod context;
pub mod hotel_cmd;
pub mod open_cmd;
pub mod room_cmd;

//! Booking backend REST API integration.
//!
//! Provides a reqwest-based client covering auth, hotels, rooms, bookings
//! and admin user management.

mod client;
pub mod types;


pub use client::{ApiClient, ApiError, Fetcher, TokenHandle};
pub use types::{AuthResponse, BookingInput, HotelInput, LoginRequest, RegisterRequest, RoomInput};

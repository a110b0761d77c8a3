//! `roombook` Core Library
//!
//! Shared functionality for roombook components:
//! - Domain models mirroring the booking backend's JSON contracts
//! - Client-side form and booking validation
//! - Configuration resolution
//! - Common error types

pub mod config;
pub mod error;
pub mod models;
pub mod tracing_init;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Booking, BookingStatus, Hotel, Room, RoomType, User, UserRole};

//! Domain models mirroring the booking backend's JSON contracts.
//!
//! All records are owned server-side; the client holds read-through cached
//! copies only. Field names serialize in camelCase, enum variants in
//! SCREAMING_SNAKE_CASE, matching the backend wire format.

mod booking;
mod hotel;
mod room;
mod user;

pub use booking::{Booking, BookingStatus};
pub use hotel::Hotel;
pub use room::{Room, RoomType};
pub use user::{User, UserRole};

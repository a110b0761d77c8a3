//! roombook Client Library
//!
//! The data-synchronization layer between the UI and the booking backend:
//! - Typed REST API client (the remote API owns all business logic)
//! - Session store synchronized with durable storage
//! - Remote resource cache with family-based invalidation
//! - Mutation dispatcher declaring which cache families each write stales
//! - Route/guard resolution for the admin branch

pub mod api;
pub mod cache;
pub mod mutation;
pub mod routes;
pub mod session;

pub use api::{ApiClient, ApiError, BookingInput, Fetcher, HotelInput, RoomInput};
pub use cache::{CacheEntry, Family, QueryKey, QueryStatus, ResourceCache, Subscription};
pub use mutation::{MutationDispatcher, MutationError, MutationKind};
pub use routes::{AdminPage, Resolution, Route};
pub use session::{SessionSnapshot, SessionStore};

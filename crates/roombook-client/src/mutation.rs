//! Mutation dispatcher.
//!
//! Performs state-changing requests and declares which cache families each
//! one stales. The mapping is a single static table so the dependency graph
//! between writes and reads stays auditable. Invalidation fires only after
//! the server confirms the write; there are no optimistic cache updates.

use chrono::Local;
use thiserror::Error;
use tracing::info;

use roombook_core::models::{Booking, BookingStatus, Hotel, Room, User, UserRole};
use roombook_core::validation::{
    self, FieldError, MSG_AUTH_REQUIRED, ValidationErrors, validate_dates, validate_guests,
};

use crate::api::{ApiClient, ApiError, BookingInput, HotelInput, RoomInput};
use crate::cache::{Family, ResourceCache};
use crate::session::SessionSnapshot;

/// Every state-changing operation the client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    CreateHotel,
    UpdateHotel,
    DeleteHotel,
    CreateRoom,
    UpdateRoom,
    SetRoomAvailability,
    DeleteRoom,
    CreateBooking,
    CancelBooking,
    SetBookingStatus,
    SetUserRole,
    ToggleUserStatus,
}

impl MutationKind {
    /// Cache families this mutation stales on success.
    pub const fn invalidates(self) -> &'static [Family] {
        match self {
            Self::CreateHotel | Self::UpdateHotel | Self::DeleteHotel => &[Family::Hotels],
            Self::CreateRoom | Self::UpdateRoom | Self::SetRoomAvailability | Self::DeleteRoom => {
                &[Family::Rooms]
            }
            Self::CreateBooking | Self::CancelBooking | Self::SetBookingStatus => {
                &[Family::Bookings]
            }
            Self::SetUserRole | Self::ToggleUserStatus => &[Family::Users],
        }
    }
}

/// Mutation failure: rejected client-side before any network call, or a
/// classified API failure. Either way the cache is untouched.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl MutationError {
    /// Message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errs) => errs
                .errors
                .first()
                .map_or_else(String::new, |e| e.message.clone()),
            Self::Api(err) => err.user_message(),
        }
    }
}

/// Dispatches writes to the backend and invalidates the declared cache
/// families on success.
#[derive(Clone)]
pub struct MutationDispatcher {
    api: ApiClient,
    cache: ResourceCache<ApiClient>,
}

impl MutationDispatcher {
    pub const fn new(api: ApiClient, cache: ResourceCache<ApiClient>) -> Self {
        Self { api, cache }
    }

    fn settle<T>(
        &self,
        kind: MutationKind,
        result: Result<T, ApiError>,
    ) -> Result<T, MutationError> {
        match result {
            Ok(value) => {
                info!(?kind, families = ?kind.invalidates(), "mutation confirmed");
                self.cache.invalidate_all(kind.invalidates());
                Ok(value)
            }
            Err(err) => Err(MutationError::Api(err)),
        }
    }

    // =========================================================================
    // Hotels (admin)
    // =========================================================================

    pub async fn create_hotel(&self, hotel: &HotelInput) -> Result<Hotel, MutationError> {
        let result = self.api.create_hotel(hotel).await;
        self.settle(MutationKind::CreateHotel, result)
    }

    pub async fn update_hotel(&self, id: i64, hotel: &HotelInput) -> Result<Hotel, MutationError> {
        let result = self.api.update_hotel(id, hotel).await;
        self.settle(MutationKind::UpdateHotel, result)
    }

    pub async fn delete_hotel(&self, id: i64) -> Result<(), MutationError> {
        let result = self.api.delete_hotel(id).await;
        self.settle(MutationKind::DeleteHotel, result)
    }

    // =========================================================================
    // Rooms (admin)
    // =========================================================================

    pub async fn create_room(&self, room: &RoomInput) -> Result<Room, MutationError> {
        let result = self.api.create_room(room).await;
        self.settle(MutationKind::CreateRoom, result)
    }

    pub async fn update_room(&self, id: i64, room: &RoomInput) -> Result<Room, MutationError> {
        let result = self.api.update_room(id, room).await;
        self.settle(MutationKind::UpdateRoom, result)
    }

    pub async fn set_room_availability(
        &self,
        id: i64,
        available: bool,
    ) -> Result<Room, MutationError> {
        let result = self.api.set_room_availability(id, available).await;
        self.settle(MutationKind::SetRoomAvailability, result)
    }

    pub async fn delete_room(&self, id: i64) -> Result<(), MutationError> {
        let result = self.api.delete_room(id).await;
        self.settle(MutationKind::DeleteRoom, result)
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    /// Create a booking.
    ///
    /// Validates client-side before any network call: the session must be
    /// authenticated, the dates sane, and the guest count within the room's
    /// capacity. The server re-checks everything and remains the authority
    /// on conflicts.
    pub async fn create_booking(
        &self,
        session: &SessionSnapshot,
        room: &Room,
        input: &BookingInput,
    ) -> Result<Booking, MutationError> {
        if !session.authenticated {
            return Err(ValidationErrors {
                errors: vec![FieldError {
                    field: "session".into(),
                    message: MSG_AUTH_REQUIRED.into(),
                }],
            }
            .into());
        }
        let today = Local::now().date_naive();
        validate_dates(input.check_in_date, input.check_out_date, today)?;
        validate_guests(input.guests, room.capacity)?;

        let result = self.api.create_booking(input).await;
        self.settle(MutationKind::CreateBooking, result)
    }

    /// Expected total for the stay, shown before submitting.
    pub fn quote_total(room: &Room, input: &BookingInput) -> f64 {
        validation::total_price(
            input.check_in_date,
            input.check_out_date,
            room.price_per_night,
        )
    }

    pub async fn cancel_booking(&self, id: i64) -> Result<Booking, MutationError> {
        let result = self.api.cancel_booking(id).await;
        self.settle(MutationKind::CancelBooking, result)
    }

    pub async fn set_booking_status(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Booking, MutationError> {
        let result = self.api.set_booking_status(id, status).await;
        self.settle(MutationKind::SetBookingStatus, result)
    }

    // =========================================================================
    // Users (admin)
    // =========================================================================

    pub async fn set_user_role(&self, id: i64, role: UserRole) -> Result<User, MutationError> {
        let result = self.api.set_user_role(id, role).await;
        self.settle(MutationKind::SetUserRole, result)
    }

    pub async fn toggle_user_status(&self, id: i64) -> Result<User, MutationError> {
        let result = self.api.toggle_user_status(id).await;
        self.settle(MutationKind::ToggleUserStatus, result)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_table_routes_writes_to_their_family() {
        assert_eq!(MutationKind::CreateBooking.invalidates(), &[Family::Bookings]);
        assert_eq!(
            MutationKind::SetRoomAvailability.invalidates(),
            &[Family::Rooms]
        );
        assert_eq!(MutationKind::UpdateHotel.invalidates(), &[Family::Hotels]);
        assert_eq!(MutationKind::ToggleUserStatus.invalidates(), &[Family::Users]);
    }

    #[test]
    fn every_mutation_invalidates_something() {
        let kinds = [
            MutationKind::CreateHotel,
            MutationKind::UpdateHotel,
            MutationKind::DeleteHotel,
            MutationKind::CreateRoom,
            MutationKind::UpdateRoom,
            MutationKind::SetRoomAvailability,
            MutationKind::DeleteRoom,
            MutationKind::CreateBooking,
            MutationKind::CancelBooking,
            MutationKind::SetBookingStatus,
            MutationKind::SetUserRole,
            MutationKind::ToggleUserStatus,
        ];
        for kind in kinds {
            assert!(!kind.invalidates().is_empty(), "{kind:?} invalidates nothing");
        }
    }

    #[test]
    fn validation_error_surfaces_first_message() {
        let err = MutationError::Validation(ValidationErrors {
            errors: vec![FieldError {
                field: "guests".into(),
                message: "Максимум 4".into(),
            }],
        });
        assert_eq!(err.user_message(), "Максимум 4");
    }
}

//! Admin subcommands: hotel, room, booking and user management.
//!
//! Every action checks the restored session for the ADMIN role before
//! issuing any request; a plain user session is rejected locally.

use std::io::{self, Write};

use crate::context::AppContext;
use crate::hotel_cmd::fetch_list;
use crate::room_cmd::print_rooms;
use roombook_client::{HotelInput, QueryKey, RoomInput};
use roombook_core::models::{Booking, BookingStatus, Room, RoomType, User, UserRole};

/// Admin subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AdminAction {
    /// Hotel management.
    Hotel {
        #[command(subcommand)]
        action: HotelAdminAction,
    },
    /// Room management.
    Room {
        #[command(subcommand)]
        action: RoomAdminAction,
    },
    /// Booking management.
    Booking {
        #[command(subcommand)]
        action: BookingAdminAction,
    },
    /// User management.
    User {
        #[command(subcommand)]
        action: UserAdminAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum HotelAdminAction {
    /// Create a hotel.
    Create {
        name: String,
        address: String,
        city: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Amenity, repeatable.
        #[arg(long = "amenity")]
        amenities: Vec<String>,
        #[arg(long, default_value = "0")]
        rating: f64,
    },
    /// Replace a hotel's details.
    Update {
        /// Hotel ID.
        id: i64,
        name: String,
        address: String,
        city: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Amenity, repeatable.
        #[arg(long = "amenity")]
        amenities: Vec<String>,
        #[arg(long, default_value = "0")]
        rating: f64,
    },
    /// Delete a hotel.
    Delete {
        /// Hotel ID.
        id: i64,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum RoomAdminAction {
    /// List every room across hotels.
    List,
    /// Create a room.
    Create {
        /// Hotel ID.
        hotel_id: i64,
        name: String,
        /// Room type: standard, deluxe, suite, family, luxury.
        #[arg(value_parser = parse_room_type)]
        room_type: RoomType,
        capacity: u32,
        price_per_night: f64,
        /// Amenity, repeatable.
        #[arg(long = "amenity")]
        amenities: Vec<String>,
    },
    /// Replace a room's details.
    Update {
        /// Room ID.
        id: i64,
        /// Hotel ID.
        hotel_id: i64,
        name: String,
        /// Room type: standard, deluxe, suite, family, luxury.
        #[arg(value_parser = parse_room_type)]
        room_type: RoomType,
        capacity: u32,
        price_per_night: f64,
        /// Keep the room bookable.
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        available: bool,
    },
    /// Toggle a room's availability.
    SetAvailability {
        /// Room ID.
        id: i64,
        /// "true" or "false".
        available: bool,
    },
    /// Delete a room.
    Delete {
        /// Room ID.
        id: i64,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum BookingAdminAction {
    /// List bookings of a hotel.
    ByHotel {
        /// Hotel ID.
        hotel_id: i64,
    },
    /// List bookings in a given status.
    ByStatus {
        /// PENDING, CONFIRMED, CANCELLED or COMPLETED.
        status: BookingStatus,
    },
    /// Change a booking's status.
    SetStatus {
        /// Booking ID.
        id: i64,
        /// PENDING, CONFIRMED, CANCELLED or COMPLETED.
        status: BookingStatus,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum UserAdminAction {
    /// List all users.
    List,
    /// Change a user's role.
    SetRole {
        /// User ID.
        id: i64,
        /// "user" or "admin".
        #[arg(value_parser = parse_role)]
        role: UserRole,
    },
    /// Activate or deactivate a user.
    Toggle {
        /// User ID.
        id: i64,
    },
}

fn parse_room_type(s: &str) -> Result<RoomType, String> {
    match s.to_ascii_lowercase().as_str() {
        "standard" => Ok(RoomType::Standard),
        "deluxe" => Ok(RoomType::Deluxe),
        "suite" => Ok(RoomType::Suite),
        "family" => Ok(RoomType::Family),
        "luxury" => Ok(RoomType::Luxury),
        other => Err(format!("unknown room type: {other}")),
    }
}

fn parse_role(s: &str) -> Result<UserRole, String> {
    match s.to_ascii_uppercase().as_str() {
        "USER" => Ok(UserRole::User),
        "ADMIN" => Ok(UserRole::Admin),
        other => Err(format!("unknown role: {other}")),
    }
}

/// Execute an admin subcommand.
pub async fn run(ctx: &AppContext, action: AdminAction) -> anyhow::Result<()> {
    ctx.require_admin()?;
    match action {
        AdminAction::Hotel { action } => run_hotel(ctx, action).await,
        AdminAction::Room { action } => run_room(ctx, action).await,
        AdminAction::Booking { action } => run_booking(ctx, action).await,
        AdminAction::User { action } => run_user(ctx, action).await,
    }
}

async fn run_hotel(ctx: &AppContext, action: HotelAdminAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        HotelAdminAction::Create {
            name,
            address,
            city,
            description,
            phone,
            email,
            amenities,
            rating,
        } => {
            let input = HotelInput {
                name,
                description,
                address,
                city,
                phone,
                email,
                amenities,
                images: Vec::new(),
                rating,
            };
            match ctx.dispatcher.create_hotel(&input).await {
                Ok(hotel) => writeln!(out, "Created hotel #{}: {}", hotel.id, hotel.name)?,
                Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
            }
        }
        HotelAdminAction::Update {
            id,
            name,
            address,
            city,
            description,
            phone,
            email,
            amenities,
            rating,
        } => {
            let input = HotelInput {
                name,
                description,
                address,
                city,
                phone,
                email,
                amenities,
                images: Vec::new(),
                rating,
            };
            match ctx.dispatcher.update_hotel(id, &input).await {
                Ok(hotel) => writeln!(out, "Updated hotel #{}: {}", hotel.id, hotel.name)?,
                Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
            }
        }
        HotelAdminAction::Delete { id } => match ctx.dispatcher.delete_hotel(id).await {
            Ok(()) => writeln!(out, "Deleted hotel #{id}.")?,
            Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
        },
    }
    Ok(())
}

async fn run_room(ctx: &AppContext, action: RoomAdminAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        RoomAdminAction::List => {
            let rooms: Vec<Room> = fetch_list(ctx, QueryKey::all_rooms_admin()).await?;
            print_rooms(&mut out, &rooms)?;
        }
        RoomAdminAction::Create {
            hotel_id,
            name,
            room_type,
            capacity,
            price_per_night,
            amenities,
        } => {
            let input = RoomInput {
                hotel_id,
                name,
                room_type,
                capacity,
                price_per_night,
                amenities,
                images: Vec::new(),
                available: true,
            };
            match ctx.dispatcher.create_room(&input).await {
                Ok(room) => writeln!(out, "Created room #{}: {}", room.id, room.name)?,
                Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
            }
        }
        RoomAdminAction::Update {
            id,
            hotel_id,
            name,
            room_type,
            capacity,
            price_per_night,
            available,
        } => {
            let input = RoomInput {
                hotel_id,
                name,
                room_type,
                capacity,
                price_per_night,
                amenities: Vec::new(),
                images: Vec::new(),
                available,
            };
            match ctx.dispatcher.update_room(id, &input).await {
                Ok(room) => writeln!(out, "Updated room #{}: {}", room.id, room.name)?,
                Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
            }
        }
        RoomAdminAction::SetAvailability { id, available } => {
            match ctx.dispatcher.set_room_availability(id, available).await {
                Ok(room) => writeln!(
                    out,
                    "Room #{} is now {}.",
                    room.id,
                    if room.available { "available" } else { "unavailable" }
                )?,
                Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
            }
        }
        RoomAdminAction::Delete { id } => match ctx.dispatcher.delete_room(id).await {
            Ok(()) => writeln!(out, "Deleted room #{id}.")?,
            Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
        },
    }
    Ok(())
}

async fn run_booking(ctx: &AppContext, action: BookingAdminAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        BookingAdminAction::ByHotel { hotel_id } => {
            let bookings: Vec<Booking> = fetch_list(ctx, QueryKey::hotel_bookings(hotel_id)).await?;
            print_booking_rows(&mut out, &bookings)?;
        }
        BookingAdminAction::ByStatus { status } => {
            let bookings: Vec<Booking> = fetch_list(ctx, QueryKey::bookings_by_status(status)).await?;
            print_booking_rows(&mut out, &bookings)?;
        }
        BookingAdminAction::SetStatus { id, status } => {
            match ctx.dispatcher.set_booking_status(id, status).await {
                Ok(booking) => writeln!(
                    out,
                    "Booking #{}: {}",
                    booking.id,
                    booking.status.label()
                )?,
                Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
            }
        }
    }
    Ok(())
}

async fn run_user(ctx: &AppContext, action: UserAdminAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        UserAdminAction::List => {
            let users: Vec<User> = fetch_list(ctx, QueryKey::users()).await?;
            if users.is_empty() {
                writeln!(out, "No users found.")?;
            } else {
                writeln!(out, "{:<6} {:<28} {:<28} {:<8} {:<8}", "ID", "NAME", "EMAIL", "ROLE", "ACTIVE")?;
                for user in users {
                    writeln!(
                        out,
                        "{:<6} {:<28} {:<28} {:<8} {:<8}",
                        user.id,
                        user.display_name(),
                        user.email,
                        user.role.as_str(),
                        if user.active { "yes" } else { "no" }
                    )?;
                }
            }
        }
        UserAdminAction::SetRole { id, role } => match ctx.dispatcher.set_user_role(id, role).await
        {
            Ok(user) => writeln!(out, "User #{} is now {}.", user.id, user.role.as_str())?,
            Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
        },
        UserAdminAction::Toggle { id } => match ctx.dispatcher.toggle_user_status(id).await {
            Ok(user) => writeln!(
                out,
                "User #{} is now {}.",
                user.id,
                if user.active { "active" } else { "inactive" }
            )?,
            Err(err) => writeln!(out, "Failed: {}", err.user_message())?,
        },
    }
    Ok(())
}

fn print_booking_rows(out: &mut impl Write, bookings: &[Booking]) -> io::Result<()> {
    if bookings.is_empty() {
        return writeln!(out, "No bookings found.");
    }
    writeln!(
        out,
        "{:<6} {:<6} {:<6} {:<12} {:<12} {:<24}",
        "ID", "USER", "ROOM", "CHECK-IN", "CHECK-OUT", "STATUS"
    )?;
    for booking in bookings {
        writeln!(
            out,
            "{:<6} {:<6} {:<6} {:<12} {:<12} {:<24}",
            booking.id,
            booking.user_id,
            booking.room_id,
            booking.check_in_date,
            booking.check_out_date,
            booking.status.label()
        )?;
    }
    Ok(())
}

//! Booking subcommands: list, active, show, create, cancel.

use std::io::{self, Write};

use chrono::{Local, NaiveDate};

use crate::context::AppContext;
use crate::hotel_cmd::fetch_list;
use roombook_client::{BookingInput, MutationDispatcher, QueryKey, QueryStatus};
use roombook_core::models::{Booking, Room};

/// Booking subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum BookingAction {
    /// List my bookings.
    List,
    /// List my active (non-terminal) bookings.
    Active,
    /// Show one booking.
    Show {
        /// Booking ID.
        id: i64,
    },
    /// Book a room.
    Create {
        /// Hotel ID.
        hotel_id: i64,
        /// Room ID.
        room_id: i64,
        /// Check-in date (YYYY-MM-DD).
        check_in: NaiveDate,
        /// Check-out date (YYYY-MM-DD).
        check_out: NaiveDate,
        /// Number of guests.
        #[arg(default_value = "1")]
        guests: u32,
        /// Special requests passed to the hotel.
        #[arg(long, default_value = "")]
        requests: String,
    },
    /// Cancel a booking.
    Cancel {
        /// Booking ID.
        id: i64,
    },
}

/// Execute a booking subcommand.
pub async fn run(ctx: &AppContext, action: BookingAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        BookingAction::List => {
            let bookings: Vec<Booking> = fetch_list(ctx, QueryKey::my_bookings()).await?;
            print_bookings(&mut out, &bookings)?;
        }
        BookingAction::Active => {
            let bookings: Vec<Booking> = fetch_list(ctx, QueryKey::my_active_bookings()).await?;
            print_bookings(&mut out, &bookings)?;
        }
        BookingAction::Show { id } => {
            let mut sub = ctx.cache.subscribe(QueryKey::booking(id));
            let entry = sub.ready().await;
            match entry.status {
                QueryStatus::Error(message) => writeln!(out, "Error: {message}")?,
                _ => match entry.decode::<Booking>() {
                    Some(booking) => print_booking(&mut out, &booking)?,
                    None => writeln!(out, "Booking {id} not found.")?,
                },
            }
        }
        BookingAction::Create {
            hotel_id,
            room_id,
            check_in,
            check_out,
            guests,
            requests,
        } => {
            let rooms: Vec<Room> = fetch_list(ctx, QueryKey::rooms_by_hotel(hotel_id)).await?;
            let Some(room) = rooms.into_iter().find(|r| r.id == room_id) else {
                writeln!(out, "Room {room_id} not found in hotel {hotel_id}.")?;
                return Ok(());
            };

            let input = BookingInput {
                room_id,
                hotel_id,
                check_in_date: check_in,
                check_out_date: check_out,
                guests,
                special_requests: requests,
            };
            let total = MutationDispatcher::quote_total(&room, &input);
            match ctx
                .dispatcher
                .create_booking(&ctx.session.snapshot(), &room, &input)
                .await
            {
                Ok(booking) => {
                    writeln!(
                        out,
                        "Booked {} for {} night(s), total {:.2}.",
                        room.name,
                        booking.nights(),
                        total
                    )?;
                    writeln!(out, "Booking #{}: {}", booking.id, booking.status.label())?;
                }
                Err(err) => writeln!(out, "Booking failed: {}", err.user_message())?,
            }
        }
        BookingAction::Cancel { id } => {
            match ctx.dispatcher.cancel_booking(id).await {
                Ok(booking) => {
                    writeln!(out, "Booking #{}: {}", booking.id, booking.status.label())?;
                }
                Err(err) => writeln!(out, "Cancellation failed: {}", err.user_message())?,
            }
        }
    }
    Ok(())
}

fn print_bookings(out: &mut impl Write, bookings: &[Booking]) -> io::Result<()> {
    if bookings.is_empty() {
        return writeln!(out, "No bookings found.");
    }
    let today = Local::now().date_naive();
    writeln!(
        out,
        "{:<6} {:<12} {:<12} {:>6} {:>10} {:<24}",
        "ID", "CHECK-IN", "CHECK-OUT", "GUESTS", "TOTAL", "STATUS"
    )?;
    for booking in bookings {
        let mut status = booking.status.label().to_string();
        if booking.is_cancellable(today) {
            status.push_str(" (можно отменить)");
        }
        writeln!(
            out,
            "{:<6} {:<12} {:<12} {:>6} {:>10.2} {:<24}",
            booking.id,
            booking.check_in_date,
            booking.check_out_date,
            booking.guests,
            booking.total_price,
            status
        )?;
    }
    Ok(())
}

fn print_booking(out: &mut impl Write, booking: &Booking) -> io::Result<()> {
    writeln!(out, "Booking #{}", booking.id)?;
    writeln!(
        out,
        "  Hotel {} / room {}, {} guest(s)",
        booking.hotel_id, booking.room_id, booking.guests
    )?;
    writeln!(
        out,
        "  {} → {} ({} night(s))",
        booking.check_in_date,
        booking.check_out_date,
        booking.nights()
    )?;
    writeln!(out, "  Total: {:.2}", booking.total_price)?;
    writeln!(out, "  Status: {}", booking.status.label())?;
    if !booking.special_requests.is_empty() {
        writeln!(out, "  Requests: {}", booking.special_requests)?;
    }
    Ok(())
}

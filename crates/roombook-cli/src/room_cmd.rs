//! Room subcommands: list rooms of a hotel.

use std::io::{self, Write};

use crate::context::AppContext;
use crate::hotel_cmd::fetch_list;
use roombook_client::QueryKey;
use roombook_core::models::Room;

/// Room subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum RoomAction {
    /// List the rooms of a hotel.
    List {
        /// Hotel ID.
        hotel_id: i64,
    },
}

/// Execute a room subcommand.
pub async fn run(ctx: &AppContext, action: RoomAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        RoomAction::List { hotel_id } => {
            let rooms: Vec<Room> = fetch_list(ctx, QueryKey::rooms_by_hotel(hotel_id)).await?;
            print_rooms(&mut out, &rooms)?;
        }
    }
    Ok(())
}

pub(crate) fn print_rooms(out: &mut impl Write, rooms: &[Room]) -> io::Result<()> {
    if rooms.is_empty() {
        return writeln!(out, "No rooms found.");
    }
    writeln!(
        out,
        "{:<6} {:<24} {:<12} {:>6} {:>12} {:>10}",
        "ID", "NAME", "TYPE", "CAP", "PRICE/NIGHT", "AVAILABLE"
    )?;
    for room in rooms {
        writeln!(
            out,
            "{:<6} {:<24} {:<12} {:>6} {:>12.2} {:>10}",
            room.id,
            room.name,
            room.room_type.label(),
            room.capacity,
            room.price_per_night,
            if room.available { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

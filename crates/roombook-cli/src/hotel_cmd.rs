//! Hotel subcommands: list, show, by-city.
//!
//! Reads go through the resource cache so repeated commands inside one
//! process share entries and mutations refresh them.

use std::io::{self, Write};

use crate::context::AppContext;
use roombook_client::{QueryKey, QueryStatus};
use roombook_core::models::Hotel;

/// Hotel subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum HotelAction {
    /// List all hotels.
    List,
    /// Show one hotel.
    Show {
        /// Hotel ID.
        id: i64,
    },
    /// List hotels in a city.
    ByCity {
        /// City name.
        city: String,
    },
}

/// Execute a hotel subcommand.
pub async fn run(ctx: &AppContext, action: HotelAction) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        HotelAction::List => {
            let hotels: Vec<Hotel> = fetch_list(ctx, QueryKey::hotels()).await?;
            print_hotels(&mut out, &hotels)?;
        }
        HotelAction::Show { id } => {
            let mut sub = ctx.cache.subscribe(QueryKey::hotel(id));
            let entry = sub.ready().await;
            match entry.status {
                QueryStatus::Error(message) => writeln!(out, "Error: {message}")?,
                _ => match entry.decode::<Hotel>() {
                    Some(hotel) => print_hotel(&mut out, &hotel)?,
                    None => writeln!(out, "Hotel {id} not found.")?,
                },
            }
        }
        HotelAction::ByCity { city } => {
            let hotels: Vec<Hotel> = fetch_list(ctx, QueryKey::hotels_by_city(&city)).await?;
            if hotels.is_empty() {
                writeln!(out, "No hotels found in {city}.")?;
            } else {
                print_hotels(&mut out, &hotels)?;
            }
        }
    }
    Ok(())
}

/// Subscribe, wait for the entry to settle, and decode a list payload. An
/// error entry becomes an `Err` with the classified message.
pub async fn fetch_list<T: serde::de::DeserializeOwned>(
    ctx: &AppContext,
    key: QueryKey,
) -> anyhow::Result<Vec<T>> {
    let mut sub = ctx.cache.subscribe(key);
    let entry = sub.ready().await;
    match entry.status {
        QueryStatus::Error(message) => anyhow::bail!("{message}"),
        _ => Ok(entry.decode().unwrap_or_default()),
    }
}

fn print_hotels(out: &mut impl Write, hotels: &[Hotel]) -> io::Result<()> {
    if hotels.is_empty() {
        return writeln!(out, "No hotels found.");
    }
    writeln!(out, "{:<6} {:<30} {:<18} {:>6}", "ID", "NAME", "CITY", "RATING")?;
    for hotel in hotels {
        writeln!(
            out,
            "{:<6} {:<30} {:<18} {:>6.1}",
            hotel.id, hotel.name, hotel.city, hotel.rating
        )?;
    }
    Ok(())
}

fn print_hotel(out: &mut impl Write, hotel: &Hotel) -> io::Result<()> {
    writeln!(out, "{} (#{})", hotel.name, hotel.id)?;
    writeln!(out, "  {}, {}", hotel.address, hotel.city)?;
    if !hotel.description.is_empty() {
        writeln!(out, "  {}", hotel.description)?;
    }
    if let Some(phone) = &hotel.phone {
        writeln!(out, "  Phone: {phone}")?;
    }
    if !hotel.amenities.is_empty() {
        writeln!(out, "  Amenities: {}", hotel.amenities.join(", "))?;
    }
    writeln!(out, "  Rating: {:.1}", hotel.rating)?;
    Ok(())
}

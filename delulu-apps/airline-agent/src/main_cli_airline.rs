//!  Delulu Airline Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! CLI for the airline customer service desk.
//!
//! State lives in memory for the duration of one command, so `book` runs the
//! whole booking (and optional rebooking) scenario in a single invocation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use delulu_airline_agent::{AirlineDesk, Date, Flight, Itinerary, SeedData};
use std::cmp::max;
use std::path::PathBuf;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "delulu-airline")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Seed file with users and flights (JSON). Defaults to the built-in reference set.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List flights for a route and day, marking the best pick
    Flights {
        /// Origin airport code (e.g., SFO)
        #[arg(short, long)]
        from: String,

        /// Destination airport code (e.g., JFK)
        #[arg(short, long)]
        to: String,

        /// Departure date (YYYY-MM-DD or YYYY/MM/DD)
        #[arg(short, long)]
        date: String,
    },

    /// Show a user profile
    User {
        /// Display name, exact match (e.g., Adam)
        #[arg(short, long)]
        name: String,
    },

    /// Book the best flight for a user, optionally rebooking onto another flight
    Book {
        /// Display name of the traveller
        #[arg(short, long)]
        name: String,

        /// Origin airport code (e.g., SFO)
        #[arg(short, long)]
        from: String,

        /// Destination airport code (e.g., JFK)
        #[arg(short, long)]
        to: String,

        /// Departure date (YYYY-MM-DD or YYYY/MM/DD)
        #[arg(short, long)]
        date: String,

        /// Cancel the new booking and book this flight id instead (e.g., DA125)
        #[arg(long)]
        rebook_to: Option<String>,
    },

    /// File a support ticket for a human agent
    Ticket {
        /// Display name of the requester
        #[arg(short, long)]
        name: String,

        /// Free-text request
        #[arg(short, long)]
        request: String,
    },
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse date string to a query date (hour 0)
fn parse_date(s: &str) -> Result<Date> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .context(format!(
            "Invalid date format: {}. Use YYYY-MM-DD or YYYY/MM/DD",
            s
        ))?;
    Ok(Date::from_naive(date, 0))
}

/// Format duration in hours.
fn fmt_duration(hours: u32) -> String {
    format!("{}h", hours)
}

fn fmt_route(flight: &Flight) -> String {
    format!("{} → {}", flight.origin, flight.destination)
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

/// Column widths for flight id, route and departure
fn calc_column_widths(flights: &[&Flight]) -> (usize, usize, usize) {
    let mut max_id = 6;
    let mut max_route = 9;
    let mut max_departs = 16;
    for flight in flights {
        max_id = max(max_id, flight.flight_id.len());
        max_route = max(max_route, fmt_route(flight).chars().count());
        max_departs = max(max_departs, flight.date_time.to_string().len());
    }
    (max_id, max_route, max_departs)
}

/// Render flights to stdout, marking `best` if present
fn render_flights(flights: &[Flight], best: Option<&Flight>) {
    let refs: Vec<&Flight> = flights.iter().collect();
    let (iw, rw, dw) = calc_column_widths(&refs);

    println!("{}", dash_bar());
    println!(
        "  {:>3}  {:<iw$}  {:<rw$}  {:<dw$}  {:>8}  {:>7}",
        "#",
        "FLIGHT",
        "ROUTE",
        "DEPARTS",
        "DURATION",
        "PRICE",
        iw = iw,
        rw = rw,
        dw = dw
    );
    println!("{}", dash_bar());
    for (i, flight) in flights.iter().enumerate() {
        let mark = if best == Some(flight) { "  ★ best" } else { "" };
        println!(
            "  {:>3}  {:<iw$}  {:<rw$}  {:<dw$}  {:>8}  {:>7}{}",
            i + 1,
            flight.flight_id,
            fmt_route(flight),
            flight.date_time.to_string(),
            fmt_duration(flight.duration),
            format!("${}", flight.price),
            mark,
            iw = iw,
            rw = rw,
            dw = dw
        );
    }
}

/// Render booked itineraries to stdout
fn render_itineraries(itineraries: &[Itinerary]) {
    println!("\n🧾 Itineraries on file: {}", itineraries.len());
    println!("{}", dash_bar());
    for itin in itineraries {
        println!(
            "  {}  {:<10}  {}  {}  {}",
            itin.confirmation_number,
            itin.user_profile.name,
            itin.flight.flight_id,
            fmt_route(&itin.flight),
            itin.flight.date_time
        );
    }
}

fn run(desk: &AirlineDesk, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Flights { from, to, date } => {
            let date = parse_date(&date)?;
            let flights = desk
                .fetch_flight_info(&date, &from.to_uppercase(), &to.to_uppercase())
                .context("Flight lookup failed")?;
            let best = desk.pick_flight(&flights)?;
            println!(
                "🛫  {} → {} on {:04}-{:02}-{:02}: {} flight(s)",
                from.to_uppercase(),
                to.to_uppercase(),
                date.year,
                date.month,
                date.day,
                flights.len()
            );
            render_flights(&flights, Some(&best));
        }
        CliCommand::User { name } => match desk.get_user_info(&name) {
            Some(user) => println!("👤 {} (id {}) <{}>", user.name, user.user_id, user.email),
            None => println!("👤 {}: not found", name),
        },
        CliCommand::Book {
            name,
            from,
            to,
            date,
            rebook_to,
        } => {
            let user = desk
                .get_user_info(&name)
                .with_context(|| format!("Unknown user: {}", name))?;
            let date = parse_date(&date)?;
            let flights = desk
                .fetch_flight_info(&date, &from.to_uppercase(), &to.to_uppercase())
                .context("Flight lookup failed")?;
            let best = desk.pick_flight(&flights)?;
            let (confirmation_number, itinerary) = desk.book_flight(&best, &user)?;
            println!(
                "✅ Booked {} for {}: confirmation number {}",
                itinerary.flight.flight_id, user.name, confirmation_number
            );

            if let Some(flight_id) = rebook_to {
                let flight = desk
                    .flight_by_id(&flight_id)
                    .with_context(|| format!("Unknown flight id: {}", flight_id))?;
                desk.cancel_itinerary(&confirmation_number, &user)?;
                let (new_number, _) = desk.book_flight(&flight, &user)?;
                println!(
                    "🔁 Rebooked {} onto {}: {} cancelled, new confirmation number {}",
                    user.name, flight.flight_id, confirmation_number, new_number
                );
            }

            render_itineraries(&desk.list_itineraries());
        }
        CliCommand::Ticket { name, request } => {
            let user = desk
                .get_user_info(&name)
                .with_context(|| format!("Unknown user: {}", name))?;
            let ticket_id = desk.file_ticket(&request, &user)?;
            println!("🎫 Ticket {} filed for {}", ticket_id, user.name);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);
    tracing::debug!("Args: {:?}", args);

    let seed = SeedData::load(args.seed.as_deref()).context("Failed to load seed data")?;
    let desk = AirlineDesk::new(seed)?;
    run(&desk, args.command)
}

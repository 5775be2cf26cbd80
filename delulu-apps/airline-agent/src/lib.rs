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

// Library for delulu-airline-agent
// Airline customer service core: flights, itineraries, users, support tickets

mod desk;
mod entities;
mod error;
mod flight_catalog;
mod flight_selection;
mod reservations;
mod seed;
mod tickets;
mod user_directory;

pub use desk::AirlineDesk;
pub use entities::{Date, Flight, Itinerary, Ticket, UserProfile};
pub use error::{AirlineError, AirlineResult};
pub use flight_catalog::FlightCatalog;
pub use flight_selection::pick_flight;
pub use reservations::{CONFIRMATION_NUMBER_LENGTH, ReservationStore};
pub use seed::SeedData;
pub use tickets::{TICKET_ID_LENGTH, TicketStore};
pub use user_directory::UserDirectory;

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

//! # Airline Desk
//!
//! Owns the read-only catalog and directory plus the two mutable stores, and
//! exposes the operations a customer-service caller chains together:
//! look up flights, pick one, book it for a resolved user, then fetch or
//! cancel the itinerary, or hand the request over with a ticket.
//!
//! The desk is `Sync`: share it behind an `Arc` between concurrent callers.

use crate::entities::{Date, Flight, Itinerary, Ticket, UserProfile};
use crate::error::{AirlineError, AirlineResult};
use crate::flight_catalog::FlightCatalog;
use crate::flight_selection;
use crate::reservations::ReservationStore;
use crate::seed::SeedData;
use crate::tickets::TicketStore;
use crate::user_directory::UserDirectory;
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct AirlineDesk {
    catalog: FlightCatalog,
    directory: UserDirectory,
    reservations: ReservationStore,
    tickets: TicketStore,
}

impl AirlineDesk {
    pub fn new(seed: SeedData) -> Result<Self> {
        let catalog = FlightCatalog::new(seed.flights).context("Invalid flight seed")?;
        let directory = UserDirectory::new(seed.users).context("Invalid user seed")?;
        tracing::info!(
            "Airline desk ready: {} flights, {} users",
            catalog.len(),
            directory.users().len()
        );
        Ok(Self {
            catalog,
            directory,
            reservations: ReservationStore::new(),
            tickets: TicketStore::new(),
        })
    }

    pub fn with_reference_seed() -> Result<Self> {
        Self::new(SeedData::reference()?)
    }

    pub fn fetch_flight_info(
        &self,
        date: &Date,
        origin: &str,
        destination: &str,
    ) -> AirlineResult<Vec<Flight>> {
        self.catalog.fetch_flight_info(date, origin, destination)
    }

    pub fn pick_flight(&self, flights: &[Flight]) -> AirlineResult<Flight> {
        flight_selection::pick_flight(flights)
    }

    pub fn book_flight(
        &self,
        flight: &Flight,
        user: &UserProfile,
    ) -> AirlineResult<(String, Itinerary)> {
        self.reservations.book_flight(flight, user)
    }

    pub fn fetch_itinerary(&self, confirmation_number: &str) -> Option<Itinerary> {
        self.reservations.fetch_itinerary(confirmation_number)
    }

    pub fn cancel_itinerary(
        &self,
        confirmation_number: &str,
        user: &UserProfile,
    ) -> AirlineResult<Itinerary> {
        self.reservations.cancel_itinerary(confirmation_number, user)
    }

    pub fn get_user_info(&self, name: &str) -> Option<UserProfile> {
        self.directory.get_user_info(name)
    }

    pub fn file_ticket(&self, user_request: &str, user: &UserProfile) -> AirlineResult<String> {
        self.tickets.file_ticket(user_request, user)
    }

    pub fn flight_by_id(&self, flight_id: &str) -> Option<Flight> {
        self.catalog.flight_by_id(flight_id).cloned()
    }

    /// The catalog record for `flight.flight_id`, which must equal `flight` field for field.
    pub fn resolve_flight(&self, flight: &Flight) -> AirlineResult<Flight> {
        let Some(stored) = self.catalog.flight_by_id(&flight.flight_id) else {
            tracing::warn!("[resolve_flight] unknown flight id {}", flight.flight_id);
            return Err(AirlineError::NotFound(format!(
                "Unknown flight id: {}",
                flight.flight_id
            )));
        };
        if stored != flight {
            tracing::warn!("[resolve_flight] {} differs from the catalog", flight.flight_id);
            return Err(AirlineError::InvalidArgument(format!(
                "Flight {} does not match the catalog record",
                flight.flight_id
            )));
        }
        Ok(stored.clone())
    }

    /// The directory record for `user.user_id`, which must equal `user` field for field.
    pub fn resolve_user(&self, user: &UserProfile) -> AirlineResult<UserProfile> {
        let Some(stored) = self.directory.user_by_id(&user.user_id) else {
            tracing::warn!("[resolve_user] unknown user id {}", user.user_id);
            return Err(AirlineError::NotFound(format!(
                "Unknown user id: {}",
                user.user_id
            )));
        };
        if stored != user {
            tracing::warn!(
                "[resolve_user] profile for user id {} differs from the directory",
                user.user_id
            );
            return Err(AirlineError::InvalidArgument(format!(
                "User profile for id {} does not match the directory record",
                user.user_id
            )));
        }
        Ok(stored.clone())
    }

    pub fn list_itineraries(&self) -> Vec<Itinerary> {
        self.reservations.itineraries()
    }

    pub fn list_tickets(&self) -> Vec<Ticket> {
        self.tickets.tickets()
    }

    pub fn catalog(&self) -> &FlightCatalog {
        &self.catalog
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }
}

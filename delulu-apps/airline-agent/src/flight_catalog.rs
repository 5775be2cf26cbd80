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

//! # Flight Catalog
//!
//! Read-only collection of seeded flights with lookup by day and route.

use crate::entities::{Date, Flight};
use crate::error::{AirlineError, AirlineResult};
use anyhow::{Result, bail};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct FlightCatalog {
    flights: Vec<Flight>,
}

impl FlightCatalog {
    /// Build a catalog, keeping insertion order. Flight ids must be unique.
    pub fn new(flights: Vec<Flight>) -> Result<Self> {
        let mut seen = HashSet::new();
        for flight in &flights {
            flight.validate()?;
            if !seen.insert(flight.flight_id.as_str()) {
                bail!("Duplicate flight id in catalog: {}", flight.flight_id);
            }
        }
        Ok(Self { flights })
    }

    /// All flights leaving `origin` for `destination` on the day of `date`.
    ///
    /// The hour of `date` is ignored and airport codes are compared exactly.
    /// Results keep catalog order. An empty match is a `NotFound` error.
    pub fn fetch_flight_info(
        &self,
        date: &Date,
        origin: &str,
        destination: &str,
    ) -> AirlineResult<Vec<Flight>> {
        let flights: Vec<Flight> = self
            .flights
            .iter()
            .filter(|f| {
                f.date_time.same_day(date) && f.origin == origin && f.destination == destination
            })
            .cloned()
            .collect();

        tracing::debug!(
            "[fetch_flight_info] {} -> {} on {:04}-{:02}-{:02}: {} match(es)",
            origin,
            destination,
            date.year,
            date.month,
            date.day,
            flights.len()
        );

        if flights.is_empty() {
            return Err(AirlineError::NotFound("No matching flight found!".into()));
        }
        Ok(flights)
    }

    pub fn flight_by_id(&self, flight_id: &str) -> Option<&Flight> {
        self.flights.iter().find(|f| f.flight_id == flight_id)
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

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

//! # Reservation Store
//!
//! Itineraries keyed by confirmation number. Booking and cancellation are the
//! only mutations; an itinerary goes from booked straight back to nonexistent.

use crate::entities::{Flight, Itinerary, UserProfile};
use crate::error::{AirlineError, AirlineResult};
use delulu_id_registry::{IdRegistry, Removal};

pub const CONFIRMATION_NUMBER_LENGTH: usize = 8;

#[derive(Debug)]
pub struct ReservationStore {
    itineraries: IdRegistry<Itinerary>,
}

impl Default for ReservationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationStore {
    pub fn new() -> Self {
        Self {
            itineraries: IdRegistry::new(CONFIRMATION_NUMBER_LENGTH),
        }
    }

    /// Book `flight` for `user` under a fresh confirmation number.
    ///
    /// No availability or double-booking rules apply: the same user may hold
    /// several itineraries on the same flight.
    pub fn book_flight(
        &self,
        flight: &Flight,
        user: &UserProfile,
    ) -> AirlineResult<(String, Itinerary)> {
        let (confirmation_number, itinerary) =
            self.itineraries.insert_with_fresh_id(|id| Itinerary {
                confirmation_number: id.to_string(),
                user_profile: user.clone(),
                flight: flight.clone(),
            })?;
        tracing::info!(
            "[book_flight] {} booked {} ({} -> {}, {}) as {}",
            user.name,
            flight.flight_id,
            flight.origin,
            flight.destination,
            flight.date_time,
            confirmation_number
        );
        Ok((confirmation_number, itinerary))
    }

    /// Absent is a normal outcome here, not an error.
    pub fn fetch_itinerary(&self, confirmation_number: &str) -> Option<Itinerary> {
        self.itineraries.get(confirmation_number)
    }

    /// Cancel the itinerary, returning the removed record.
    ///
    /// Only the user who owns the itinerary (same `user_id`) may cancel it.
    /// Lookup, ownership check and removal happen under one lock.
    pub fn cancel_itinerary(
        &self,
        confirmation_number: &str,
        user: &UserProfile,
    ) -> AirlineResult<Itinerary> {
        match self.itineraries.remove_if(confirmation_number, |itinerary| {
            itinerary.user_profile.user_id == user.user_id
        }) {
            Removal::Removed(itinerary) => {
                tracing::info!(
                    "[cancel_itinerary] {} cancelled {} on {}",
                    user.name,
                    confirmation_number,
                    itinerary.flight.flight_id
                );
                Ok(itinerary)
            }
            Removal::Missing => Err(AirlineError::NotFound(
                "Cannot find the itinerary, please check your confirmation number.".into(),
            )),
            Removal::Refused(itinerary) => {
                tracing::warn!(
                    "[cancel_itinerary] {} (id {}) tried to cancel {} owned by user id {}",
                    user.name,
                    user.user_id,
                    confirmation_number,
                    itinerary.user_profile.user_id
                );
                Err(AirlineError::Unauthorized(format!(
                    "Itinerary {confirmation_number} does not belong to {}",
                    user.name
                )))
            }
        }
    }

    /// Every booked itinerary, ordered by confirmation number
    pub fn itineraries(&self) -> Vec<Itinerary> {
        self.itineraries
            .snapshot()
            .into_iter()
            .map(|(_, itinerary)| itinerary)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.itineraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }
}

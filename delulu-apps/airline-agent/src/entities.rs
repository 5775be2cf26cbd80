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

//! # Airline Entities
//!
//! Value types shared by the catalog, the directory and both stores.
//! None of them carry behavior beyond comparison and boundary validation.

use anyhow::{Result, ensure};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date and hour, without timezone.
///
/// Fields are plain integers: no calendar normalization happens, and flight
/// lookups compare `year`, `month` and `day` field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Hour of day (0-23). Ignored when matching flights, defaults to 0.
    #[serde(default)]
    pub hour: u32,
}

impl Date {
    pub const fn new(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    pub fn from_naive(date: NaiveDate, hour: u32) -> Self {
        Self::new(date.year(), date.month(), date.day(), hour)
    }

    /// True when both dates fall on the same calendar day, whatever the hour
    pub fn same_day(&self, other: &Date) -> bool {
        self.year == other.year && self.month == other.month && self.day == other.day
    }

    /// Range check for seeded data; queries are never validated.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=12).contains(&self.month),
            "Invalid month {} in {}",
            self.month,
            self
        );
        ensure!(
            (1..=31).contains(&self.day),
            "Invalid day {} in {}",
            self.day,
            self
        );
        ensure!(self.hour <= 23, "Invalid hour {} in {}", self.hour, self);
        Ok(())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:00",
            self.year, self.month, self.day, self.hour
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.user_id.is_empty(), "User id is required");
        ensure!(!self.name.is_empty(), "User name is required");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct Flight {
    pub flight_id: String,
    /// Origin airport code, matched exactly (case-sensitive)
    pub origin: String,
    /// Destination airport code, matched exactly (case-sensitive)
    pub destination: String,
    pub date_time: Date,
    /// Flight duration in hours
    pub duration: u32,
    /// Ticket price in USD
    pub price: u32,
}

impl Flight {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.flight_id.is_empty(), "Flight id is required");
        ensure!(!self.origin.is_empty(), "Origin airport is required");
        ensure!(
            !self.destination.is_empty(),
            "Destination airport is required"
        );
        self.date_time.validate()
    }
}

/// A booking linking one user to one flight.
///
/// Itineraries are never updated in place: changing flights means cancelling
/// and booking again, which issues a new confirmation number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct Itinerary {
    pub confirmation_number: String,
    pub user_profile: UserProfile,
    pub flight: Flight,
}

/// A request handed over to a human agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct Ticket {
    pub ticket_id: String,
    pub user_request: String,
    pub user_profile: UserProfile,
}

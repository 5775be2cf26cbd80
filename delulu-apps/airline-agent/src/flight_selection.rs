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

//! # Flight Selection
//!
//! Side-effect free choice of the best flight among candidates:
//! shortest duration first, cheapest on ties, earliest in input order after that.

use crate::entities::Flight;
use crate::error::{AirlineError, AirlineResult};

pub fn pick_flight(flights: &[Flight]) -> AirlineResult<Flight> {
    // min_by_key keeps the first of equal minima
    let best = flights
        .iter()
        .min_by_key(|f| (f.duration, f.price))
        .ok_or_else(|| {
            AirlineError::InvalidArgument("Cannot pick a flight from an empty list".into())
        })?;
    tracing::debug!(
        "[pick_flight] picked {} ({}h, ${}) out of {} candidate(s)",
        best.flight_id,
        best.duration,
        best.price,
        flights.len()
    );
    Ok(best.clone())
}

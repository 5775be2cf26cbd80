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

//! # Airline Errors
//!
//! Local, non-retryable failures surfaced straight to the caller.

use delulu_id_registry::RegistryError;
use thiserror::Error;

pub type AirlineResult<T> = std::result::Result<T, AirlineError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AirlineError {
    /// No matching flight, an unknown flight or user id, or an unknown
    /// confirmation number on cancellation
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    /// Cancellation attempted by someone other than the itinerary owner
    #[error("{0}")]
    Unauthorized(String),
}

impl AirlineError {
    /// Stable name of the error kind, as reported to tool callers
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::Unauthorized(_) => "Unauthorized",
        }
    }
}

impl From<RegistryError> for AirlineError {
    fn from(e: RegistryError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

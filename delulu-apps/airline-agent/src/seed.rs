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

//! # Seed Data
//!
//! Fixed users and flights loaded once at startup. The reference set is
//! `seed/reference.json`, embedded in the binary; alternative sets are read
//! from JSON files with the same layout.

use crate::entities::{Flight, UserProfile};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub users: Vec<UserProfile>,
    pub flights: Vec<Flight>,
}

const REFERENCE_JSON: &str = include_str!("../seed/reference.json");

impl SeedData {
    /// Four users and four flights (SFO->JFK on 2025-09-01, SFO->SNA on 2025-10-01)
    pub fn reference() -> Result<Self> {
        Self::from_json_str(REFERENCE_JSON).context("In embedded reference seed")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid seed JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {:?}", path))?;
        Self::from_json_str(&content).with_context(|| format!("In seed file {:?}", path))
    }

    /// The seed file at `path` if given, the reference set otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("Loading seed data from {:?}", path);
                Self::from_path(path)
            }
            None => {
                tracing::debug!("Using reference seed data");
                Self::reference()
            }
        }
    }
}

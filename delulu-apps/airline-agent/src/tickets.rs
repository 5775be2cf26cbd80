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

//! # Ticket Store
//!
//! Support tickets handed over to human agents. Tickets are only ever created.

use crate::entities::{Ticket, UserProfile};
use crate::error::AirlineResult;
use delulu_id_registry::IdRegistry;

pub const TICKET_ID_LENGTH: usize = 6;

#[derive(Debug)]
pub struct TicketStore {
    tickets: IdRegistry<Ticket>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStore {
    pub fn new() -> Self {
        Self {
            tickets: IdRegistry::new(TICKET_ID_LENGTH),
        }
    }

    /// File `user_request` on behalf of `user` and return the new ticket id.
    /// The request text is stored as is.
    pub fn file_ticket(&self, user_request: &str, user: &UserProfile) -> AirlineResult<String> {
        let (ticket_id, _) = self.tickets.insert_with_fresh_id(|id| Ticket {
            ticket_id: id.to_string(),
            user_request: user_request.to_string(),
            user_profile: user.clone(),
        })?;
        tracing::info!(
            "[file_ticket] {} filed ticket {} ({} chars)",
            user.name,
            ticket_id,
            user_request.chars().count()
        );
        Ok(ticket_id)
    }

    pub fn ticket(&self, ticket_id: &str) -> Option<Ticket> {
        self.tickets.get(ticket_id)
    }

    /// Every filed ticket, ordered by ticket id
    pub fn tickets(&self) -> Vec<Ticket> {
        self.tickets
            .snapshot()
            .into_iter()
            .map(|(_, ticket)| ticket)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

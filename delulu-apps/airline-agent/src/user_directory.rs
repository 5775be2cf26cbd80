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

//! # User Directory
//!
//! Read-only registry of seeded users, looked up by display name or by id.

use crate::entities::UserProfile;
use anyhow::{Result, bail};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserProfile>,
}

impl UserDirectory {
    /// Build a directory. User ids and display names must both be unique.
    pub fn new(users: Vec<UserProfile>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for user in &users {
            user.validate()?;
            if !ids.insert(user.user_id.as_str()) {
                bail!("Duplicate user id in directory: {}", user.user_id);
            }
            if !names.insert(user.name.as_str()) {
                bail!("Duplicate user name in directory: {}", user.name);
            }
        }
        Ok(Self { users })
    }

    /// Exact, case-sensitive match on the display name. `None` when unknown.
    pub fn get_user_info(&self, name: &str) -> Option<UserProfile> {
        let user = self.users.iter().find(|u| u.name == name).cloned();
        tracing::debug!(
            "[get_user_info] {}: {}",
            name,
            if user.is_some() { "found" } else { "unknown" }
        );
        user
    }

    pub fn user_by_id(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    fn directory() -> UserDirectory {
        UserDirectory::new(SeedData::reference().unwrap().users).unwrap()
    }

    #[test]
    fn test_lookup_by_name() {
        let user = directory().get_user_info("Chelsie").unwrap();
        assert_eq!(user.user_id, "3");
        assert_eq!(user.email, "chelsie@gmail.com");
    }

    #[test]
    fn test_lookup_is_exact() {
        let directory = directory();
        assert!(directory.get_user_info("adam").is_none());
        assert!(directory.get_user_info("Ada").is_none());
        assert!(directory.get_user_info("1").is_none());
        assert!(directory.get_user_info("").is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        let directory = directory();
        assert_eq!(directory.user_by_id("2").map(|u| u.name.as_str()), Some("Bob"));
        assert!(directory.user_by_id("Bob").is_none());
        assert!(directory.user_by_id("999").is_none());
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut users = SeedData::reference().unwrap().users;
        let mut twin = users[0].clone();
        twin.user_id = "99".into();
        users.push(twin);
        assert!(UserDirectory::new(users).is_err());

        let mut users = SeedData::reference().unwrap().users;
        let mut clash = users[0].clone();
        clash.name = "Zoe".into();
        users.push(clash);
        assert!(UserDirectory::new(users).is_err());
    }

    #[test]
    fn test_seed_order_kept() {
        let names: Vec<_> = directory().users().iter().map(|u| u.name.clone()).collect();
        assert_eq!(names, ["Adam", "Bob", "Chelsie", "David"]);
    }
}

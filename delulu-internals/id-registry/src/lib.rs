//! Delulu Id Registry
//! Copyright (c) 2026 Mamy Ratsimbazafy
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! delulu-internals/id-registry
//! Short random alphanumeric identifiers and keyed registries that hand them out
//! without collisions, even under concurrent callers.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;
use thiserror::Error;

/// Characters identifiers are drawn from: lowercase ASCII letters then digits.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Custom error for identifier generation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("identifier length must be at least 1")]
    ZeroLength,
    #[error("all {taken} identifiers of length {length} are already taken")]
    Exhausted { length: usize, taken: usize },
}

/// Number of distinct identifiers of `length` characters, `None` when it overflows `usize`.
pub fn id_space(length: usize) -> Option<usize> {
    u32::try_from(length)
        .ok()
        .and_then(|exp| ALPHABET.len().checked_pow(exp))
}

/// Refuse to draw when no fresh identifier can exist, otherwise rejection sampling never ends.
fn check_capacity<'a, I>(length: usize, existing: I) -> Result<(), RegistryError>
where
    I: ExactSizeIterator<Item = &'a String>,
{
    if length == 0 {
        return Err(RegistryError::ZeroLength);
    }
    let Some(space) = id_space(length) else {
        return Ok(());
    };
    if existing.len() < space {
        return Ok(());
    }
    let taken = existing.filter(|id| id.len() == length).count();
    if taken >= space {
        return Err(RegistryError::Exhausted { length, taken });
    }
    Ok(())
}

fn draw<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn draw_fresh<R, F>(rng: &mut R, length: usize, is_taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    loop {
        let candidate = draw(rng, length);
        if !is_taken(&candidate) {
            return candidate;
        }
        tracing::trace!("[id-registry] collision on {}, redrawing", candidate);
    }
}

/// Generate a `length`-character identifier that is not a member of `existing`.
///
/// Characters are drawn uniformly with replacement from [`ALPHABET`]; a draw that
/// collides with `existing` is thrown away and redrawn.
pub fn generate_id(length: usize, existing: &HashSet<String>) -> Result<String, RegistryError> {
    generate_id_with(&mut rand::thread_rng(), length, existing)
}

/// Same as [`generate_id`] with a caller-provided random source.
pub fn generate_id_with<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    existing: &HashSet<String>,
) -> Result<String, RegistryError> {
    check_capacity(length, existing.iter())?;
    Ok(draw_fresh(rng, length, |candidate| existing.contains(candidate)))
}

/// Result of a conditional removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal<V> {
    Removed(V),
    Missing,
    /// The entry exists but the predicate refused its removal. It is still stored.
    Refused(V),
}

/// In-memory registry keyed by generated identifiers.
///
/// Generating a key and inserting under it happen while holding the same lock,
/// so two concurrent inserts can never claim the same identifier.
///
/// # Examples
///
/// ```
/// use delulu_id_registry::IdRegistry;
///
/// let registry = IdRegistry::new(6);
/// let (id, value) = registry.insert_with_fresh_id(|id| format!("ticket {id}")).unwrap();
/// assert_eq!(id.len(), 6);
/// assert_eq!(registry.get(&id), Some(value));
/// ```
#[derive(Debug)]
pub struct IdRegistry<V> {
    id_length: usize,
    entries: Mutex<BTreeMap<String, V>>,
}

impl<V: Clone> IdRegistry<V> {
    /// Create an empty registry handing out identifiers of `id_length` characters
    pub fn new(id_length: usize) -> Self {
        Self {
            id_length,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn id_length(&self) -> usize {
        self.id_length
    }

    // A panic while holding the lock cannot leave a half-applied insert or remove,
    // so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build a value for a fresh identifier and store it, returning both
    pub fn insert_with_fresh_id<F>(&self, make: F) -> Result<(String, V), RegistryError>
    where
        F: FnOnce(&str) -> V,
    {
        self.insert_with_fresh_id_using(&mut rand::thread_rng(), make)
    }

    /// Same as [`IdRegistry::insert_with_fresh_id`] with a caller-provided random source
    pub fn insert_with_fresh_id_using<R, F>(
        &self,
        rng: &mut R,
        make: F,
    ) -> Result<(String, V), RegistryError>
    where
        R: Rng + ?Sized,
        F: FnOnce(&str) -> V,
    {
        let mut entries = self.lock();
        check_capacity(self.id_length, entries.keys())?;
        let id = draw_fresh(rng, self.id_length, |candidate| {
            entries.contains_key(candidate)
        });
        let value = make(&id);
        entries.insert(id.clone(), value.clone());
        Ok((id, value))
    }

    pub fn get(&self, id: &str) -> Option<V> {
        self.lock().get(id).cloned()
    }

    /// Remove the entry only if `allow` accepts it, in a single critical section
    pub fn remove_if<F>(&self, id: &str, allow: F) -> Removal<V>
    where
        F: FnOnce(&V) -> bool,
    {
        let mut entries = self.lock();
        let Some(value) = entries.get(id) else {
            return Removal::Missing;
        };
        if !allow(value) {
            return Removal::Refused(value.clone());
        }
        match entries.remove(id) {
            Some(value) => Removal::Removed(value),
            None => Removal::Missing,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every entry, ordered by identifier
    pub fn snapshot(&self) -> Vec<(String, V)> {
        self.lock()
            .iter()
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }
}

//! Locally persisted set of favorited employer ids.
//!
//! Favorites are independent of search: an id stays favorited whether or not
//! the employer appears in the current results, and the search pipeline never
//! consults this store. The presentation layer applies
//! [`FavoritesStore::retain_favorites`] when a "favorites only" view is on.
//!
//! The file-backed store keeps the set as a JSON array of ids and rewrites
//! the whole file on every change (temp file + rename). Persistence failures
//! are logged; the in-memory set stays authoritative for the process.

use crate::employer::{Employer, EmployerId};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of favorited employer ids.
///
/// All operations are synchronous. A mutex serializes mutations, so each
/// `toggle` or `clear` (including its file write) is atomic with respect to
/// the others. Share one instance per process behind an `Arc`.
///
/// ```
/// use employer_search::FavoritesStore;
///
/// let favorites = FavoritesStore::in_memory();
/// assert!(favorites.toggle(45456));
/// assert!(favorites.is_favorite(45456));
/// assert!(!favorites.toggle(45456));
/// assert!(favorites.all_favorite_ids().is_empty());
/// ```
#[derive(Debug)]
pub struct FavoritesStore {
    ids: Mutex<BTreeSet<EmployerId>>,
    path: Option<PathBuf>,
}

impl FavoritesStore {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        FavoritesStore {
            ids: Mutex::new(BTreeSet::new()),
            path: None,
        }
    }

    /// Store persisted at `path`.
    ///
    /// A missing file starts an empty set. An unreadable or malformed file
    /// also starts empty (logged) and is replaced on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = load_ids(&path);
        debug!("Loaded {} favorites from {}", ids.len(), path.display());

        FavoritesStore {
            ids: Mutex::new(ids),
            path: Some(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<EmployerId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip the favorite state of `id`. Returns `true` if it is now a favorite.
    pub fn toggle(&self, id: EmployerId) -> bool {
        let mut ids = self.lock();
        let now_favorite = if ids.remove(&id) {
            false
        } else {
            ids.insert(id);
            true
        };
        self.persist(&ids);

        debug!("Favorite {} -> {}", id, now_favorite);
        now_favorite
    }

    pub fn is_favorite(&self, id: EmployerId) -> bool {
        self.lock().contains(&id)
    }

    /// Snapshot of every favorited id.
    pub fn all_favorite_ids(&self) -> HashSet<EmployerId> {
        self.lock().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every favorite, including the persisted file.
    ///
    /// If the file cannot be removed the set is left untouched, so memory
    /// and disk never disagree about what is favorited.
    pub fn clear(&self) {
        let mut ids = self.lock();

        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Failed to remove favorites file {}: {}", path.display(), e);
                    return;
                }
            }
        }

        ids.clear();
    }

    /// Keep only favorited employers, preserving order.
    pub fn retain_favorites(&self, employers: Vec<Employer>) -> Vec<Employer> {
        let ids = self.lock();
        employers
            .into_iter()
            .filter(|e| ids.contains(&e.id))
            .collect()
    }

    fn persist(&self, ids: &BTreeSet<EmployerId>) {
        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = write_ids(path, ids) {
            warn!("Failed to persist favorites to {}: {}", path.display(), e);
        }
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn load_ids(path: &Path) -> BTreeSet<EmployerId> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return BTreeSet::new(),
        Err(e) => {
            warn!("Failed to read favorites file {}: {}", path.display(), e);
            return BTreeSet::new();
        }
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        warn!("Ignoring malformed favorites file {}: {}", path.display(), e);
        BTreeSet::new()
    })
}

fn write_ids(path: &Path, ids: &BTreeSet<EmployerId>) -> crate::error::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec(ids)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

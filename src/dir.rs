//! The flat namespace: an append-only log of directory entries.

use alloc::{string::String, vec::Vec};

/// One record in the directory log.
pub struct DirEntry {
    pub name: String,
    pub ino: usize,
    /// Cleared by unlink. Stale entries stay behind as tombstones.
    pub valid: bool,
}

/// Single flat directory.
///
/// Entries are never physically removed, only invalidated, so the log
/// doubles as the insertion-order history of the namespace. At most one
/// valid entry exists per name.
pub struct Directory {
    entries: Vec<DirEntry>,
}

impl Directory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Find the inode number behind a live name.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.valid && e.name == name)
            .map(|e| e.ino)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Append a live entry for `name`. The caller has already checked that
    /// no valid entry with this name exists.
    pub fn insert(&mut self, name: &str, ino: usize) {
        self.entries.push(DirEntry {
            name: String::from(name),
            ino,
            valid: true,
        });
    }

    /// Tombstone the live entry for `name`, returning its inode number.
    pub fn remove(&mut self, name: &str) -> Option<usize> {
        let entry = self.entries.iter_mut().find(|e| e.valid && e.name == name)?;
        entry.valid = false;
        Some(entry.ino)
    }

    /// Live entries in insertion order.
    pub fn live_entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .filter(|e| e.valid)
            .map(|e| (e.name.as_str(), e.ino))
    }
}

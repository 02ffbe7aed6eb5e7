//! Bounded table of open-file handles.

use alloc::{vec, vec::Vec};

/// An open file: an inode reference plus an independent cursor.
#[derive(Debug, Clone, Copy)]
pub struct OpenFile {
    pub ino: usize,
    pub offset: usize,
}

/// Fixed-capacity slot table. Opening a file claims the lowest free slot;
/// the slot index is the handle handed to the caller.
pub struct OpenFileTable {
    slots: Vec<Option<OpenFile>>,
}

impl OpenFileTable {
    pub fn new(max_open: usize) -> Self {
        Self {
            slots: vec![None; max_open],
        }
    }

    /// Install a handle with offset zero in the lowest free slot, if any.
    pub fn insert(&mut self, ino: usize) -> Option<usize> {
        let slot = self.slots.iter().position(Option::is_none)?;
        self.slots[slot] = Some(OpenFile { ino, offset: 0 });
        Some(slot)
    }

    pub fn get_mut(&mut self, fd: usize) -> Option<&mut OpenFile> {
        self.slots.get_mut(fd)?.as_mut()
    }

    /// Vacate a slot, returning the handle that occupied it.
    pub fn remove(&mut self, fd: usize) -> Option<OpenFile> {
        self.slots.get_mut(fd)?.take()
    }

    /// Number of occupied slots.
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

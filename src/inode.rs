//! Inode records and the inode table arena.

use alloc::collections::BTreeMap;

use crate::{block::BlockId, common::FlatfsFileType};

/// File metadata plus the sparse logical-to-physical block map.
///
/// Lifetime is governed by two independent counters: the inode is removed
/// from the table exactly when `hard_links` and `open_count` are both zero.
pub struct Inode {
    pub kind: FlatfsFileType,
    pub hard_links: u32,
    pub open_count: u32,
    /// File size in bytes. Logical indices absent from `blocks` but below
    /// the size are holes and read back as zeroes.
    pub size: usize,
    /// logical block index -> physical block id
    pub blocks: BTreeMap<usize, BlockId>,
}

impl Inode {
    /// True once no directory entry and no open handle references the inode.
    pub fn is_orphaned(&self) -> bool {
        self.hard_links == 0 && self.open_count == 0
    }
}

/// Arena of inodes keyed by monotonically assigned numbers.
pub struct InodeTable {
    map: BTreeMap<usize, Inode>,
    next_ino: usize,
}

impl InodeTable {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            next_ino: 1,
        }
    }

    /// Allocate a fresh empty inode and return its number. The inode is
    /// born with one hard link, the directory entry that creates it.
    pub fn alloc(&mut self, kind: FlatfsFileType) -> usize {
        let ino = self.next_ino;
        self.next_ino += 1;
        self.map.insert(
            ino,
            Inode {
                kind,
                hard_links: 1,
                open_count: 0,
                size: 0,
                blocks: BTreeMap::new(),
            },
        );
        ino
    }

    pub fn get(&self, ino: usize) -> Option<&Inode> {
        self.map.get(&ino)
    }

    pub fn get_mut(&mut self, ino: usize) -> Option<&mut Inode> {
        self.map.get_mut(&ino)
    }

    /// Drop the table entry, handing the inode back to the caller so its
    /// blocks can be released.
    pub fn remove(&mut self, ino: usize) -> Option<Inode> {
        self.map.remove(&ino)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

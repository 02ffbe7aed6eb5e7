//! Flat pool of fixed-size data blocks with a free list.

use alloc::{vec, vec::Vec};

use log::debug;

/// Physical block id inside the pool.
pub type BlockId = usize;

/// Fixed-size block pool.
///
/// Blocks are handed out zero-filled. Freed ids land on a LIFO free list
/// and are recycled before any fresh id is appended.
pub struct BlockStore {
    block_size: usize,
    blocks: Vec<Vec<u8>>,
    free: Vec<BlockId>,
}

impl BlockStore {
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            blocks: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total number of block ids handed out so far, free or not.
    pub fn total(&self) -> usize {
        self.blocks.len()
    }

    /// Number of ids currently on the free list.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Allocate a zero-filled block, reusing a freed id when one exists.
    pub fn alloc(&mut self) -> BlockId {
        match self.free.pop() {
            Some(id) => {
                debug!("block: reuse id {}", id);
                id
            }
            None => {
                self.blocks.push(vec![0u8; self.block_size]);
                self.blocks.len() - 1
            }
        }
    }

    /// Return a block to the free list. The block is zeroed here, so
    /// `alloc` only ever hands out clean blocks.
    pub fn free(&mut self, id: BlockId) {
        self.blocks[id].fill(0);
        self.free.push(id);
    }

    pub fn data(&self, id: BlockId) -> &[u8] {
        &self.blocks[id]
    }

    pub fn data_mut(&mut self, id: BlockId) -> &mut [u8] {
        &mut self.blocks[id]
    }
}

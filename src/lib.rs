#![cfg_attr(not(test), no_std)]
extern crate alloc;

mod block;
mod common;
mod dir;
mod fs;
mod handle;
mod inode;


pub use common::{FlatfsAttr, FlatfsError, FlatfsFileType, FlatfsResult, FlatfsStat};
pub use fs::{FlatFs, FlatfsConfig};

/// Default size of a data block, in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 128;

/// Default upper bound on a file name, in characters.
pub const DEFAULT_NAME_LIMIT: usize = 16;

/// Default number of simultaneously open file handles.
pub const DEFAULT_MAX_OPEN: usize = 4;

//! Shared types: the error enum, file kinds and attribute records.

use onlyerror::Error;

/// Errors reported by filesystem operations.
///
/// Every failure is local and recoverable. A failed operation leaves the
/// filesystem exactly as it found it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FlatfsError {
    /// file not found
    NotFound,
    /// file already exists
    AlreadyExists,
    /// file name too long
    NameTooLong,
    /// too many open files
    TooManyOpen,
    /// bad file handle
    BadHandle,
    /// invalid offset
    InvalidOffset,
    /// invalid size
    InvalidSize,
}

pub type FlatfsResult<T> = Result<T, FlatfsError>;

/// Kind of object an inode describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatfsFileType {
    RegularFile,
}

/// Attributes reported by [`crate::FlatFs::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatfsAttr {
    pub ino: usize,
    pub kind: FlatfsFileType,
    pub hard_links: u32,
    pub size: usize,
    /// Data blocks currently mapped; holes are not counted.
    pub blocks: usize,
}

/// Filesystem-wide counters reported by [`crate::FlatFs::statfs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatfsStat {
    pub block_size: usize,
    /// Block ids handed out so far, free or not.
    pub total_blocks: usize,
    pub free_blocks: usize,
    pub total_inodes: usize,
    pub open_files: usize,
    pub name_max: usize,
    pub max_open: usize,
}

//! The filesystem facade tying directory, inode table, block pool and the
//! open-file table together.
//!
//! Every public operation resolves a name or handle, mutates the inner
//! state under one lock acquisition, and hands out only names and handle
//! indices. Checks run before any mutation, so a failed call leaves the
//! filesystem untouched.

use alloc::{string::String, vec::Vec};
use core::cmp::min;

use log::debug;
use spin::Mutex;

use crate::{
    block::BlockStore,
    common::{FlatfsAttr, FlatfsError, FlatfsFileType, FlatfsResult, FlatfsStat},
    dir::Directory,
    handle::OpenFileTable,
    inode::{Inode, InodeTable},
    DEFAULT_BLOCK_SIZE, DEFAULT_MAX_OPEN, DEFAULT_NAME_LIMIT,
};

/// Construction-time tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct FlatfsConfig {
    pub block_size: usize,
    pub name_limit: usize,
    pub max_open: usize,
}

impl Default for FlatfsConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            name_limit: DEFAULT_NAME_LIMIT,
            max_open: DEFAULT_MAX_OPEN,
        }
    }
}

struct FsInner {
    dir: Directory,
    inodes: InodeTable,
    blocks: BlockStore,
    handles: OpenFileTable,
}

impl FsInner {
    fn resolve(&self, name: &str) -> FlatfsResult<usize> {
        self.dir.lookup(name).ok_or(FlatfsError::NotFound)
    }

    /// Destroy the inode once both reference counts are zero, returning all
    /// of its blocks to the pool.
    fn reap(&mut self, ino: usize) {
        if !self.inodes.get(ino).map_or(false, Inode::is_orphaned) {
            return;
        }
        if let Some(inode) = self.inodes.remove(ino) {
            for (_, block) in inode.blocks {
                self.blocks.free(block);
            }
            debug!("reap ino {}", ino);
        }
    }
}

/// In-memory filesystem with a single flat namespace.
///
/// Single logical actor: operations are synchronous, non-blocking, and each
/// one is an atomic in-memory step guarded by one lock.
pub struct FlatFs {
    config: FlatfsConfig,
    inner: Mutex<FsInner>,
}

impl Default for FlatFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatFs {
    pub fn new() -> Self {
        Self::with_config(FlatfsConfig::default())
    }

    pub fn with_config(config: FlatfsConfig) -> Self {
        FlatFs {
            config,
            inner: Mutex::new(FsInner {
                dir: Directory::new(),
                inodes: InodeTable::new(),
                blocks: BlockStore::new(config.block_size),
                handles: OpenFileTable::new(config.max_open),
            }),
        }
    }

    pub fn config(&self) -> FlatfsConfig {
        self.config
    }

    /// Create an empty regular file under `name`.
    pub fn create(&self, name: &str) -> FlatfsResult<()> {
        if name.chars().count() > self.config.name_limit {
            return Err(FlatfsError::NameTooLong);
        }
        let mut fs = self.inner.lock();
        if fs.dir.contains(name) {
            return Err(FlatfsError::AlreadyExists);
        }
        let ino = fs.inodes.alloc(FlatfsFileType::RegularFile);
        fs.dir.insert(name, ino);
        debug!("create {:?} -> ino {}", name, ino);
        Ok(())
    }

    /// Attributes of the inode currently behind `name`.
    pub fn stat(&self, name: &str) -> FlatfsResult<FlatfsAttr> {
        let fs = self.inner.lock();
        let ino = fs.resolve(name)?;
        let inode = fs.inodes.get(ino).ok_or(FlatfsError::NotFound)?;
        Ok(FlatfsAttr {
            ino,
            kind: inode.kind,
            hard_links: inode.hard_links,
            size: inode.size,
            blocks: inode.blocks.len(),
        })
    }

    /// Live directory entries in insertion order.
    pub fn list(&self) -> Vec<(String, usize)> {
        let fs = self.inner.lock();
        fs.dir
            .live_entries()
            .map(|(name, ino)| (String::from(name), ino))
            .collect()
    }

    /// Open `name` and return the handle index, the lowest free slot.
    pub fn open(&self, name: &str) -> FlatfsResult<usize> {
        let mut fs = self.inner.lock();
        let ino = fs.resolve(name)?;
        let fd = fs
            .handles
            .insert(ino)
            .ok_or(FlatfsError::TooManyOpen)?;
        if let Some(inode) = fs.inodes.get_mut(ino) {
            inode.open_count += 1;
        }
        debug!("open {:?} -> fd {} (ino {})", name, fd, ino);
        Ok(fd)
    }

    /// Release a handle. If the last name was already unlinked, this is the
    /// point where the inode is destroyed.
    pub fn close(&self, fd: usize) -> FlatfsResult<()> {
        let mut fs = self.inner.lock();
        let handle = fs.handles.remove(fd).ok_or(FlatfsError::BadHandle)?;
        if let Some(inode) = fs.inodes.get_mut(handle.ino) {
            inode.open_count -= 1;
        }
        fs.reap(handle.ino);
        debug!("close fd {} (ino {})", fd, handle.ino);
        Ok(())
    }

    /// Move the handle's cursor. Seeking past end of file is legal: reads
    /// there come up empty and writes extend the file.
    pub fn seek(&self, fd: usize, offset: i64) -> FlatfsResult<()> {
        let mut fs = self.inner.lock();
        let handle = fs.handles.get_mut(fd).ok_or(FlatfsError::BadHandle)?;
        if offset < 0 {
            return Err(FlatfsError::InvalidOffset);
        }
        handle.offset = offset as usize;
        Ok(())
    }

    /// Read up to `len` bytes from the handle's cursor.
    ///
    /// Stops early at end of file (a short read, never an error); holes
    /// read back as zeroes. Only the cursor is advanced.
    pub fn read(&self, fd: usize, len: usize) -> FlatfsResult<Vec<u8>> {
        let mut fs = self.inner.lock();
        let fs = &mut *fs;
        let handle = fs.handles.get_mut(fd).ok_or(FlatfsError::BadHandle)?;
        let inode = fs.inodes.get(handle.ino).ok_or(FlatfsError::BadHandle)?;
        let block_size = fs.blocks.block_size();

        let mut buf = Vec::with_capacity(len);
        while buf.len() < len && handle.offset < inode.size {
            let index = handle.offset / block_size;
            let rel = handle.offset % block_size;
            let span = min(
                len - buf.len(),
                min(block_size - rel, inode.size - handle.offset),
            );
            match inode.blocks.get(&index) {
                Some(&block) => buf.extend_from_slice(&fs.blocks.data(block)[rel..rel + span]),
                // hole: logical zeroes, the pool is not touched
                None => buf.resize(buf.len() + span, 0),
            }
            handle.offset += span;
        }
        Ok(buf)
    }

    /// Write all of `buf` at the handle's cursor, allocating blocks on
    /// demand. Writes are never partial; the file grows as needed.
    pub fn write(&self, fd: usize, buf: &[u8]) -> FlatfsResult<usize> {
        let mut fs = self.inner.lock();
        let fs = &mut *fs;
        let handle = fs.handles.get_mut(fd).ok_or(FlatfsError::BadHandle)?;
        let inode = fs
            .inodes
            .get_mut(handle.ino)
            .ok_or(FlatfsError::BadHandle)?;
        let block_size = fs.blocks.block_size();

        let mut written = 0;
        while written < buf.len() {
            let index = handle.offset / block_size;
            let rel = handle.offset % block_size;
            let span = min(buf.len() - written, block_size - rel);
            let block = match inode.blocks.get(&index) {
                Some(&block) => block,
                None => {
                    let block = fs.blocks.alloc();
                    inode.blocks.insert(index, block);
                    block
                }
            };
            fs.blocks.data_mut(block)[rel..rel + span]
                .copy_from_slice(&buf[written..written + span]);
            written += span;
            handle.offset += span;
        }
        if handle.offset > inode.size {
            inode.size = handle.offset;
        }
        debug!("write fd {}: {} bytes, size now {}", fd, written, inode.size);
        Ok(written)
    }

    /// Add `new_name` as another hard link to the inode behind `existing`.
    pub fn link(&self, existing: &str, new_name: &str) -> FlatfsResult<()> {
        let mut fs = self.inner.lock();
        let ino = fs.resolve(existing)?;
        if fs.dir.contains(new_name) {
            return Err(FlatfsError::AlreadyExists);
        }
        if let Some(inode) = fs.inodes.get_mut(ino) {
            inode.hard_links += 1;
        }
        fs.dir.insert(new_name, ino);
        debug!("link {:?} -> {:?} (ino {})", new_name, existing, ino);
        Ok(())
    }

    /// Drop a name from the namespace. The inode survives while another
    /// link or an open handle still references it.
    pub fn unlink(&self, name: &str) -> FlatfsResult<()> {
        let mut fs = self.inner.lock();
        let ino = fs.dir.remove(name).ok_or(FlatfsError::NotFound)?;
        if let Some(inode) = fs.inodes.get_mut(ino) {
            inode.hard_links -= 1;
        }
        fs.reap(ino);
        debug!("unlink {:?} (ino {})", name, ino);
        Ok(())
    }

    /// Resize the file. Shrinking frees every block that lies entirely
    /// beyond the new size and zeroes the kept tail of the boundary block,
    /// so growing back later reads holes, not stale bytes. Growing only
    /// moves the size; no blocks are allocated.
    pub fn truncate(&self, name: &str, new_size: i64) -> FlatfsResult<()> {
        let mut fs = self.inner.lock();
        let fs = &mut *fs;
        let ino = fs.dir.lookup(name).ok_or(FlatfsError::NotFound)?;
        if new_size < 0 {
            return Err(FlatfsError::InvalidSize);
        }
        let new_size = new_size as usize;
        let block_size = fs.blocks.block_size();
        let inode = fs.inodes.get_mut(ino).ok_or(FlatfsError::NotFound)?;

        if new_size < inode.size {
            // first logical index lying entirely at or beyond the new size
            let first_dead = (new_size + block_size - 1) / block_size;
            let dead: Vec<usize> = inode.blocks.range(first_dead..).map(|(&i, _)| i).collect();
            for index in dead {
                if let Some(block) = inode.blocks.remove(&index) {
                    fs.blocks.free(block);
                }
            }
            let rel = new_size % block_size;
            if rel != 0 {
                if let Some(&block) = inode.blocks.get(&(new_size / block_size)) {
                    fs.blocks.data_mut(block)[rel..].fill(0);
                }
            }
            debug!("truncate {:?}: {} -> {} bytes", name, inode.size, new_size);
        }
        inode.size = new_size;
        Ok(())
    }

    /// Filesystem-wide counters.
    pub fn statfs(&self) -> FlatfsStat {
        let fs = self.inner.lock();
        FlatfsStat {
            block_size: self.config.block_size,
            total_blocks: fs.blocks.total(),
            free_blocks: fs.blocks.free_count(),
            total_inodes: fs.inodes.len(),
            open_files: fs.handles.open_count(),
            name_max: self.config.name_limit,
            max_open: self.config.max_open,
        }
    }
}

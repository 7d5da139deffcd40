// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Allocation policy
//!
//! Every heap block needed while building an atlas (the glyph table, the atlas
//! bitmap and a scratch row used for flipping) is requested from an
//! [`Allocator`]. The allocator decides whether the request is granted and
//! accounts for it; the memory itself comes from the global heap through
//! fallible reservation, so genuine out-of-memory is also reported as
//! [`Error::AllocationFailure`] rather than aborting.
//!
//! Granted blocks are held by a [`Buffer`], which returns its layout to the
//! allocator on drop. A failed build therefore releases everything allocated
//! before the failure simply by unwinding its locals.

use crate::{Error, Result};
use std::alloc::Layout;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use thiserror::Error;

/// An allocation request was refused
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("allocation of {0} bytes refused")]
pub struct AllocError(pub usize);

impl From<AllocError> for Error {
    fn from(err: AllocError) -> Self {
        Error::AllocationFailure { bytes: err.0 }
    }
}

/// Allocation policy
///
/// Implementations must be thread-safe since a built [`Font`](crate::Font)
/// may be dropped on any thread.
pub trait Allocator: Send + Sync {
    /// Request a block with the given `layout`
    fn allocate(&self, layout: Layout) -> Result<(), AllocError>;

    /// Resize a block previously granted with layout `old`
    ///
    /// On failure the old block remains valid.
    fn reallocate(&self, old: Layout, new: Layout) -> Result<(), AllocError> {
        self.allocate(new)?;
        self.deallocate(old);
        Ok(())
    }

    /// Release a block previously granted with `layout`
    fn deallocate(&self, layout: Layout);
}

/// The default allocator: the process heap without further limits
#[derive(Clone, Copy, Debug, Default)]
pub struct Heap;

impl Allocator for Heap {
    #[inline]
    fn allocate(&self, _: Layout) -> Result<(), AllocError> {
        Ok(())
    }

    #[inline]
    fn deallocate(&self, _: Layout) {}
}

/// Get a shared handle to the default allocator
pub fn heap() -> Arc<dyn Allocator> {
    Arc::new(Heap)
}

/// A fixed-length buffer granted by an [`Allocator`]
pub struct Buffer<T> {
    data: Vec<T>,
    layout: Layout,
    allocator: Arc<dyn Allocator>,
}

impl<T> Buffer<T> {
    fn grant(allocator: &Arc<dyn Allocator>, len: usize) -> Result<(Vec<T>, Layout)> {
        let layout = Layout::array::<T>(len).map_err(|_| Error::AllocationFailure {
            bytes: usize::MAX,
        })?;
        allocator.allocate(layout)?;

        let mut data = Vec::new();
        if data.try_reserve_exact(len).is_err() {
            allocator.deallocate(layout);
            return Err(Error::AllocationFailure {
                bytes: layout.size(),
            });
        }
        Ok((data, layout))
    }

    /// Take ownership of an existing vector
    ///
    /// The vector's length is accounted with `allocator`.
    pub fn from_vec(allocator: &Arc<dyn Allocator>, data: Vec<T>) -> Result<Self> {
        let layout = Layout::array::<T>(data.len()).map_err(|_| Error::AllocationFailure {
            bytes: usize::MAX,
        })?;
        allocator.allocate(layout)?;
        Ok(Buffer {
            data,
            layout,
            allocator: allocator.clone(),
        })
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Size of the granted block in bytes
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.layout.size()
    }
}

impl<T: Clone + Default> Buffer<T> {
    /// Allocate `len` default-initialised elements
    ///
    /// For `u8` this is a zero-filled buffer.
    pub fn new(allocator: &Arc<dyn Allocator>, len: usize) -> Result<Self> {
        let (mut data, layout) = Self::grant(allocator, len)?;
        data.resize(len, T::default());
        Ok(Buffer {
            data,
            layout,
            allocator: allocator.clone(),
        })
    }
}

impl<T> Deref for Buffer<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for Buffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Drop for Buffer<T> {
    fn drop(&mut self) {
        self.allocator.deallocate(self.layout);
    }
}

impl<T: fmt::Debug> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.data.len())
            .field("bytes", &self.layout.size())
            .finish_non_exhaustive()
    }
}

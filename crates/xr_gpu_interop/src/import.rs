//! Resource Importer
//!
//! Turns shared OS handles from another process into local image and fence
//! objects. The imported object is shared with the exporting process: cloning
//! adds a local reference, dropping releases that local reference, and neither
//! touches the cross-process original or closes the source handle.

use std::fmt;

use crate::api::NativeApi;
use crate::error::{InteropError, NativeStatus, Result};
use crate::handle::{HandleKind, SharedHandle};

/// GPU image opened from a shared handle
pub struct SharedImage<A: NativeApi> {
    raw: A::Image,
    handle: SharedHandle,
}

impl<A: NativeApi> SharedImage<A> {
    pub fn raw(&self) -> &A::Image {
        &self.raw
    }

    pub fn into_raw(self) -> A::Image {
        self.raw
    }

    /// Handle this image was opened from; still owned by the caller
    pub fn source_handle(&self) -> SharedHandle {
        self.handle
    }
}

impl<A: NativeApi> Clone for SharedImage<A> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            handle: self.handle,
        }
    }
}

impl<A: NativeApi> fmt::Debug for SharedImage<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedImage")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Timeline fence opened from a shared handle
pub struct SharedFence<A: NativeApi> {
    raw: A::Fence,
    handle: SharedHandle,
}

impl<A: NativeApi> SharedFence<A> {
    pub fn raw(&self) -> &A::Fence {
        &self.raw
    }

    pub fn into_raw(self) -> A::Fence {
        self.raw
    }

    pub fn source_handle(&self) -> SharedHandle {
        self.handle
    }

    /// Last value signalled by either side; does not wait
    pub fn completed_value(&self) -> u64 {
        A::fence_completed_value(&self.raw)
    }

    /// Whether the fence has reached `value`
    pub fn is_signalled(&self, value: u64) -> bool {
        self.completed_value() >= value
    }
}

impl<A: NativeApi> Clone for SharedFence<A> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            handle: self.handle,
        }
    }
}

impl<A: NativeApi> fmt::Debug for SharedFence<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFence")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

fn open_shared<T>(
    kind: HandleKind,
    handle: SharedHandle,
    open: impl FnOnce(SharedHandle) -> std::result::Result<T, NativeStatus>,
) -> Result<T> {
    if handle.is_null() {
        return Err(InteropError::InvalidHandle { kind });
    }

    open(handle).map_err(|status| {
        tracing::warn!(%kind, %handle, %status, "Opening shared handle failed");
        InteropError::Import { kind, status }
    })
}

/// Import a GPU image shared by another process
pub fn import_image<A: NativeApi>(device: &A::Device, handle: SharedHandle) -> Result<SharedImage<A>> {
    let raw = open_shared(HandleKind::Image, handle, |handle| {
        A::open_shared_image(device, handle)
    })?;
    Ok(SharedImage { raw, handle })
}

/// Import a fence shared by another process
pub fn import_fence<A: NativeApi>(device: &A::Device, handle: SharedHandle) -> Result<SharedFence<A>> {
    let raw = open_shared(HandleKind::Fence, handle, |handle| {
        A::open_shared_fence(device, handle)
    })?;
    Ok(SharedFence { raw, handle })
}

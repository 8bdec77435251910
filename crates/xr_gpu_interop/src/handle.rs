//! Shared Handle Utilities
//!
//! Opaque, process-exportable tokens naming a GPU image or fence that another
//! process created. Validity and process scoping are defined by the OS; this
//! layer only rejects the null token and never closes a handle it is given.

use std::fmt;

#[cfg(target_os = "windows")]
use windows::Win32::Foundation::HANDLE;

/// Pointer-sized OS handle to a shared image or fence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SharedHandle(usize);

impl SharedHandle {
    pub const NULL: Self = Self(0);

    pub const fn from_raw(value: usize) -> Self {
        Self(value)
    }

    pub const fn as_raw(self) -> usize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SharedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Convert a Windows HANDLE into a storable shared handle
#[cfg(target_os = "windows")]
impl From<HANDLE> for SharedHandle {
    fn from(handle: HANDLE) -> Self {
        Self(handle.0 as usize)
    }
}

/// Reconstruct the Windows HANDLE from a stored shared handle
#[cfg(target_os = "windows")]
impl From<SharedHandle> for HANDLE {
    fn from(handle: SharedHandle) -> Self {
        HANDLE(handle.0 as *mut core::ffi::c_void)
    }
}

/// What kind of object a shared handle was expected to name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Image,
    Fence,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Image => f.write_str("image"),
            HandleKind::Fence => f.write_str("fence"),
        }
    }
}

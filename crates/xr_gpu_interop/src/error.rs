//! Interop Error Taxonomy
//!
//! Every failure that originates in the graphics API carries the native status
//! code so it can be looked up against platform documentation. Nothing here is
//! retried; the caller decides what to do with a failed frame.

use std::fmt;

use crate::handle::HandleKind;

/// Raw status code returned by a native graphics call (an `HRESULT` on Direct3D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeStatus(pub i32);

impl NativeStatus {
    pub const E_FAIL: Self = Self(0x8000_4005_u32 as i32);
    pub const E_INVALIDARG: Self = Self(0x8007_0057_u32 as i32);
    pub const E_NOINTERFACE: Self = Self(0x8000_4002_u32 as i32);
    pub const E_OUTOFMEMORY: Self = Self(0x8007_000E_u32 as i32);
    pub const DXGI_ERROR_UNSUPPORTED: Self = Self(0x887A_0004_u32 as i32);
    pub const DXGI_ERROR_DEVICE_REMOVED: Self = Self(0x887A_0005_u32 as i32);

    pub const fn code(self) -> i32 {
        self.0
    }

    /// Failure codes have the severity bit set
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for NativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0 as u32)
    }
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for NativeStatus {
    fn from(error: windows::core::Error) -> Self {
        Self(error.code().0)
    }
}

/// Native step of a command sequence build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Creating the command list against the caller's allocator
    Create,
    /// Closing the recorded list
    Close,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStage::Create => f.write_str("create"),
            BuildStage::Close => f.write_str("close"),
        }
    }
}

/// Errors surfaced by the interop layer
#[derive(Debug, thiserror::Error)]
pub enum InteropError {
    #[error("Failed to create device at the requested feature level: {status}")]
    DeviceCreation { status: NativeStatus },

    #[error("Cannot import empty {kind} handle")]
    InvalidHandle { kind: HandleKind },

    #[error("Failed to import shared {kind}: {status}")]
    Import {
        kind: HandleKind,
        status: NativeStatus,
    },

    #[error("Failed to {stage} command list: {status}")]
    CommandBuild {
        stage: BuildStage,
        status: NativeStatus,
    },

    #[error("Invalid interop configuration: {0}")]
    InvalidConfig(String),

    #[error("Swapchain image index {index} out of range ({count} images)")]
    ImageIndexOutOfRange { index: usize, count: usize },
}

impl InteropError {
    /// Native status code behind this error, if it came from the graphics API
    pub fn native_status(&self) -> Option<NativeStatus> {
        match self {
            InteropError::DeviceCreation { status }
            | InteropError::Import { status, .. }
            | InteropError::CommandBuild { status, .. } => Some(*status),
            InteropError::InvalidHandle { .. }
            | InteropError::InvalidConfig(_)
            | InteropError::ImageIndexOutOfRange { .. } => None,
        }
    }
}

pub type Result<T, E = InteropError> = std::result::Result<T, E>;

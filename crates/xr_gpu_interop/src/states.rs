//! Resource State Model
//!
//! Native state values mirror the Direct3D 12 `D3D12_RESOURCE_STATES` numbering
//! so they cross the API seam without translation. On top of that the layer
//! keeps its own two-state tag, [`ResourceState`]: a shared image is either
//! readable by the compositor or usable by the application, nothing else.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::usage::{usage_to_native_state, UsageIntent};

bitflags! {
    /// Native resource state bits (`D3D12_RESOURCE_STATES`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ResourceStates: u32 {
        const COMMON = 0;
        const VERTEX_AND_CONSTANT_BUFFER = 0x1;
        const INDEX_BUFFER = 0x2;
        const RENDER_TARGET = 0x4;
        const UNORDERED_ACCESS = 0x8;
        const DEPTH_WRITE = 0x10;
        const DEPTH_READ = 0x20;
        const NON_PIXEL_SHADER_RESOURCE = 0x40;
        const PIXEL_SHADER_RESOURCE = 0x80;
        const STREAM_OUT = 0x100;
        const INDIRECT_ARGUMENT = 0x200;
        const COPY_DEST = 0x400;
        const COPY_SOURCE = 0x800;
        const RESOLVE_DEST = 0x1000;
        const RESOLVE_SOURCE = 0x2000;

        const GENERIC_READ = Self::VERTEX_AND_CONSTANT_BUFFER.bits()
            | Self::INDEX_BUFFER.bits()
            | Self::NON_PIXEL_SHADER_RESOURCE.bits()
            | Self::PIXEL_SHADER_RESOURCE.bits()
            | Self::INDIRECT_ARGUMENT.bits()
            | Self::COPY_SOURCE.bits();
    }
}

impl ResourceStates {
    /// States that grant write access; each must be used alone
    pub const WRITE: Self = Self::RENDER_TARGET
        .union(Self::UNORDERED_ACCESS)
        .union(Self::DEPTH_WRITE)
        .union(Self::STREAM_OUT)
        .union(Self::COPY_DEST)
        .union(Self::RESOLVE_DEST);

    /// Read-only states may be combined; write states may not
    pub const fn is_read_only(self) -> bool {
        !self.intersects(Self::WRITE)
    }

    pub const fn raw(self) -> i32 {
        self.bits() as i32
    }
}

impl Default for ResourceStates {
    fn default() -> Self {
        Self::COMMON
    }
}

bitflags! {
    /// Native creation flags an exported image must carry (`D3D12_RESOURCE_FLAGS`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResourceFlags: u32 {
        const ALLOW_RENDER_TARGET = 0x1;
        const ALLOW_DEPTH_STENCIL = 0x2;
        const ALLOW_UNORDERED_ACCESS = 0x4;
        const DENY_SHADER_RESOURCE = 0x8;
        const ALLOW_CROSS_ADAPTER = 0x10;
        const ALLOW_SIMULTANEOUS_ACCESS = 0x20;
    }
}

/// Which side of the hand-off may legally touch a shared image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Canonical idle state, owned by the compositor
    CompositorReadable,
    /// Owned by the application for the accesses it declared
    ApplicationUsable(UsageIntent),
}

impl ResourceState {
    /// Resolve to native bits, given the compositor's configured read state
    pub fn native(self, compositor_state: ResourceStates) -> ResourceStates {
        match self {
            ResourceState::CompositorReadable => compositor_state,
            ResourceState::ApplicationUsable(intent) => usage_to_native_state(intent),
        }
    }
}

/// Minimum feature level a device must support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum FeatureLevel {
    #[serde(rename = "11_0")]
    Level11_0,
    #[default]
    #[serde(rename = "11_1")]
    Level11_1,
    #[serde(rename = "12_0")]
    Level12_0,
    #[serde(rename = "12_1")]
    Level12_1,
}

impl FeatureLevel {
    /// Native `D3D_FEATURE_LEVEL` value
    pub const fn raw(self) -> i32 {
        match self {
            FeatureLevel::Level11_0 => 0xb000,
            FeatureLevel::Level11_1 => 0xb100,
            FeatureLevel::Level12_0 => 0xc000,
            FeatureLevel::Level12_1 => 0xc100,
        }
    }
}

/// Queue type the hand-off command lists are recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandListKind {
    #[default]
    Direct,
    Compute,
}

impl CommandListKind {
    /// Native `D3D12_COMMAND_LIST_TYPE` value
    pub const fn raw(self) -> i32 {
        match self {
            CommandListKind::Direct => 0,
            CommandListKind::Compute => 2,
        }
    }
}

//! # XR GPU Interop
//!
//! Cross-process GPU interop for the XR runtime's compositor hand-off.
//!
//! An application renders into swapchain images the compositor created in
//! another process. This crate opens those images and their fences from shared
//! OS handles, and builds the closed command sequences that move ownership of
//! an image between the two sides:
//!
//! ```text
//!   application process                compositor process
//!  ┌────────────────────┐  acquire   ┌────────────────────┐
//!  │ ApplicationUsable  │◄───────────│ CompositorReadable │
//!  │      (usage)       │───────────►│  (configured read) │
//!  └────────────────────┘  release   └────────────────────┘
//! ```
//!
//! Builders are stateless and generic over [`NativeApi`]. Direct3D 12 is the
//! shipped backend ([`d3d12::D3D12`], Windows only). Submitting sequences and
//! waiting on fences stay with the caller.

pub mod api;
pub mod commands;
pub mod config;
pub mod copy;
pub mod device;
pub mod error;
pub mod handle;
pub mod handoff;
pub mod import;
pub mod states;
pub mod swapchain;
pub mod usage;

#[cfg(target_os = "windows")]
pub mod d3d12;

pub use api::{NativeApi, Transition, ALL_SUBRESOURCES};
pub use commands::{
    Acquire, AcquireSequence, CommandSequence, CopySequence, ImageCopy, ImageRole, RecordedCommand,
    Release, ReleaseSequence, SequenceKind, TransitionRecord,
};
pub use config::InteropConfig;
pub use copy::build_copy;
pub use device::{create_device, create_device_with_config};
pub use error::{BuildStage, InteropError, NativeStatus, Result};
pub use handle::{HandleKind, SharedHandle};
pub use handoff::{build_handoff, HandoffPair};
pub use import::{import_fence, import_image, SharedFence, SharedImage};
pub use states::{CommandListKind, FeatureLevel, ResourceFlags, ResourceState, ResourceStates};
pub use swapchain::SwapchainInterop;
pub use usage::{
    is_representable, usage_conflicts, usage_to_native_state, usage_to_resource_flags, usage_to_state,
    UsageIntent,
};

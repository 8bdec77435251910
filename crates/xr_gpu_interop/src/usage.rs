//! Usage-to-State Mapper
//!
//! Translates the usage bits an application declared for a swapchain into the
//! native resource state it expects to find the image in while it owns it.
//!
//! The native model allows several read states at once but only one write
//! state, alone. So the mapping is:
//!
//! - The first write usage present, in the order `UNORDERED_ACCESS`, `COLOR`,
//!   `DEPTH_STENCIL`, `TRANSFER_DST`, selects the state on its own.
//! - Otherwise the read usages are unioned.
//! - No recognized usage gives `COMMON`.
//!
//! Combinations that no single native state satisfies are listed by
//! [`usage_conflicts`]. Known ones: two write usages together (for example
//! `COLOR | UNORDERED_ACCESS`), and any write usage together with `SAMPLED`,
//! `INPUT_ATTACHMENT` or `TRANSFER_SRC`. The mapper still answers for those
//! (the write state wins), and a caller that wants to refuse them can do so at
//! build time:
//!
//! ```
//! use xr_gpu_interop::usage::{is_representable, UsageIntent};
//!
//! const SWAPCHAIN_USAGE: UsageIntent = UsageIntent::SAMPLED.union(UsageIntent::TRANSFER_SRC);
//! const _: () = assert!(is_representable(SWAPCHAIN_USAGE));
//! ```

use bitflags::bitflags;

use crate::states::{ResourceFlags, ResourceState, ResourceStates};

bitflags! {
    /// Swapchain usage bits as declared through the XR API surface
    ///
    /// The bit layout is an external contract and is never reinterpreted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UsageIntent: u32 {
        const COLOR = 0x0000_0001;
        const DEPTH_STENCIL = 0x0000_0002;
        const UNORDERED_ACCESS = 0x0000_0004;
        const TRANSFER_SRC = 0x0000_0008;
        const TRANSFER_DST = 0x0000_0010;
        const SAMPLED = 0x0000_0020;
        const MUTABLE_FORMAT = 0x0000_0040;
        const INPUT_ATTACHMENT = 0x0000_0080;
    }
}

impl UsageIntent {
    /// Build from the raw mask, dropping bits this layer does not know
    pub const fn from_raw(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

const WRITE_USAGES: [(UsageIntent, ResourceStates); 4] = [
    (UsageIntent::UNORDERED_ACCESS, ResourceStates::UNORDERED_ACCESS),
    (UsageIntent::COLOR, ResourceStates::RENDER_TARGET),
    (UsageIntent::DEPTH_STENCIL, ResourceStates::DEPTH_WRITE),
    (UsageIntent::TRANSFER_DST, ResourceStates::COPY_DEST),
];

const SHADER_READ: ResourceStates =
    ResourceStates::PIXEL_SHADER_RESOURCE.union(ResourceStates::NON_PIXEL_SHADER_RESOURCE);

const READ_USAGES: [(UsageIntent, ResourceStates); 3] = [
    (UsageIntent::SAMPLED, SHADER_READ),
    (UsageIntent::INPUT_ATTACHMENT, ResourceStates::PIXEL_SHADER_RESOURCE),
    (UsageIntent::TRANSFER_SRC, ResourceStates::COPY_SOURCE),
];

/// Tag the application-owned state for a usage intent
pub fn usage_to_state(intent: UsageIntent) -> ResourceState {
    ResourceState::ApplicationUsable(UsageIntent::from_bits_truncate(intent.bits()))
}

/// Native state granting the declared usages
pub const fn usage_to_native_state(intent: UsageIntent) -> ResourceStates {
    let mut i = 0;
    while i < WRITE_USAGES.len() {
        let (usage, state) = WRITE_USAGES[i];
        if intent.contains(usage) {
            return state;
        }
        i += 1;
    }

    let mut state = ResourceStates::COMMON;
    let mut i = 0;
    while i < READ_USAGES.len() {
        let (usage, granted) = READ_USAGES[i];
        if intent.contains(usage) {
            state = state.union(granted);
        }
        i += 1;
    }
    state
}

/// Native states any one of which grants a single usage
const fn granting_states(usage: UsageIntent) -> ResourceStates {
    if usage.contains(UsageIntent::COLOR) {
        ResourceStates::RENDER_TARGET
    } else if usage.contains(UsageIntent::DEPTH_STENCIL) {
        ResourceStates::DEPTH_WRITE
    } else if usage.contains(UsageIntent::UNORDERED_ACCESS) {
        ResourceStates::UNORDERED_ACCESS
    } else if usage.contains(UsageIntent::TRANSFER_SRC) {
        ResourceStates::COPY_SOURCE
    } else if usage.contains(UsageIntent::TRANSFER_DST) {
        ResourceStates::COPY_DEST
    } else if usage.contains(UsageIntent::SAMPLED) {
        SHADER_READ
    } else {
        ResourceStates::PIXEL_SHADER_RESOURCE
    }
}

// MUTABLE_FORMAT needs no particular state and is left out
const STATEFUL_USAGES: [UsageIntent; 7] = [
    UsageIntent::COLOR,
    UsageIntent::DEPTH_STENCIL,
    UsageIntent::UNORDERED_ACCESS,
    UsageIntent::TRANSFER_SRC,
    UsageIntent::TRANSFER_DST,
    UsageIntent::SAMPLED,
    UsageIntent::INPUT_ATTACHMENT,
];

/// Declared usages the mapped native state does not grant
pub const fn usage_conflicts(intent: UsageIntent) -> UsageIntent {
    let state = usage_to_native_state(intent);
    let mut conflicts = UsageIntent::empty();
    let mut i = 0;
    while i < STATEFUL_USAGES.len() {
        let usage = STATEFUL_USAGES[i];
        if intent.contains(usage) && !state.intersects(granting_states(usage)) {
            conflicts = conflicts.union(usage);
        }
        i += 1;
    }
    conflicts
}

/// True when one native state grants every declared usage
pub const fn is_representable(intent: UsageIntent) -> bool {
    usage_conflicts(intent).is_empty()
}

/// Creation flags the exporting side must have used for these usages
pub const fn usage_to_resource_flags(intent: UsageIntent) -> ResourceFlags {
    let mut flags = ResourceFlags::empty();
    if intent.contains(UsageIntent::COLOR) {
        flags = flags.union(ResourceFlags::ALLOW_RENDER_TARGET);
    }
    if intent.contains(UsageIntent::DEPTH_STENCIL) {
        flags = flags.union(ResourceFlags::ALLOW_DEPTH_STENCIL);
        if !intent.contains(UsageIntent::SAMPLED) {
            flags = flags.union(ResourceFlags::DENY_SHADER_RESOURCE);
        }
    } else {
        // Simultaneous access is not allowed on depth-stencil images
        flags = flags.union(ResourceFlags::ALLOW_SIMULTANEOUS_ACCESS);
    }
    if intent.contains(UsageIntent::UNORDERED_ACCESS) {
        flags = flags.union(ResourceFlags::ALLOW_UNORDERED_ACCESS);
    }
    flags
}

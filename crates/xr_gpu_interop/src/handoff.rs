//! Hand-off Command Builder
//!
//! Builds the pair of command sequences that move one shared image between
//! the compositor and the application:
//!
//! ```text
//!            acquire
//!   ┌────────────────────────┐
//!   │                        ▼
//! CompositorReadable   ApplicationUsable(usage)
//!   ▲                        │
//!   └────────────────────────┘
//!            release
//! ```
//!
//! Each pair covers exactly one image, so a single image's pair can be rebuilt
//! without touching the others. Both lists are closed before anything is
//! returned; if either native step fails, nothing is returned.
//!
//! A usage whose state equals the configured compositor state has no
//! transition to record and is rejected as a configuration error.

use crate::api::{NativeApi, Transition, ALL_SUBRESOURCES};
use crate::commands::{
    Acquire, AcquireSequence, CommandRecorder, CommandSequence, HandoffKind, ImageRole, Release,
    ReleaseSequence, TransitionRecord,
};
use crate::config::InteropConfig;
use crate::error::{InteropError, Result};
use crate::states::{ResourceState, ResourceStates};
use crate::usage::{usage_to_state, UsageIntent};

/// Acquire and Release sequences for one shared image
pub struct HandoffPair<A: NativeApi> {
    pub acquire: AcquireSequence<A>,
    pub release: ReleaseSequence<A>,
}

impl<A: NativeApi> std::fmt::Debug for HandoffPair<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffPair")
            .field("acquire", &self.acquire)
            .field("release", &self.release)
            .finish()
    }
}

/// Build the Acquire/Release pair for `image` and the declared `usage`
pub fn build_handoff<A: NativeApi>(
    device: &A::Device,
    allocator: &A::CommandAllocator,
    image: &A::Image,
    usage: UsageIntent,
    config: &InteropConfig,
) -> Result<HandoffPair<A>> {
    config.validate()?;

    let compositor_state = ResourceState::CompositorReadable.native(config.compositor_state);
    let app_state = usage_to_state(usage).native(config.compositor_state);

    if app_state == compositor_state {
        return Err(InteropError::InvalidConfig(format!(
            "usage {usage:?} maps to compositor_state {compositor_state:?}; nothing to hand off"
        )));
    }

    let acquire = record_transition::<A, Acquire>(device, allocator, image, compositor_state, app_state, config)?;
    let release = record_transition::<A, Release>(device, allocator, image, app_state, compositor_state, config)?;

    tracing::trace!(?usage, ?app_state, ?compositor_state, "Built hand-off pair");

    Ok(HandoffPair { acquire, release })
}

fn record_transition<A: NativeApi, K: HandoffKind>(
    device: &A::Device,
    allocator: &A::CommandAllocator,
    image: &A::Image,
    before: ResourceStates,
    after: ResourceStates,
    config: &InteropConfig,
) -> Result<CommandSequence<A, K>> {
    let mut recorder = CommandRecorder::<A>::begin(device, allocator, config.command_list_kind)?;
    recorder.barrier(&[(
        ImageRole::Shared,
        Transition {
            image,
            subresource: ALL_SUBRESOURCES,
            before,
            after,
        },
    )]);
    recorder.finish::<K>(TransitionRecord {
        role: ImageRole::Shared,
        subresource: ALL_SUBRESOURCES,
        before,
        after,
    })
}

//! Cross-Resource Copy Command Builder
//!
//! Bridges two distinct backing images with an explicit GPU copy when a state
//! transition alone cannot hand content over. The recorded order is fixed:
//!
//! 1. one barrier: source to `COPY_SOURCE`, then destination to `COPY_DEST`
//! 2. copy of subresource 0
//! 3. one barrier restoring both images to their declared states
//! 4. close
//!
//! Barriers cover every subresource, but only the first subresource is copied.
//! Array and mip chains are not bridged. An image already in its copy state
//! keeps its place in both barrier descriptions but is left out of the native
//! barriers.

use crate::api::{NativeApi, Transition, ALL_SUBRESOURCES};
use crate::commands::{CommandRecorder, CopySequence, ImageCopy, ImageRole};
use crate::config::InteropConfig;
use crate::error::Result;
use crate::states::{ResourceState, ResourceStates};

/// Subresource the copy reads and writes
pub const COPY_SUBRESOURCE: u32 = 0;

/// Build a closed copy sequence from `src` to `dst`
///
/// `src_state` and `dst_state` are the caller's record of where each image
/// currently is; both images end the sequence back in those states.
pub fn build_copy<A: NativeApi>(
    device: &A::Device,
    allocator: &A::CommandAllocator,
    src: &A::Image,
    dst: &A::Image,
    src_state: ResourceState,
    dst_state: ResourceState,
    config: &InteropConfig,
) -> Result<CopySequence<A>> {
    config.validate()?;

    let src_native = src_state.native(config.compositor_state);
    let dst_native = dst_state.native(config.compositor_state);

    let mut recorder = CommandRecorder::<A>::begin(device, allocator, config.command_list_kind)?;

    recorder.barrier(&[
        copy_transition(ImageRole::Source, src, src_native, ResourceStates::COPY_SOURCE),
        copy_transition(ImageRole::Destination, dst, dst_native, ResourceStates::COPY_DEST),
    ]);

    recorder.copy(src, dst, COPY_SUBRESOURCE);

    recorder.barrier(&[
        copy_transition(ImageRole::Source, src, ResourceStates::COPY_SOURCE, src_native),
        copy_transition(ImageRole::Destination, dst, ResourceStates::COPY_DEST, dst_native),
    ]);

    let sequence = recorder.finish::<ImageCopy>(())?;

    tracing::trace!(?src_native, ?dst_native, "Built copy sequence");

    Ok(sequence)
}

fn copy_transition<I>(
    role: ImageRole,
    image: &I,
    before: ResourceStates,
    after: ResourceStates,
) -> (ImageRole, Transition<'_, I>) {
    (
        role,
        Transition {
            image,
            subresource: ALL_SUBRESOURCES,
            before,
            after,
        },
    )
}

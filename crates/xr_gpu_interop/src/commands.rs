//! Finalized Command Sequences
//!
//! A [`CommandSequence`] only exists once its native command list has been
//! closed. Recording goes through a crate-private recorder that is consumed by
//! closing, so a sequence handed to a caller cannot be appended to: the type
//! holds the submit-only list and a read-only description of what was recorded.
//!
//! The kind parameter keeps Acquire, Release and Copy sequences apart at the
//! type level, so a Release list cannot be queued where an Acquire is expected.
//!
//! Neither the sequence nor its submit list accepts further commands:
//!
//! ```compile_fail
//! use xr_gpu_interop::{AcquireSequence, NativeApi, Transition};
//!
//! fn append<A: NativeApi>(sequence: AcquireSequence<A>, transitions: &[Transition<'_, A::Image>]) {
//!     let mut list = sequence.into_submit_list();
//!     A::resource_barriers(&mut list, transitions);
//! }
//! ```
//!
//! ```compile_fail
//! use xr_gpu_interop::{CopySequence, NativeApi};
//!
//! fn copy_again<A: NativeApi>(sequence: &mut CopySequence<A>, src: &A::Image, dst: &A::Image) {
//!     A::copy_subresource(sequence.submit_list(), src, dst, 0);
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::api::{NativeApi, Transition};
use crate::error::{BuildStage, InteropError, Result};
use crate::states::{CommandListKind, ResourceStates};

mod sealed {
    pub trait Sealed {}
}

/// Marker for the three sequence kinds this layer builds
pub trait SequenceKind: sealed::Sealed {
    const NAME: &'static str;

    /// Kind-specific summary kept next to the recorded commands
    type Summary: Copy + fmt::Debug;
}

/// Compositor-readable to application-usable
#[derive(Debug)]
pub enum Acquire {}

/// Application-usable back to compositor-readable
#[derive(Debug)]
pub enum Release {}

/// Copy between two distinct images
#[derive(Debug)]
pub enum ImageCopy {}

impl sealed::Sealed for Acquire {}
impl sealed::Sealed for Release {}
impl sealed::Sealed for ImageCopy {}

impl SequenceKind for Acquire {
    const NAME: &'static str = "acquire";
    type Summary = TransitionRecord;
}

impl SequenceKind for Release {
    const NAME: &'static str = "release";
    type Summary = TransitionRecord;
}

impl SequenceKind for ImageCopy {
    const NAME: &'static str = "copy";
    type Summary = ();
}

/// Role an image plays in a recorded sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    /// The single image of a hand-off
    Shared,
    /// Copy source
    Source,
    /// Copy destination
    Destination,
}

/// Description of one recorded transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRecord {
    pub role: ImageRole,
    pub subresource: u32,
    pub before: ResourceStates,
    pub after: ResourceStates,
}

/// Description of one recorded native command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    /// One batched barrier
    Barrier(Vec<TransitionRecord>),
    /// Subresource copy from the source image to the destination image
    CopySubresource { subresource: u32 },
}

/// Closed, replayable batch of GPU commands
pub struct CommandSequence<A: NativeApi, K: SequenceKind> {
    list: A::SubmitList,
    commands: Vec<RecordedCommand>,
    summary: K::Summary,
    _kind: PhantomData<K>,
}

pub type AcquireSequence<A> = CommandSequence<A, Acquire>;
pub type ReleaseSequence<A> = CommandSequence<A, Release>;
pub type CopySequence<A> = CommandSequence<A, ImageCopy>;

impl<A: NativeApi, K: SequenceKind> CommandSequence<A, K> {
    /// Native list to hand to the queue
    pub fn submit_list(&self) -> &A::SubmitList {
        &self.list
    }

    pub fn into_submit_list(self) -> A::SubmitList {
        self.list
    }

    /// What was recorded, in order
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    pub fn barrier_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RecordedCommand::Barrier(_)))
            .count()
    }

    pub fn copy_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RecordedCommand::CopySubresource { .. }))
            .count()
    }

    /// Every transition, flattened across barriers
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> + '_ {
        self.commands.iter().flat_map(|command| match command {
            RecordedCommand::Barrier(transitions) => transitions.as_slice(),
            RecordedCommand::CopySubresource { .. } => &[][..],
        })
    }
}

impl<A: NativeApi, K: HandoffKind> CommandSequence<A, K> {
    /// The single transition this sequence performs
    pub fn transition(&self) -> TransitionRecord {
        self.summary
    }

    /// Native state the shared image must be in before this sequence runs
    pub fn before_state(&self) -> ResourceStates {
        self.summary.before
    }

    /// Native state the shared image is in after this sequence runs
    pub fn after_state(&self) -> ResourceStates {
        self.summary.after
    }
}

/// Sequence kinds built as a single-image transition
pub trait HandoffKind: SequenceKind<Summary = TransitionRecord> {}

impl HandoffKind for Acquire {}
impl HandoffKind for Release {}

impl<A: NativeApi, K: SequenceKind> Clone for CommandSequence<A, K>
where
    A::SubmitList: Clone,
{
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            commands: self.commands.clone(),
            summary: self.summary,
            _kind: PhantomData,
        }
    }
}

impl<A: NativeApi, K: SequenceKind> fmt::Debug for CommandSequence<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSequence")
            .field("kind", &K::NAME)
            .field("commands", &self.commands)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// Open native list plus the description of what went into it
pub(crate) struct CommandRecorder<A: NativeApi> {
    list: A::CommandList,
    commands: Vec<RecordedCommand>,
}

impl<A: NativeApi> CommandRecorder<A> {
    pub(crate) fn begin(
        device: &A::Device,
        allocator: &A::CommandAllocator,
        kind: CommandListKind,
    ) -> Result<Self> {
        let list = A::create_command_list(device, allocator, kind).map_err(|status| {
            tracing::warn!(%status, ?kind, "Command list creation failed");
            InteropError::CommandBuild {
                stage: BuildStage::Create,
                status,
            }
        })?;

        Ok(Self {
            list,
            commands: Vec::new(),
        })
    }

    /// Record one batched barrier, in the order given
    ///
    /// Every transition is described, but one whose before and after states
    /// match is left out of the native batch. An all-no-op batch issues no
    /// native barrier at all.
    pub(crate) fn barrier(&mut self, transitions: &[(ImageRole, Transition<'_, A::Image>)]) {
        let records = transitions
            .iter()
            .map(|(role, transition)| TransitionRecord {
                role: *role,
                subresource: transition.subresource,
                before: transition.before,
                after: transition.after,
            })
            .collect();

        let native: Vec<Transition<'_, A::Image>> = transitions
            .iter()
            .filter(|(_, transition)| transition.before != transition.after)
            .map(|(_, transition)| Transition {
                image: transition.image,
                subresource: transition.subresource,
                before: transition.before,
                after: transition.after,
            })
            .collect();

        if !native.is_empty() {
            A::resource_barriers(&mut self.list, &native);
        }
        self.commands.push(RecordedCommand::Barrier(records));
    }

    pub(crate) fn copy(&mut self, src: &A::Image, dst: &A::Image, subresource: u32) {
        A::copy_subresource(&mut self.list, src, dst, subresource);
        self.commands
            .push(RecordedCommand::CopySubresource { subresource });
    }

    /// Close the list; the only way to obtain a sequence
    pub(crate) fn finish<K: SequenceKind>(self, summary: K::Summary) -> Result<CommandSequence<A, K>> {
        let list = A::close_command_list(self.list).map_err(|status| {
            tracing::warn!(%status, kind = K::NAME, "Closing command list failed");
            InteropError::CommandBuild {
                stage: BuildStage::Close,
                status,
            }
        })?;

        Ok(CommandSequence {
            list,
            commands: self.commands,
            summary,
            _kind: PhantomData,
        })
    }
}

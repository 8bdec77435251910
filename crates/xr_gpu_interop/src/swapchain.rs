//! Swapchain hand-off cache
//!
//! Imports every image of one swapchain and builds its Acquire/Release pair up
//! front, so the per-frame path only looks sequences up and resubmits them.
//! The cache does not track whose turn it is; pairing acquire with release
//! stays the caller's job.

use crate::api::NativeApi;
use crate::commands::{AcquireSequence, ReleaseSequence};
use crate::config::InteropConfig;
use crate::error::{InteropError, Result};
use crate::handle::SharedHandle;
use crate::handoff::{build_handoff, HandoffPair};
use crate::import::{import_image, SharedImage};
use crate::usage::UsageIntent;

struct SwapchainImage<A: NativeApi> {
    image: SharedImage<A>,
    handoff: HandoffPair<A>,
}

/// Imported images of one swapchain plus their prebuilt hand-off pairs
pub struct SwapchainInterop<A: NativeApi> {
    usage: UsageIntent,
    images: Vec<SwapchainImage<A>>,
}

impl<A: NativeApi> SwapchainInterop<A> {
    /// Import `handles` in order and build a pair for each image
    ///
    /// Fails as a whole: if any image cannot be imported or any pair cannot be
    /// built, everything imported so far is dropped and the error returned.
    pub fn import(
        device: &A::Device,
        allocator: &A::CommandAllocator,
        handles: &[SharedHandle],
        usage: UsageIntent,
        config: &InteropConfig,
    ) -> Result<Self> {
        config.validate()?;

        let images = handles
            .iter()
            .map(|&handle| -> Result<SwapchainImage<A>> {
                let image = import_image::<A>(device, handle)?;
                let handoff = build_handoff::<A>(device, allocator, image.raw(), usage, config)?;
                Ok(SwapchainImage { image, handoff })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(images = images.len(), ?usage, "Imported swapchain images");

        Ok(Self { usage, images })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Usage every pair in this swapchain was built for
    pub fn usage(&self) -> UsageIntent {
        self.usage
    }

    pub fn image(&self, index: usize) -> Result<&SharedImage<A>> {
        Ok(&self.entry(index)?.image)
    }

    /// Sequence handing image `index` to the application
    pub fn acquire(&self, index: usize) -> Result<&AcquireSequence<A>> {
        Ok(&self.entry(index)?.handoff.acquire)
    }

    /// Sequence handing image `index` back to the compositor
    pub fn release(&self, index: usize) -> Result<&ReleaseSequence<A>> {
        Ok(&self.entry(index)?.handoff.release)
    }

    /// Rebuild the pair of one image, leaving the others untouched
    ///
    /// The old pair is kept if building the new one fails.
    pub fn rebuild(
        &mut self,
        index: usize,
        device: &A::Device,
        allocator: &A::CommandAllocator,
        config: &InteropConfig,
    ) -> Result<()> {
        let usage = self.usage;
        let count = self.images.len();
        let entry = self
            .images
            .get_mut(index)
            .ok_or(InteropError::ImageIndexOutOfRange { index, count })?;

        entry.handoff = build_handoff::<A>(device, allocator, entry.image.raw(), usage, config)?;

        tracing::debug!(index, ?usage, "Rebuilt swapchain hand-off pair");
        Ok(())
    }

    fn entry(&self, index: usize) -> Result<&SwapchainImage<A>> {
        self.images.get(index).ok_or(InteropError::ImageIndexOutOfRange {
            index,
            count: self.images.len(),
        })
    }
}

impl<A: NativeApi> std::fmt::Debug for SwapchainInterop<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapchainInterop")
            .field("usage", &self.usage)
            .field("images", &self.images.len())
            .finish()
    }
}

//! Native Graphics API Seam
//!
//! Everything the interop layer needs from the graphics API, expressed as one
//! trait with associated object types. The builders are generic over it, so
//! the Direct3D 12 implementation and a recording implementation used in tests
//! go through the same code paths.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  device / import / handoff / copy builders   │
//! └──────────────────────┬───────────────────────┘
//!                        │ NativeApi
//!          ┌─────────────┴─────────────┐
//!   ┌──────┴──────┐             ┌──────┴──────┐
//!   │    D3D12    │             │  recording  │
//!   │  (Windows)  │             │   (tests)   │
//!   └─────────────┘             └─────────────┘
//! ```

use crate::error::NativeStatus;
use crate::handle::SharedHandle;
use crate::states::{CommandListKind, FeatureLevel, ResourceStates};

/// Barrier target meaning every subresource of the image
pub const ALL_SUBRESOURCES: u32 = 0xFFFF_FFFF;

/// One state transition of one image inside a barrier batch
#[derive(Debug)]
pub struct Transition<'a, I> {
    pub image: &'a I,
    pub subresource: u32,
    pub before: ResourceStates,
    pub after: ResourceStates,
}

/// Graphics API backing the interop layer
///
/// Object types follow the native reference-counting model: cloning an image
/// or fence adds a local reference, dropping it releases that reference only.
pub trait NativeApi: Sized + 'static {
    /// Adapter hint for device selection
    type Adapter;
    /// Logical device, owned by the caller
    type Device;
    /// GPU image
    type Image: Clone;
    /// Shared timeline fence
    type Fence: Clone;
    /// Caller-owned allocator command lists are recorded against
    type CommandAllocator;
    /// Open command list that still accepts commands
    type CommandList;
    /// Closed command list; exposes nothing but submission
    type SubmitList;

    fn create_device(
        adapter: Option<&Self::Adapter>,
        feature_level: FeatureLevel,
    ) -> Result<Self::Device, NativeStatus>;

    /// Open a shared image; `handle` is never null here
    fn open_shared_image(
        device: &Self::Device,
        handle: SharedHandle,
    ) -> Result<Self::Image, NativeStatus>;

    /// Open a shared fence; `handle` is never null here
    fn open_shared_fence(
        device: &Self::Device,
        handle: SharedHandle,
    ) -> Result<Self::Fence, NativeStatus>;

    /// Last value the GPU signalled on the fence
    fn fence_completed_value(fence: &Self::Fence) -> u64;

    fn create_command_list(
        device: &Self::Device,
        allocator: &Self::CommandAllocator,
        kind: CommandListKind,
    ) -> Result<Self::CommandList, NativeStatus>;

    /// Record one batched barrier holding every transition in order
    fn resource_barriers(list: &mut Self::CommandList, transitions: &[Transition<'_, Self::Image>]);

    /// Copy one subresource from `src` to the same subresource of `dst`
    fn copy_subresource(
        list: &mut Self::CommandList,
        src: &Self::Image,
        dst: &Self::Image,
        subresource: u32,
    );

    fn close_command_list(list: Self::CommandList) -> Result<Self::SubmitList, NativeStatus>;
}

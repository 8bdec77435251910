//! Direct3D 12 backend
//!
//! Implements [`NativeApi`] over the raw `windows` crate bindings. Objects are
//! COM interfaces, so cloning one is an `AddRef` and dropping one a `Release`;
//! shared handles are opened but never closed here.

use std::mem::ManuallyDrop;

use windows::core::{IUnknown, Interface};
use windows::Win32::Graphics::Direct3D::D3D_FEATURE_LEVEL;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::IDXGIAdapter;

use crate::api::{NativeApi, Transition};
use crate::error::NativeStatus;
use crate::handle::SharedHandle;
use crate::states::{CommandListKind, FeatureLevel, ResourceStates};

/// Direct3D 12 backend marker
#[derive(Debug, Clone, Copy)]
pub enum D3D12 {}

impl NativeApi for D3D12 {
    type Adapter = IDXGIAdapter;
    type Device = ID3D12Device;
    type Image = ID3D12Resource;
    type Fence = ID3D12Fence1;
    type CommandAllocator = ID3D12CommandAllocator;
    type CommandList = ID3D12GraphicsCommandList;
    type SubmitList = ID3D12CommandList;

    fn create_device(
        adapter: Option<&IDXGIAdapter>,
        feature_level: FeatureLevel,
    ) -> Result<ID3D12Device, NativeStatus> {
        let adapter = adapter.map(|adapter| adapter.cast::<IUnknown>()).transpose()?;
        let mut device: Option<ID3D12Device> = None;
        unsafe {
            D3D12CreateDevice(
                adapter.as_ref(),
                D3D_FEATURE_LEVEL(feature_level.raw()),
                &mut device,
            )?;
        }
        device.ok_or(NativeStatus::E_NOINTERFACE)
    }

    fn open_shared_image(
        device: &ID3D12Device,
        handle: SharedHandle,
    ) -> Result<ID3D12Resource, NativeStatus> {
        let resource = unsafe { device.OpenSharedHandle::<ID3D12Resource>(handle.into())? };
        Ok(resource)
    }

    fn open_shared_fence(
        device: &ID3D12Device,
        handle: SharedHandle,
    ) -> Result<ID3D12Fence1, NativeStatus> {
        let fence = unsafe { device.OpenSharedHandle::<ID3D12Fence1>(handle.into())? };
        Ok(fence)
    }

    fn fence_completed_value(fence: &ID3D12Fence1) -> u64 {
        unsafe { fence.GetCompletedValue() }
    }

    fn create_command_list(
        device: &ID3D12Device,
        allocator: &ID3D12CommandAllocator,
        kind: CommandListKind,
    ) -> Result<ID3D12GraphicsCommandList, NativeStatus> {
        let list = unsafe {
            device.CreateCommandList::<_, _, ID3D12GraphicsCommandList>(
                0,
                D3D12_COMMAND_LIST_TYPE(kind.raw()),
                allocator,
                None::<&ID3D12PipelineState>,
            )?
        };
        Ok(list)
    }

    fn resource_barriers(
        list: &mut ID3D12GraphicsCommandList,
        transitions: &[Transition<'_, ID3D12Resource>],
    ) {
        let barriers: Vec<D3D12_RESOURCE_BARRIER> = transitions
            .iter()
            .map(|transition| {
                transition_barrier(
                    transition.image,
                    transition.subresource,
                    transition.before,
                    transition.after,
                )
            })
            .collect();

        unsafe { list.ResourceBarrier(&barriers) };
    }

    fn copy_subresource(
        list: &mut ID3D12GraphicsCommandList,
        src: &ID3D12Resource,
        dst: &ID3D12Resource,
        subresource: u32,
    ) {
        let src_location = copy_location(src, subresource);
        let dst_location = copy_location(dst, subresource);

        unsafe { list.CopyTextureRegion(&dst_location, 0, 0, 0, &src_location, None) };
    }

    fn close_command_list(
        list: ID3D12GraphicsCommandList,
    ) -> Result<ID3D12CommandList, NativeStatus> {
        unsafe { list.Close()? };
        Ok(list.cast::<ID3D12CommandList>()?)
    }
}

/// Transition barrier borrowing `resource`
///
/// The resource pointer is copied without `AddRef`; `ManuallyDrop` keeps the
/// barrier from releasing it, so `resource` must outlive the barrier.
fn transition_barrier(
    resource: &ID3D12Resource,
    subresource: u32,
    before: ResourceStates,
    after: ResourceStates,
) -> D3D12_RESOURCE_BARRIER {
    D3D12_RESOURCE_BARRIER {
        Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
        Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
        Anonymous: D3D12_RESOURCE_BARRIER_0 {
            Transition: ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                pResource: unsafe { std::mem::transmute_copy(resource) },
                Subresource: subresource,
                StateBefore: D3D12_RESOURCE_STATES(before.raw()),
                StateAfter: D3D12_RESOURCE_STATES(after.raw()),
            }),
        },
    }
}

/// Subresource-index copy location borrowing `resource`
fn copy_location(resource: &ID3D12Resource, subresource: u32) -> D3D12_TEXTURE_COPY_LOCATION {
    D3D12_TEXTURE_COPY_LOCATION {
        pResource: unsafe { std::mem::transmute_copy(resource) },
        Type: D3D12_TEXTURE_COPY_TYPE_SUBRESOURCE_INDEX,
        Anonymous: D3D12_TEXTURE_COPY_LOCATION_0 {
            SubresourceIndex: subresource,
        },
    }
}

mod common;

use common::{device_with_images, MockAllocator, NativeOp, Recording};
use xr_gpu_interop::copy::COPY_SUBRESOURCE;
use xr_gpu_interop::{
    build_copy, BuildStage, ImageRole, InteropConfig, InteropError, RecordedCommand, ResourceState,
    ResourceStates, UsageIntent, ALL_SUBRESOURCES,
};

const SRC: usize = 0x100;
const DST: usize = 0x200;

#[test]
fn test_copy_from_compositor_to_render_target() -> anyhow::Result<()> {
    let (device, images) = device_with_images(&[SRC, DST]);
    let src_state = ResourceState::CompositorReadable;
    let dst_state = ResourceState::ApplicationUsable(UsageIntent::COLOR);

    let sequence = build_copy::<Recording>(
        &device,
        &MockAllocator,
        &images[0],
        &images[1],
        src_state,
        dst_state,
        &InteropConfig::default(),
    )?;

    let commands = sequence.commands();
    assert_eq!(commands.len(), 3);
    assert_eq!(sequence.barrier_count(), 2);
    assert_eq!(sequence.copy_count(), 1);

    let RecordedCommand::Barrier(pre) = &commands[0] else {
        panic!("expected pre-copy barrier, got {:?}", commands[0]);
    };
    let RecordedCommand::Barrier(post) = &commands[2] else {
        panic!("expected post-copy barrier, got {:?}", commands[2]);
    };
    assert_eq!(
        commands[1],
        RecordedCommand::CopySubresource {
            subresource: COPY_SUBRESOURCE
        }
    );

    assert_eq!(pre[0].role, ImageRole::Source);
    assert_eq!(pre[0].before, ResourceStates::GENERIC_READ);
    assert_eq!(pre[0].after, ResourceStates::COPY_SOURCE);
    assert_eq!(pre[1].role, ImageRole::Destination);
    assert_eq!(pre[1].before, ResourceStates::RENDER_TARGET);
    assert_eq!(pre[1].after, ResourceStates::COPY_DEST);

    // Post barrier restores what the pre barrier left
    for (pre, post) in pre.iter().zip(post) {
        assert_eq!(post.role, pre.role);
        assert_eq!(post.before, pre.after);
        assert_eq!(post.after, pre.before);
        assert_eq!(post.subresource, ALL_SUBRESOURCES);
    }
    Ok(())
}

#[test]
fn test_native_order_is_source_first() -> anyhow::Result<()> {
    let (device, images) = device_with_images(&[SRC, DST]);

    let sequence = build_copy::<Recording>(
        &device,
        &MockAllocator,
        &images[0],
        &images[1],
        ResourceState::ApplicationUsable(UsageIntent::SAMPLED),
        ResourceState::CompositorReadable,
        &InteropConfig::default(),
    )?;

    let ops = &sequence.submit_list().ops;
    assert_eq!(ops.len(), 3);
    for index in [0, 2] {
        let NativeOp::Barrier(barriers) = &ops[index] else {
            panic!("expected barrier at {index}, got {:?}", ops[index]);
        };
        assert_eq!(barriers.len(), 2);
        assert_eq!(barriers[0].image, SRC);
        assert_eq!(barriers[1].image, DST);
    }
    assert_eq!(
        ops[1],
        NativeOp::Copy {
            src: SRC,
            dst: DST,
            subresource: 0
        }
    );
    assert_eq!(device.lists_created.get(), 1);
    Ok(())
}

#[test]
fn test_copy_uses_configured_compositor_state() -> anyhow::Result<()> {
    let (device, images) = device_with_images(&[SRC, DST]);
    let config = InteropConfig {
        compositor_state: ResourceStates::NON_PIXEL_SHADER_RESOURCE,
        ..InteropConfig::default()
    };

    let sequence = build_copy::<Recording>(
        &device,
        &MockAllocator,
        &images[0],
        &images[1],
        ResourceState::CompositorReadable,
        ResourceState::CompositorReadable,
        &config,
    )?;

    let transitions: Vec<_> = sequence.transitions().collect();
    assert_eq!(transitions.len(), 4);
    assert_eq!(transitions[0].before, ResourceStates::NON_PIXEL_SHADER_RESOURCE);
    assert_eq!(transitions[1].before, ResourceStates::NON_PIXEL_SHADER_RESOURCE);
    assert_eq!(transitions[2].after, ResourceStates::NON_PIXEL_SHADER_RESOURCE);
    assert_eq!(transitions[3].after, ResourceStates::NON_PIXEL_SHADER_RESOURCE);
    Ok(())
}

#[test]
fn test_copy_close_failure_returns_nothing() {
    let (device, images) = device_with_images(&[SRC, DST]);
    device.fail_list_close(0);

    let result = build_copy::<Recording>(
        &device,
        &MockAllocator,
        &images[0],
        &images[1],
        ResourceState::CompositorReadable,
        ResourceState::ApplicationUsable(UsageIntent::COLOR),
        &InteropConfig::default(),
    );

    assert!(matches!(
        result,
        Err(InteropError::CommandBuild {
            stage: BuildStage::Close,
            ..
        })
    ));
}

#[test]
fn test_copy_creation_failure_returns_nothing() {
    let (device, images) = device_with_images(&[SRC, DST]);
    device.fail_list_creation(0);

    let result = build_copy::<Recording>(
        &device,
        &MockAllocator,
        &images[0],
        &images[1],
        ResourceState::CompositorReadable,
        ResourceState::CompositorReadable,
        &InteropConfig::default(),
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        InteropError::CommandBuild {
            stage: BuildStage::Create,
            ..
        }
    ));
    assert!(err.native_status().is_some());
}

#[test]
fn test_images_already_in_copy_states_skip_native_barriers() -> anyhow::Result<()> {
    let (device, images) = device_with_images(&[SRC, DST]);

    let sequence = build_copy::<Recording>(
        &device,
        &MockAllocator,
        &images[0],
        &images[1],
        ResourceState::ApplicationUsable(UsageIntent::TRANSFER_SRC),
        ResourceState::ApplicationUsable(UsageIntent::TRANSFER_DST),
        &InteropConfig::default(),
    )?;

    // Both barrier steps are still described around the copy
    assert_eq!(sequence.barrier_count(), 2);
    assert_eq!(sequence.copy_count(), 1);
    assert_eq!(sequence.transitions().count(), 4);

    assert_eq!(
        sequence.submit_list().ops,
        vec![NativeOp::Copy {
            src: SRC,
            dst: DST,
            subresource: COPY_SUBRESOURCE
        }]
    );
    Ok(())
}

#[test]
fn test_native_barriers_never_repeat_a_state() -> anyhow::Result<()> {
    let (device, images) = device_with_images(&[SRC, DST]);

    let sequence = build_copy::<Recording>(
        &device,
        &MockAllocator,
        &images[0],
        &images[1],
        ResourceState::ApplicationUsable(UsageIntent::TRANSFER_SRC),
        ResourceState::ApplicationUsable(UsageIntent::COLOR),
        &InteropConfig::default(),
    )?;

    let ops = &sequence.submit_list().ops;
    assert_eq!(ops.len(), 3);
    for index in [0, 2] {
        let NativeOp::Barrier(barriers) = &ops[index] else {
            panic!("expected barrier at {index}, got {:?}", ops[index]);
        };
        assert_eq!(barriers.len(), 1);
        assert_eq!(barriers[0].image, DST);
        assert_ne!(barriers[0].before, barriers[0].after);
    }
    Ok(())
}

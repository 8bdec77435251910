//! Recording backend for the interop integration tests
//!
//! `Recording` implements `NativeApi` without a GPU. Devices remember every
//! shared object opened through them, command lists record what was issued,
//! and failures can be injected at each native step.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

use xr_gpu_interop::{
    CommandListKind, FeatureLevel, NativeApi, NativeStatus, ResourceStates, SharedHandle,
    Transition,
};

pub enum Recording {}

#[derive(Debug, Clone)]
pub struct MockAdapter {
    pub max_level: FeatureLevel,
}

/// Stand-in for the cross-process original behind a shared handle
#[derive(Debug)]
pub struct SharedObject {
    pub handle: SharedHandle,
    pub value: Cell<u64>,
}

#[derive(Debug, Clone)]
pub struct MockImage {
    pub object: Rc<SharedObject>,
}

impl MockImage {
    pub fn id(&self) -> usize {
        self.object.handle.as_raw()
    }
}

#[derive(Debug, Clone)]
pub struct MockFence {
    pub object: Rc<SharedObject>,
}

#[derive(Debug, Default)]
pub struct MockAllocator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBarrier {
    pub image: usize,
    pub subresource: u32,
    pub before: ResourceStates,
    pub after: ResourceStates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeOp {
    Barrier(Vec<NativeBarrier>),
    Copy {
        src: usize,
        dst: usize,
        subresource: u32,
    },
}

/// Open list; only reachable through the builders
#[derive(Debug)]
pub struct MockList {
    pub kind: CommandListKind,
    pub ops: Vec<NativeOp>,
    fail_close: bool,
}

/// Closed list; nothing can be recorded into it
#[derive(Debug, Clone)]
pub struct ClosedList {
    pub kind: CommandListKind,
    pub ops: Vec<NativeOp>,
}

#[derive(Debug)]
pub struct MockDevice {
    pub feature_level: FeatureLevel,
    images: RefCell<HashMap<usize, Rc<SharedObject>>>,
    fences: RefCell<HashMap<usize, Rc<SharedObject>>>,
    rejected: RefCell<HashSet<usize>>,
    pub image_opens: Cell<usize>,
    pub fence_opens: Cell<usize>,
    pub lists_created: Cell<usize>,
    fail_create_at: Cell<Option<usize>>,
    fail_close_at: Cell<Option<usize>>,
}

impl MockDevice {
    pub fn new(feature_level: FeatureLevel) -> Self {
        Self {
            feature_level,
            images: RefCell::default(),
            fences: RefCell::default(),
            rejected: RefCell::default(),
            image_opens: Cell::new(0),
            fence_opens: Cell::new(0),
            lists_created: Cell::new(0),
            fail_create_at: Cell::new(None),
            fail_close_at: Cell::new(None),
        }
    }

    /// Make opening `handle` fail the way a foreign or revoked handle does
    pub fn reject(&self, handle: SharedHandle) {
        self.rejected.borrow_mut().insert(handle.as_raw());
    }

    /// Fail creation of the `n`th command list (0-based, counted across builds)
    pub fn fail_list_creation(&self, n: usize) {
        self.fail_create_at.set(Some(n));
    }

    /// Fail closing of the `n`th command list created
    pub fn fail_list_close(&self, n: usize) {
        self.fail_close_at.set(Some(n));
    }

    pub fn clear_failures(&self) {
        self.fail_create_at.set(None);
        self.fail_close_at.set(None);
    }

    /// Signal a shared fence as the other process would
    pub fn signal(&self, handle: SharedHandle, value: u64) {
        let object = Rc::clone(
            self.fences
                .borrow_mut()
                .entry(handle.as_raw())
                .or_insert_with(|| shared_object(handle)),
        );
        object.value.set(value);
    }

    /// The original object behind an image handle, if it was ever opened
    pub fn shared_image(&self, handle: SharedHandle) -> Option<Rc<SharedObject>> {
        self.images.borrow().get(&handle.as_raw()).cloned()
    }

    pub fn native_calls(&self) -> usize {
        self.image_opens.get() + self.fence_opens.get() + self.lists_created.get()
    }

    fn open(
        &self,
        table: &RefCell<HashMap<usize, Rc<SharedObject>>>,
        handle: SharedHandle,
    ) -> Result<Rc<SharedObject>, NativeStatus> {
        if self.rejected.borrow().contains(&handle.as_raw()) {
            return Err(NativeStatus::E_INVALIDARG);
        }
        let object = table
            .borrow_mut()
            .entry(handle.as_raw())
            .or_insert_with(|| shared_object(handle))
            .clone();
        Ok(object)
    }
}

fn shared_object(handle: SharedHandle) -> Rc<SharedObject> {
    Rc::new(SharedObject {
        handle,
        value: Cell::new(0),
    })
}

impl NativeApi for Recording {
    type Adapter = MockAdapter;
    type Device = MockDevice;
    type Image = MockImage;
    type Fence = MockFence;
    type CommandAllocator = MockAllocator;
    type CommandList = MockList;
    type SubmitList = ClosedList;

    fn create_device(
        adapter: Option<&MockAdapter>,
        feature_level: FeatureLevel,
    ) -> Result<MockDevice, NativeStatus> {
        match adapter {
            Some(adapter) if adapter.max_level < feature_level => {
                Err(NativeStatus::DXGI_ERROR_UNSUPPORTED)
            }
            _ => Ok(MockDevice::new(feature_level)),
        }
    }

    fn open_shared_image(device: &MockDevice, handle: SharedHandle) -> Result<MockImage, NativeStatus> {
        device.image_opens.set(device.image_opens.get() + 1);
        let object = device.open(&device.images, handle)?;
        Ok(MockImage { object })
    }

    fn open_shared_fence(device: &MockDevice, handle: SharedHandle) -> Result<MockFence, NativeStatus> {
        device.fence_opens.set(device.fence_opens.get() + 1);
        let object = device.open(&device.fences, handle)?;
        Ok(MockFence { object })
    }

    fn fence_completed_value(fence: &MockFence) -> u64 {
        fence.object.value.get()
    }

    fn create_command_list(
        device: &MockDevice,
        _allocator: &MockAllocator,
        kind: CommandListKind,
    ) -> Result<MockList, NativeStatus> {
        let index = device.lists_created.get();
        device.lists_created.set(index + 1);

        if device.fail_create_at.get() == Some(index) {
            return Err(NativeStatus::E_OUTOFMEMORY);
        }

        Ok(MockList {
            kind,
            ops: Vec::new(),
            fail_close: device.fail_close_at.get() == Some(index),
        })
    }

    fn resource_barriers(list: &mut MockList, transitions: &[Transition<'_, MockImage>]) {
        let barriers = transitions
            .iter()
            .map(|transition| NativeBarrier {
                image: transition.image.id(),
                subresource: transition.subresource,
                before: transition.before,
                after: transition.after,
            })
            .collect();
        list.ops.push(NativeOp::Barrier(barriers));
    }

    fn copy_subresource(list: &mut MockList, src: &MockImage, dst: &MockImage, subresource: u32) {
        list.ops.push(NativeOp::Copy {
            src: src.id(),
            dst: dst.id(),
            subresource,
        });
    }

    fn close_command_list(list: MockList) -> Result<ClosedList, NativeStatus> {
        if list.fail_close {
            return Err(NativeStatus::DXGI_ERROR_DEVICE_REMOVED);
        }
        Ok(ClosedList {
            kind: list.kind,
            ops: list.ops,
        })
    }
}

pub fn device() -> MockDevice {
    MockDevice::new(FeatureLevel::default())
}

/// Device with one shared image already opened per handle
pub fn device_with_images(handles: &[usize]) -> (MockDevice, Vec<MockImage>) {
    let device = device();
    let images = handles
        .iter()
        .map(|&raw| {
            let handle = SharedHandle::from_raw(raw);
            let object = device
                .open(&device.images, handle)
                .expect("mock open never fails for unrejected handles");
            MockImage { object }
        })
        .collect();
    (device, images)
}

/// Captured tracing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<CapturedEvent>>>);

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

/// Run `f` with a subscriber that records every event it emits
pub fn capture_events<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let log = EventLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let events = log.0.lock().unwrap().clone();
    (result, events)
}

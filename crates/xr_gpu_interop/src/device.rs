//! Device Context Factory
//!
//! Creates the logical device every other operation runs against. Creation is
//! attempted once; a failure is fatal to the caller's initialization path and
//! carries the native status so the caller can try a different adapter.

use crate::api::NativeApi;
use crate::config::InteropConfig;
use crate::error::{InteropError, Result};
use crate::states::FeatureLevel;

/// Create a device at `feature_level`, optionally on a specific adapter
pub fn create_device<A: NativeApi>(
    adapter: Option<&A::Adapter>,
    feature_level: FeatureLevel,
) -> Result<A::Device> {
    if adapter.is_some() {
        tracing::debug!("Adapter provided.");
    }

    A::create_device(adapter, feature_level)
        .map_err(|status| InteropError::DeviceCreation { status })
}

/// Create a device at the configured minimum feature level
pub fn create_device_with_config<A: NativeApi>(
    adapter: Option<&A::Adapter>,
    config: &InteropConfig,
) -> Result<A::Device> {
    create_device::<A>(adapter, config.feature_level)
}

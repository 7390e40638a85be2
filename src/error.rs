//! Error types for renderer setup and configuration loading.
//!
//! Gameplay itself never fails: running out of free slots or lives is game
//! state, not an error.

use thiserror::Error;

/// Errors that can occur while bringing up the WebGPU renderer.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for the canvas.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible adapter found.
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create the device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// Surface reported no usable texture format.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors from parsing or validating a [`crate::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("initial slot count must be at least 1")]
    NoSlots,
    #[error("lives must be between 1 and {max}, got {got}")]
    LivesOutOfRange { got: u8, max: u8 },
    #[error("spawn period must be at least one tick")]
    ZeroSpawnPeriod,
    #[error("spawn interval must be at least 1 (floor {floor}, initial {initial})")]
    ZeroSpawnInterval { initial: u32, floor: u32 },
    #[error("{name} must be a finite, non-negative number")]
    BadNumber { name: &'static str },
}

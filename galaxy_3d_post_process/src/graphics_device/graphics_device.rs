/// GraphicsDevice trait - GPU operations needed by post processing

use bitflags::bitflags;
use crate::error::Result;
use crate::graphics_device::{RenderTargetDesc, RenderTargetId, RenderTargetInfo};

/// Capabilities reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Largest texture dimension the device accepts
    pub max_texture_size: u32,
    /// Largest MSAA sample count the device accepts
    pub max_msaa_samples: u32,
    /// Mipmapped textures must have power-of-two dimensions
    pub needs_power_of_two_textures: bool,
    /// The default framebuffer has a stencil buffer
    pub stencil_enabled: bool,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            max_texture_size: 16384,
            max_msaa_samples: 4,
            needs_power_of_two_textures: false,
            stencil_enabled: true,
        }
    }
}

/// Viewport expressed as fractions of the render surface (0.0 ..= 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, width: 1.0, height: 1.0 }
    }
}

bitflags! {
    /// Buffers written by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// GPU collaborator used by the post-process texture manager
///
/// All calls are synchronous and made from the render thread.
pub trait GraphicsDevice {
    /// Static capabilities of the device
    fn capabilities(&self) -> DeviceCapabilities;

    /// Current render width in pixels (hardware scaling applied)
    fn render_width(&self) -> u32;

    /// Current render height in pixels (hardware scaling applied)
    fn render_height(&self) -> u32;

    /// Viewport currently set on the device, if any
    fn current_viewport(&self) -> Option<Viewport>;

    /// Allocate a render target
    ///
    /// Zero-sized requests must fail with `Error::InvalidSize`.
    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetId>;

    /// Properties of a live render target, `None` once disposed
    fn render_target_info(&self, id: RenderTargetId) -> Option<RenderTargetInfo>;

    /// Change the MSAA sample count of a render target in place
    ///
    /// Returns the sample count actually applied.
    fn update_render_target_sample_count(&mut self, id: RenderTargetId, samples: u32) -> Result<u32>;

    /// Bind a render target as the draw destination
    ///
    /// `size` restricts rendering to the `(0, 0, width, height)` sub-rectangle.
    fn bind_framebuffer(
        &mut self,
        id: RenderTargetId,
        mip_level: u32,
        size: Option<(u32, u32)>,
        force_full_viewport: bool,
    ) -> Result<()>;

    /// Clear the bound render target
    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) -> Result<()>;

    /// Release a render target
    ///
    /// Returns `false` if the target was already released (no-op).
    fn dispose_render_target(&mut self, id: RenderTargetId) -> bool;
}

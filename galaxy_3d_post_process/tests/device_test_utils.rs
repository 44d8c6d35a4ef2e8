#![allow(dead_code)]
//! Device test utilities - In-memory GraphicsDevice for integration tests
//!
//! `RecordingDevice` keeps render target metadata in a slot map and records
//! binds, clears and disposals so tests can check what the manager asked the
//! GPU to do. No GPU required.

use galaxy_3d_post_process::galaxy3d::render::{
    ClearFlags, DeviceCapabilities, GraphicsDevice, RenderTargetDesc, RenderTargetId,
    RenderTargetInfo, Viewport,
};
use galaxy_3d_post_process::galaxy3d::{Error, Result};
use slotmap::SlotMap;

/// In-memory device rendering at a configurable size
pub struct RecordingDevice {
    pub capabilities: DeviceCapabilities,
    pub width: u32,
    pub height: u32,
    pub viewport: Option<Viewport>,
    pub targets: SlotMap<RenderTargetId, RenderTargetInfo>,
    pub created: Vec<RenderTargetId>,
    pub disposed: Vec<RenderTargetId>,
    pub binds: Vec<(RenderTargetId, Option<(u32, u32)>)>,
    pub clears: Vec<([f32; 4], ClearFlags)>,
}

impl RecordingDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            capabilities: DeviceCapabilities::default(),
            width,
            height,
            viewport: None,
            targets: SlotMap::with_key(),
            created: Vec::new(),
            disposed: Vec::new(),
            binds: Vec::new(),
            clears: Vec::new(),
        }
    }

    /// Simulate a window resize
    pub fn resize_window(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn live_count(&self) -> usize {
        self.targets.len()
    }

    pub fn info(&self, id: RenderTargetId) -> RenderTargetInfo {
        self.targets[id].clone()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn render_width(&self) -> u32 {
        self.width
    }

    fn render_height(&self) -> u32 {
        self.height
    }

    fn current_viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetId> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidSize { width: desc.width, height: desc.height });
        }
        let id = self.targets.insert(RenderTargetInfo::from_desc(desc));
        self.created.push(id);
        Ok(id)
    }

    fn render_target_info(&self, id: RenderTargetId) -> Option<RenderTargetInfo> {
        self.targets.get(id).cloned()
    }

    fn update_render_target_sample_count(&mut self, id: RenderTargetId, samples: u32) -> Result<u32> {
        match self.targets.get_mut(id) {
            Some(info) => {
                info.samples = samples;
                Ok(samples)
            }
            None => Err(Error::InvalidResource("unknown render target".to_string())),
        }
    }

    fn bind_framebuffer(
        &mut self,
        id: RenderTargetId,
        _mip_level: u32,
        size: Option<(u32, u32)>,
        _force_full_viewport: bool,
    ) -> Result<()> {
        if !self.targets.contains_key(id) {
            return Err(Error::InvalidResource("binding a released render target".to_string()));
        }
        self.binds.push((id, size));
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) -> Result<()> {
        self.clears.push((color, flags));
        Ok(())
    }

    fn dispose_render_target(&mut self, id: RenderTargetId) -> bool {
        let released = self.targets.remove(id).is_some();
        if released {
            self.disposed.push(id);
        }
        released
    }
}

/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Keeps render targets in a slot map and records every call so tests can
/// assert on allocations, bindings, clears and disposals.

use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    ClearFlags, DeviceCapabilities, GraphicsDevice, RenderTargetDesc, RenderTargetId,
    RenderTargetInfo, Viewport,
};

/// A recorded `bind_framebuffer` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindCall {
    pub target: RenderTargetId,
    pub mip_level: u32,
    pub size: Option<(u32, u32)>,
    pub force_full_viewport: bool,
}

/// A recorded `clear` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearCall {
    pub color: [f32; 4],
    pub flags: ClearFlags,
}

/// Mock device that tracks created resources without GPU
#[derive(Debug)]
pub struct MockGraphicsDevice {
    pub capabilities: DeviceCapabilities,
    pub render_width: u32,
    pub render_height: u32,
    pub viewport: Option<Viewport>,
    pub targets: SlotMap<RenderTargetId, RenderTargetInfo>,
    /// Number of successful `create_render_target` calls
    pub created_count: usize,
    /// Targets released through `dispose_render_target`
    pub disposed: Vec<RenderTargetId>,
    /// `dispose_render_target` calls on already released targets
    pub redundant_disposals: usize,
    pub sample_updates: Vec<(RenderTargetId, u32)>,
    pub binds: Vec<BindCall>,
    pub clears: Vec<ClearCall>,
    /// Fail the next `create_render_target` with `ResourceCreationFailure`
    pub fail_next_create: bool,
    /// Maximum number of live render targets before `OutOfMemory`
    pub memory_budget: Option<usize>,
}

impl MockGraphicsDevice {
    /// Create a mock device rendering at `width` x `height`
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            capabilities: DeviceCapabilities::default(),
            render_width: width,
            render_height: height,
            viewport: None,
            targets: SlotMap::with_key(),
            created_count: 0,
            disposed: Vec::new(),
            redundant_disposals: 0,
            sample_updates: Vec::new(),
            binds: Vec::new(),
            clears: Vec::new(),
            fail_next_create: false,
            memory_budget: None,
        }
    }

    /// Number of live render targets
    pub fn live_count(&self) -> usize {
        self.targets.len()
    }

    /// Last recorded bind call
    pub fn last_bind(&self) -> Option<BindCall> {
        self.binds.last().copied()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn render_width(&self) -> u32 {
        self.render_width
    }

    fn render_height(&self) -> u32 {
        self.render_height
    }

    fn current_viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<RenderTargetId> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidSize { width: desc.width, height: desc.height });
        }
        if self.fail_next_create {
            self.fail_next_create = false;
            return Err(Error::ResourceCreationFailure(format!("mock refused '{}'", desc.label)));
        }
        let max = self.capabilities.max_texture_size;
        if desc.width > max || desc.height > max {
            return Err(Error::ResourceCreationFailure(format!(
                "{}x{} exceeds max texture size {}",
                desc.width, desc.height, max
            )));
        }
        if self.memory_budget.is_some_and(|budget| self.targets.len() >= budget) {
            return Err(Error::OutOfMemory);
        }
        self.created_count += 1;
        Ok(self.targets.insert(RenderTargetInfo::from_desc(desc)))
    }

    fn render_target_info(&self, id: RenderTargetId) -> Option<RenderTargetInfo> {
        self.targets.get(id).cloned()
    }

    fn update_render_target_sample_count(&mut self, id: RenderTargetId, samples: u32) -> Result<u32> {
        let info = self
            .targets
            .get_mut(id)
            .ok_or_else(|| Error::InvalidResource("mock: unknown render target".to_string()))?;
        info.samples = samples;
        self.sample_updates.push((id, samples));
        Ok(samples)
    }

    fn bind_framebuffer(
        &mut self,
        id: RenderTargetId,
        mip_level: u32,
        size: Option<(u32, u32)>,
        force_full_viewport: bool,
    ) -> Result<()> {
        if !self.targets.contains_key(id) {
            return Err(Error::InvalidResource("mock: binding a released render target".to_string()));
        }
        self.binds.push(BindCall { target: id, mip_level, size, force_full_viewport });
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) -> Result<()> {
        self.clears.push(ClearCall { color, flags });
        Ok(())
    }

    fn dispose_render_target(&mut self, id: RenderTargetId) -> bool {
        if self.targets.remove(id).is_some() {
            self.disposed.push(id);
            true
        } else {
            self.redundant_disposals += 1;
            false
        }
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;

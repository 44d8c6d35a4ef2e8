/// Per post process render target cache.
///
/// Render targets are keyed by (width, height, channel, depth, samples) so a
/// window that toggles between two sizes reuses its targets instead of
/// reallocating every time. Entries not used for more than
/// `STALE_RENDER_ID_WINDOW` activations are released, unless a slot still
/// references them.

use crate::engine_debug;
use crate::engine_trace;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, RenderTargetDesc, RenderTargetId};

/// Activations an entry may stay unused before it is evicted
pub const STALE_RENDER_ID_WINDOW: u64 = 100;

/// Lookup key of a cached render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub width: u32,
    pub height: u32,
    /// Slot channel (0, or 1 for the second buffer of a reusable post process)
    pub channel: u32,
    pub depth: bool,
    pub samples: u32,
}

impl CacheKey {
    pub fn from_desc(desc: &RenderTargetDesc, channel: u32) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            channel,
            depth: desc.generate_depth_buffer,
            samples: desc.samples,
        }
    }
}

/// One cached render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub handle: RenderTargetId,
    pub key: CacheKey,
    /// Render id at which the target was last bound
    pub last_used: u64,
}

/// Render target cache owned by a single post process
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: Vec<CacheEntry>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn contains(&self, handle: RenderTargetId) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn entry(&self, handle: RenderTargetId) -> Option<&CacheEntry> {
        self.entries.iter().find(|e| e.handle == handle)
    }

    /// Return the cached target matching `desc`/`channel`, or allocate one
    ///
    /// A new entry is stamped with `render_id`. Hits do not refresh the stamp;
    /// only `touch` does.
    pub fn get_or_create(
        &mut self,
        device: &mut dyn GraphicsDevice,
        desc: &RenderTargetDesc,
        channel: u32,
        render_id: u64,
    ) -> Result<RenderTargetId> {
        let key = CacheKey::from_desc(desc, channel);

        if let Some(entry) = self.entries.iter().find(|e| e.key == key) {
            engine_trace!("galaxy3d::TextureCache",
                "Cache hit for '{}' {}x{} channel {}", desc.label, key.width, key.height, channel);
            return Ok(entry.handle);
        }

        let handle = device.create_render_target(desc)?;
        self.entries.push(CacheEntry { handle, key, last_used: render_id });

        engine_debug!("galaxy3d::TextureCache",
            "Allocated '{}' {}x{} channel {} ({} cached)",
            desc.label, key.width, key.height, channel, self.entries.len());

        Ok(handle)
    }

    /// Mark `handle` as used at `render_id`
    ///
    /// Returns false if the handle is not cached here.
    pub fn touch(&mut self, handle: RenderTargetId, render_id: u64) -> bool {
        match self.entries.iter_mut().find(|e| e.handle == handle) {
            Some(entry) => {
                entry.last_used = render_id;
                true
            }
            None => false,
        }
    }

    /// Record a sample count changed in place by the device
    pub fn update_samples(&mut self, handle: RenderTargetId, samples: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.handle == handle) {
            entry.key.samples = samples;
        }
    }

    /// Release entries unused for more than `STALE_RENDER_ID_WINDOW` render ids
    ///
    /// Handles listed in `active` are kept regardless of age.
    /// Returns the number of evicted entries.
    pub fn evict_stale(
        &mut self,
        device: &mut dyn GraphicsDevice,
        render_id: u64,
        active: &[RenderTargetId],
    ) -> usize {
        let before = self.entries.len();

        self.entries.retain(|entry| {
            let stale = render_id.saturating_sub(entry.last_used) > STALE_RENDER_ID_WINDOW;
            if stale && !active.contains(&entry.handle) {
                device.dispose_render_target(entry.handle);
                false
            } else {
                true
            }
        });

        let evicted = before - self.entries.len();
        if evicted > 0 {
            engine_debug!("galaxy3d::TextureCache",
                "Evicted {} stale render target(s) at render id {}", evicted, render_id);
        }
        evicted
    }

    /// Release every cached render target
    pub fn dispose_all(&mut self, device: &mut dyn GraphicsDevice) -> usize {
        let count = self.entries.len();
        for entry in self.entries.drain(..).rev() {
            device.dispose_render_target(entry.handle);
        }
        count
    }
}

#[cfg(test)]
#[path = "texture_cache_tests.rs"]
mod tests;

/// Runtime state of one post process in a chain.
///
/// A post process owns a `TextureCache` and up to two active render targets.
/// When it shares output with another post process, or has a forced output,
/// it owns nothing and delegates to the aliased target instead.

use glam::Vec2;

use crate::engine_debug;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, RenderTargetDesc, RenderTargetId};
use super::config::PostProcessConfig;
use super::size::{compute_activation_size, ActivationSize, SizingParams};
use super::texture_cache::TextureCache;
use super::texture_slots::ActiveTextureSlots;

slotmap::new_key_type! {
    /// Key of a post process inside a `PostProcessTextureManager`
    pub struct PostProcessId;
}

/// Externally supplied output target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedOutput {
    pub handle: RenderTargetId,
    pub width: u32,
    pub height: u32,
}

/// Emitted after the render targets of a post process were (re)created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeChangedEvent {
    pub id: PostProcessId,
    pub width: u32,
    pub height: u32,
    pub texel_size: Vec2,
}

/// Emitted when a post process binds its target for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateEvent {
    pub id: PostProcessId,
    pub target: RenderTargetId,
}

pub type SizeChangedHook = Box<dyn FnMut(&SizeChangedEvent)>;
pub type ActivateHook = Box<dyn FnMut(&ActivateEvent)>;
pub type DisposeHook = Box<dyn FnMut(PostProcessId)>;

/// Callbacks registered on a post process
#[derive(Default)]
pub(crate) struct PostProcessHooks {
    pub size_changed: Vec<SizeChangedHook>,
    pub activate: Vec<ActivateHook>,
    pub dispose: Vec<DisposeHook>,
}

/// One post process: configuration plus texture state
pub struct PostProcess {
    id: PostProcessId,
    config: PostProcessConfig,
    /// Size of the current targets; `None` forces a resize on next activation
    size: Option<(u32, u32)>,
    texel_size: Vec2,
    scale_ratio: Vec2,
    current_index: usize,
    /// `reusable` flag the current slots were allocated with
    slots_reusable: bool,
    render_id: u64,
    cache: TextureCache,
    textures: ActiveTextureSlots,
    pub(crate) share_output_with: Option<PostProcessId>,
    pub(crate) forced_output: Option<ForcedOutput>,
    output_texture: Option<RenderTargetId>,
    pub(crate) hooks: PostProcessHooks,
}

impl PostProcess {
    pub(crate) fn new(id: PostProcessId, config: PostProcessConfig) -> Self {
        Self {
            id,
            config,
            size: None,
            texel_size: Vec2::ZERO,
            scale_ratio: Vec2::ONE,
            current_index: 0,
            slots_reusable: false,
            render_id: 0,
            cache: TextureCache::new(),
            textures: ActiveTextureSlots::new(),
            share_output_with: None,
            forced_output: None,
            output_texture: None,
            hooks: PostProcessHooks::default(),
        }
    }

    pub fn id(&self) -> PostProcessId {
        self.id
    }

    pub fn config(&self) -> &PostProcessConfig {
        &self.config
    }

    /// Mutable configuration; size changes are picked up on the next activation
    pub fn config_mut(&mut self) -> &mut PostProcessConfig {
        &mut self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_reusable(&self) -> bool {
        self.config.reusable
    }

    /// Size of the current render targets
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn width(&self) -> Option<u32> {
        self.size.map(|(w, _)| w)
    }

    pub fn height(&self) -> Option<u32> {
        self.size.map(|(_, h)| h)
    }

    /// Texel size of the own targets (see the manager for alias resolution)
    pub fn own_texel_size(&self) -> Vec2 {
        self.texel_size
    }

    /// Ratio between the required and the allocated size (pixel-perfect mode)
    pub fn scale_ratio(&self) -> Vec2 {
        self.scale_ratio
    }

    /// Activations performed so far
    pub fn render_id(&self) -> u64 {
        self.render_id
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn textures(&self) -> &ActiveTextureSlots {
        &self.textures
    }

    pub fn shares_output_with(&self) -> Option<PostProcessId> {
        self.share_output_with
    }

    pub fn forced_output(&self) -> Option<ForcedOutput> {
        self.forced_output
    }

    /// The target the previous post process renders into
    pub fn input_texture(&self) -> Option<RenderTargetId> {
        self.textures.get(self.current_index)
    }

    /// The target bound by the last activation
    pub fn output_texture(&self) -> Option<RenderTargetId> {
        self.output_texture
    }

    /// Whether render targets are delegated to another post process or a forced output
    pub fn owns_textures(&self) -> bool {
        self.share_output_with.is_none() && self.forced_output.is_none()
    }

    /// Invalidate the stored size so the next activation recreates the targets
    pub fn mark_texture_dirty(&mut self) {
        self.size = None;
    }

    /// Whether the active slots no longer match `desired` or the configuration
    pub(crate) fn needs_resize(&self, desired: (u32, u32)) -> bool {
        self.size != Some(desired)
            || self.slots_reusable != self.config.reusable
            || self.input_texture().is_none()
    }

    pub(crate) fn compute_size(
        &self,
        source: (u32, u32),
        device: &dyn GraphicsDevice,
    ) -> ActivationSize {
        let params = SizingParams {
            size: self.config.size,
            needs_mipmaps: self.config.sampling_mode.needs_mipmaps(),
            always_force_pot: self.config.always_force_pot,
            adapt_scale_to_current_viewport: self.config.adapt_scale_to_current_viewport,
            scale_mode: self.config.scale_mode,
            owns_textures: self.owns_textures(),
        };
        compute_activation_size(&params, source, &device.capabilities(), device.current_viewport())
    }

    /// Cached target matching `desc`/`channel`, allocated on miss
    pub fn get_or_create_target(
        &mut self,
        device: &mut dyn GraphicsDevice,
        desc: &RenderTargetDesc,
        channel: u32,
    ) -> Result<RenderTargetId> {
        self.cache.get_or_create(device, desc, channel, self.render_id)
    }

    /// Recreate the active slots at `width` x `height`
    ///
    /// Previous targets stay in the cache. On error the post process is left
    /// dirty so the next activation retries.
    pub(crate) fn resize_textures(
        &mut self,
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
        generate_mipmaps: bool,
        generate_depth_stencil: bool,
    ) -> Result<()> {
        self.textures.reset();
        self.current_index = 0;
        self.size = None;

        let desc = RenderTargetDesc {
            width,
            height,
            generate_mipmaps,
            generate_depth_buffer: generate_depth_stencil,
            generate_stencil_buffer: generate_depth_stencil && device.capabilities().stencil_enabled,
            sampling_mode: self.config.sampling_mode,
            texture_type: self.config.texture_type,
            format: self.config.texture_format,
            samples: self.config.samples,
            label: self.config.render_target_label(),
        };

        let first = self.get_or_create_target(device, &desc, 0)?;
        self.textures.push(first);

        if self.config.reusable {
            let second = self.get_or_create_target(device, &desc, 1)?;
            self.textures.push(second);
        }
        self.slots_reusable = self.config.reusable;

        self.size = Some((width, height));
        self.texel_size = Vec2::new(1.0 / width as f32, 1.0 / height as f32);

        engine_debug!("galaxy3d::PostProcess",
            "'{}' resized to {}x{} (depth/stencil: {})",
            self.config.name, width, height, generate_depth_stencil);

        let event = SizeChangedEvent {
            id: self.id,
            width,
            height,
            texel_size: self.texel_size,
        };
        for hook in self.hooks.size_changed.iter_mut() {
            hook(&event);
        }
        Ok(())
    }

    /// Current slot if it is a valid cached target, refreshing its age
    pub(crate) fn touch_current_target(&mut self) -> Option<RenderTargetId> {
        let target = self.input_texture()?;
        self.cache.touch(target, self.render_id);
        Some(target)
    }

    /// Bring active slots to the configured sample count
    pub(crate) fn sync_sample_counts(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let wanted = self.config.samples;
        for handle in self.textures.iter() {
            let Some(info) = device.render_target_info(handle) else {
                continue;
            };
            if info.samples != wanted {
                let applied = device.update_render_target_sample_count(handle, wanted)?;
                self.cache.update_samples(handle, applied);
            }
        }
        Ok(())
    }

    /// Evict stale cache entries not referenced by a slot
    pub fn evict_stale(&mut self, device: &mut dyn GraphicsDevice) -> usize {
        let active = self.textures.to_vec();
        self.cache.evict_stale(device, self.render_id, &active)
    }

    pub(crate) fn advance_render_id(&mut self) {
        self.render_id += 1;
    }

    pub(crate) fn set_scale_ratio(&mut self, ratio: Vec2) {
        self.scale_ratio = ratio;
    }

    pub(crate) fn set_size_from_forced(&mut self, forced: ForcedOutput) {
        self.size = Some((forced.width, forced.height));
    }

    pub(crate) fn finish_activation(&mut self, target: RenderTargetId) {
        self.output_texture = Some(target);
        if self.textures.len() > 1 {
            self.current_index = (self.current_index + 1) % self.textures.len();
        }
    }

    /// Release every render target this post process owns
    ///
    /// Aliased and forced targets are never released here.
    pub(crate) fn dispose_textures(&mut self, device: &mut dyn GraphicsDevice) -> usize {
        let released = self.cache.dispose_all(device);
        self.textures.reset();
        self.current_index = 0;
        self.size = None;
        released
    }
}

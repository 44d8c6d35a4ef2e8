/// Post-process texture manager.
///
/// Owns the post processes of a chain (in draw order) and drives their render
/// target lifecycle: `activate` once per post process per frame, `resize` when
/// sizes change, `dispose` when a post process is removed.
///
/// The first post process of the chain receives a depth/stencil buffer since
/// it is the one the scene renders into.

use glam::Vec2;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::engine_bail_warn;
use crate::engine_debug;
use crate::engine_error;
use crate::engine_warn;
use crate::error::{Error, Result};
use crate::graphics_device::{ClearFlags, GraphicsDevice, RenderTargetId};
use super::config::{AlphaMode, PostProcessConfig};
use super::post_process::{
    ActivateEvent, ForcedOutput, PostProcess, PostProcessId, SizeChangedEvent,
};

/// Per-call parameters of `PostProcessTextureManager::activate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivateDesc {
    /// Size of the texture the post process reads; the device render size when `None`
    pub source_size: Option<(u32, u32)>,
    /// Allocate depth/stencil even if this is not the first post process
    pub force_depth_stencil: bool,
    /// Scene clear color, used when the post process has none
    pub clear_color: [f32; 4],
    /// The scene allows post processes to clear the color buffer
    pub allow_post_process_clear_color: bool,
}

impl Default for ActivateDesc {
    fn default() -> Self {
        Self {
            source_size: None,
            force_depth_stencil: false,
            clear_color: [0.2, 0.2, 0.3, 1.0],
            allow_post_process_clear_color: true,
        }
    }
}

/// Manager of the post processes of one camera
pub struct PostProcessTextureManager {
    post_processes: SlotMap<PostProcessId, PostProcess>,
    chain: Vec<PostProcessId>,
}

impl PostProcessTextureManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            post_processes: SlotMap::with_key(),
            chain: Vec::new(),
        }
    }

    fn log_and_return_error(error: Error) -> Error {
        engine_error!("galaxy3d::PostProcessTextureManager", "{}", error);
        error
    }

    fn not_found(id: PostProcessId) -> Error {
        Self::log_and_return_error(Error::InvalidResource(format!(
            "PostProcess {:?} not found",
            id
        )))
    }

    fn get(&self, id: PostProcessId) -> Result<&PostProcess> {
        self.post_processes.get(id).ok_or_else(|| Self::not_found(id))
    }

    fn get_mut(&mut self, id: PostProcessId) -> Result<&mut PostProcess> {
        self.post_processes.get_mut(id).ok_or_else(|| Self::not_found(id))
    }

    // ===== CHAIN =====

    /// Append a post process at the end of the chain
    pub fn add_post_process(&mut self, config: PostProcessConfig) -> PostProcessId {
        let id = self.add_detached_post_process(config);
        self.chain.push(id);
        id
    }

    /// Create a post process that is not part of the chain
    ///
    /// Detached post processes never get an implicit depth/stencil buffer.
    pub fn add_detached_post_process(&mut self, config: PostProcessConfig) -> PostProcessId {
        let name = config.name.clone();
        let id = self
            .post_processes
            .insert_with_key(|key| PostProcess::new(key, config));
        engine_debug!("galaxy3d::PostProcessTextureManager", "Created post process '{}'", name);
        id
    }

    /// Remove a post process from the chain without disposing it
    ///
    /// Returns false if it was not in the chain.
    pub fn detach(&mut self, id: PostProcessId) -> bool {
        match self.chain.iter().position(|&p| p == id) {
            Some(index) => {
                self.chain.remove(index);
                if index == 0 {
                    self.mark_first_dirty();
                }
                true
            }
            None => false,
        }
    }

    fn mark_first_dirty(&mut self) {
        if let Some(&first) = self.chain.first() {
            if let Some(pp) = self.post_processes.get_mut(first) {
                pp.mark_texture_dirty();
            }
        }
    }

    /// Post processes of the chain, in draw order
    pub fn chain(&self) -> &[PostProcessId] {
        &self.chain
    }

    pub fn first_post_process(&self) -> Option<PostProcessId> {
        self.chain.first().copied()
    }

    /// Number of live post processes (chained or detached)
    pub fn post_process_count(&self) -> usize {
        self.post_processes.len()
    }

    pub fn post_process(&self, id: PostProcessId) -> Option<&PostProcess> {
        self.post_processes.get(id)
    }

    pub fn post_process_mut(&mut self, id: PostProcessId) -> Option<&mut PostProcess> {
        self.post_processes.get_mut(id)
    }

    // ===== HOOKS =====

    /// Called after the render targets of `id` were (re)created
    pub fn on_size_changed<F>(&mut self, id: PostProcessId, hook: F) -> Result<()>
    where
        F: FnMut(&SizeChangedEvent) + 'static,
    {
        self.get_mut(id)?.hooks.size_changed.push(Box::new(hook));
        Ok(())
    }

    /// Called when `id` binds its target, before the clear
    pub fn on_activate<F>(&mut self, id: PostProcessId, hook: F) -> Result<()>
    where
        F: FnMut(&ActivateEvent) + 'static,
    {
        self.get_mut(id)?.hooks.activate.push(Box::new(hook));
        Ok(())
    }

    /// Called once when `id` is disposed
    pub fn on_dispose<F>(&mut self, id: PostProcessId, hook: F) -> Result<()>
    where
        F: FnMut(PostProcessId) + 'static,
    {
        self.get_mut(id)?.hooks.dispose.push(Box::new(hook));
        Ok(())
    }

    // ===== TEXTURE LIFECYCLE =====

    /// Recreate the render targets of `id` at `width` x `height`
    ///
    /// Depth/stencil is generated when forced or when `id` is first in the chain.
    pub fn resize(
        &mut self,
        device: &mut dyn GraphicsDevice,
        id: PostProcessId,
        width: u32,
        height: u32,
        generate_mipmaps: bool,
        force_depth_stencil: bool,
    ) -> Result<()> {
        let is_first = self.first_post_process() == Some(id);
        self.get_mut(id)?.resize_textures(
            device,
            width,
            height,
            generate_mipmaps,
            force_depth_stencil || is_first,
        )
    }

    /// Release stale cache entries of `id`
    pub fn evict_stale(&mut self, device: &mut dyn GraphicsDevice, id: PostProcessId) -> Result<usize> {
        Ok(self.get_mut(id)?.evict_stale(device))
    }

    /// Prepare and bind the render target `id` draws into
    ///
    /// Called once per frame per post process, in chain order. Returns the
    /// bound target.
    pub fn activate(
        &mut self,
        device: &mut dyn GraphicsDevice,
        id: PostProcessId,
        desc: &ActivateDesc,
    ) -> Result<RenderTargetId> {
        let is_first = self.first_post_process() == Some(id);
        let source = desc
            .source_size
            .unwrap_or_else(|| (device.render_width(), device.render_height()));

        let pp = self.get_mut(id)?;
        let sizing = pp.compute_size(source, &*device);

        if pp.owns_textures() {
            let (width, height) = sizing.desired;
            if pp.needs_resize(sizing.desired) {
                pp.resize_textures(
                    device,
                    width,
                    height,
                    sizing.needs_mipmaps,
                    desc.force_depth_stencil || is_first,
                )?;
            }

            pp.sync_sample_counts(device)?;
            pp.evict_stale(device);
            pp.advance_render_id();
        }

        let target = self.resolve_target(id)?;

        let pp = self.get_mut(id)?;
        let (required_width, required_height) = sizing.required;
        let (desired_width, desired_height) = sizing.desired;
        let force_full_viewport = pp.config().force_fullscreen_viewport;

        if pp.config().enable_pixel_perfect_mode {
            pp.set_scale_ratio(Vec2::new(
                required_width as f32 / desired_width as f32,
                required_height as f32 / desired_height as f32,
            ));
            device.bind_framebuffer(target, 0, Some((required_width, required_height)), force_full_viewport)?;
        } else {
            pp.set_scale_ratio(Vec2::ONE);
            device.bind_framebuffer(target, 0, None, force_full_viewport)?;
        }

        let event = ActivateEvent { id, target };
        for hook in pp.hooks.activate.iter_mut() {
            hook(&event);
        }

        let config = pp.config();
        if config.auto_clear
            && (config.alpha_mode == AlphaMode::Disabled || config.force_auto_clear_in_alpha_mode)
        {
            let color = config.clear_color.unwrap_or(desc.clear_color);
            let mut flags = ClearFlags::DEPTH | ClearFlags::STENCIL;
            if desc.allow_post_process_clear_color {
                flags |= ClearFlags::COLOR;
            }
            device.clear(color, flags)?;
        }

        pp.finish_activation(target);
        Ok(target)
    }

    /// Target `id` renders into: alias input, forced output, or own slot
    fn resolve_target(&mut self, id: PostProcessId) -> Result<RenderTargetId> {
        let (alias, forced, name) = {
            let pp = self.get(id)?;
            (pp.share_output_with, pp.forced_output, pp.name().to_string())
        };

        if let Some(other) = alias {
            if forced.is_some() {
                engine_warn!("galaxy3d::PostProcessTextureManager",
                    "'{}' both shares output and has a forced output; using the shared output", name);
            }
            return self
                .post_processes
                .get(other)
                .and_then(|o| o.input_texture())
                .ok_or_else(|| Self::log_and_return_error(Error::InvalidResource(format!(
                    "'{}' shares output with a post process that has no input texture",
                    name
                ))));
        }

        let pp = self.get_mut(id)?;
        if let Some(forced) = forced {
            pp.set_size_from_forced(forced);
            return Ok(forced.handle);
        }

        pp.touch_current_target().ok_or_else(|| {
            Self::log_and_return_error(Error::InvalidResource(format!(
                "'{}' has no render target",
                name
            )))
        })
    }

    /// Set the MSAA sample count of `id`, clamped to the device maximum
    ///
    /// Active targets are updated in place. Returns the applied count.
    pub fn set_samples(
        &mut self,
        device: &mut dyn GraphicsDevice,
        id: PostProcessId,
        samples: u32,
    ) -> Result<u32> {
        let clamped = samples.min(device.capabilities().max_msaa_samples).max(1);
        let pp = self.get_mut(id)?;
        pp.config_mut().samples = clamped;
        pp.sync_sample_counts(device)?;
        Ok(clamped)
    }

    /// Invalidate the size of `id` so its targets are recreated on next activation
    pub fn mark_texture_dirty(&mut self, id: PostProcessId) -> Result<()> {
        self.get_mut(id)?.mark_texture_dirty();
        Ok(())
    }

    // ===== ALIASING =====

    /// Make `id` render into the input texture of `other`
    ///
    /// Releases the targets `id` owned.
    ///
    /// # Errors
    ///
    /// Returns an error if either post process is unknown or the alias would
    /// form a cycle.
    pub fn share_output_with(
        &mut self,
        device: &mut dyn GraphicsDevice,
        id: PostProcessId,
        other: PostProcessId,
    ) -> Result<()> {
        self.get(other)?;
        self.get(id)?;

        let mut visited = FxHashSet::default();
        let mut cursor = Some(other);
        while let Some(current) = cursor {
            if current == id || !visited.insert(current) {
                engine_bail_warn!("galaxy3d::PostProcessTextureManager",
                    "Sharing output of {:?} with {:?} would create a cycle", id, other);
            }
            cursor = self.post_processes.get(current).and_then(|p| p.share_output_with);
        }

        let pp = self.get_mut(id)?;
        let released = pp.dispose_textures(device);
        pp.share_output_with = Some(other);

        engine_debug!("galaxy3d::PostProcessTextureManager",
            "'{}' now shares output ({} render target(s) released)", pp.name(), released);
        Ok(())
    }

    /// Undo `share_output_with`; targets are recreated on next activation
    pub fn use_own_output(&mut self, id: PostProcessId) -> Result<()> {
        let pp = self.get_mut(id)?;
        pp.share_output_with = None;
        pp.mark_texture_dirty();
        Ok(())
    }

    /// Force `id` to render into an externally owned render target
    ///
    /// The target is never released by this manager.
    pub fn set_input_texture(
        &mut self,
        device: &dyn GraphicsDevice,
        id: PostProcessId,
        handle: RenderTargetId,
    ) -> Result<()> {
        let Some(info) = device.render_target_info(handle) else {
            return Err(Self::log_and_return_error(Error::InvalidResource(
                "Forced output render target does not exist".to_string(),
            )));
        };

        let pp = self.get_mut(id)?;
        if pp.share_output_with.is_some() {
            engine_warn!("galaxy3d::PostProcessTextureManager",
                "'{}' shares output; the forced output is ignored while sharing", pp.name());
        }
        pp.forced_output = Some(ForcedOutput {
            handle,
            width: info.width,
            height: info.height,
        });
        Ok(())
    }

    /// Drop the forced output of `id` and go back to its own targets
    pub fn restore_default_input_texture(&mut self, id: PostProcessId) -> Result<()> {
        let pp = self.get_mut(id)?;
        if pp.forced_output.take().is_some() {
            pp.mark_texture_dirty();
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    /// Texel size of the output of `id`, following aliases
    pub fn texel_size(&self, id: PostProcessId) -> Result<Vec2> {
        let pp = self.get(id)?;
        if let Some(other) = pp.share_output_with {
            return self.texel_size(other);
        }
        if let Some(forced) = pp.forced_output {
            return Ok(Vec2::new(1.0 / forced.width as f32, 1.0 / forced.height as f32));
        }
        Ok(pp.own_texel_size())
    }

    /// Width / height of the output of `id`, following aliases
    pub fn aspect_ratio(&self, id: PostProcessId) -> Result<f32> {
        let pp = self.get(id)?;
        if let Some(other) = pp.share_output_with {
            return self.aspect_ratio(other);
        }
        if let Some(forced) = pp.forced_output {
            return Ok(forced.width as f32 / forced.height as f32);
        }
        match pp.size() {
            Some((width, height)) => Ok(width as f32 / height as f32),
            None => Err(Self::log_and_return_error(Error::InvalidResource(format!(
                "'{}' has no size yet",
                pp.name()
            )))),
        }
    }

    /// Target the previous post process renders into
    pub fn input_texture(&self, id: PostProcessId) -> Result<Option<RenderTargetId>> {
        Ok(self.get(id)?.input_texture())
    }

    /// Target bound by the last activation of `id`
    pub fn output_texture(&self, id: PostProcessId) -> Result<Option<RenderTargetId>> {
        Ok(self.get(id)?.output_texture())
    }

    /// Texture `id` samples when applied: alias input, forced output, or own input
    pub fn sampler_source(&self, id: PostProcessId) -> Result<Option<RenderTargetId>> {
        let pp = self.get(id)?;
        if let Some(other) = pp.share_output_with {
            return Ok(self.post_processes.get(other).and_then(|o| o.input_texture()));
        }
        if let Some(forced) = pp.forced_output {
            return Ok(Some(forced.handle));
        }
        Ok(pp.input_texture())
    }

    /// Scale ratio computed by the last activation of `id`
    pub fn scale_ratio(&self, id: PostProcessId) -> Result<Vec2> {
        Ok(self.get(id)?.scale_ratio())
    }

    // ===== DISPOSAL =====

    /// Dispose `id` and release the render targets it owns
    ///
    /// Post processes sharing output with `id` go back to their own output.
    /// If `id` was first in the chain, the new first post process is marked
    /// dirty so it regains a depth/stencil buffer. Disposing twice is a no-op.
    pub fn dispose(&mut self, device: &mut dyn GraphicsDevice, id: PostProcessId) {
        let Some(mut pp) = self.post_processes.remove(id) else {
            engine_debug!("galaxy3d::PostProcessTextureManager",
                "Post process {:?} already disposed", id);
            return;
        };

        let released = pp.dispose_textures(device);
        self.detach(id);

        for (_, other) in self.post_processes.iter_mut() {
            if other.share_output_with == Some(id) {
                other.share_output_with = None;
                other.mark_texture_dirty();
            }
        }

        engine_debug!("galaxy3d::PostProcessTextureManager",
            "Disposed '{}' ({} render target(s) released)", pp.name(), released);

        for hook in pp.hooks.dispose.iter_mut() {
            hook(id);
        }
    }

    /// Dispose every post process
    pub fn dispose_all(&mut self, device: &mut dyn GraphicsDevice) {
        let ids: Vec<PostProcessId> = self.post_processes.keys().collect();
        for id in ids {
            self.dispose(device, id);
        }
    }
}

impl Default for PostProcessTextureManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "texture_manager_tests.rs"]
mod tests;

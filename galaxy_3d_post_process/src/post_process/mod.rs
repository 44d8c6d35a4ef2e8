/// Post process module - chain stages, their render target cache and the manager

pub mod config;
pub mod size;
pub mod texture_cache;
pub mod texture_slots;
pub mod post_process;
pub mod texture_manager;

pub use config::*;
pub use size::{exponent_of_two, ActivationSize, PostProcessSize, ScaleMode};
pub use texture_cache::{CacheEntry, CacheKey, TextureCache, STALE_RENDER_ID_WINDOW};
pub use texture_slots::{ActiveTextureSlots, MAX_ACTIVE_SLOTS};
pub use post_process::{
    ActivateEvent, ActivateHook, DisposeHook, ForcedOutput, PostProcess, PostProcessId,
    SizeChangedEvent, SizeChangedHook,
};
pub use texture_manager::{ActivateDesc, PostProcessTextureManager};

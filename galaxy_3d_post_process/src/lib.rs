/*!
# Galaxy 3D Post Process

Render target management for post-process chains of the Galaxy 3D engine.

A post-process chain renders the scene through a sequence of full-screen
passes. Each pass ("post process") reads the output of the previous one and
writes into its own render target. This crate owns the lifecycle of those
render targets: it sizes them to the current viewport, caches and recycles
them across frames, binds them as draw destinations and exposes the texture
the next pass must sample.

## Architecture

- **GraphicsDevice**: Trait the GPU backend implements (render target creation,
  framebuffer binding, clears, capability queries)
- **PostProcessConfig**: Plain configuration of one post process
- **TextureCache**: Per post process cache of render targets, evicted when stale
- **PostProcessTextureManager**: Owns the chain, drives `activate`/`resize`/`dispose`
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod post_process;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine (logging hub)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // GPU abstraction sub-module
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Post process sub-module
    pub mod post_process {
        pub use crate::post_process::*;
    }
}

// Re-export math library at crate root
pub use glam;

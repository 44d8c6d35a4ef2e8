/// Graphics device module - GPU abstraction consumed by post processing

// Module declarations
pub mod graphics_device;
pub mod render_target;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use render_target::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;

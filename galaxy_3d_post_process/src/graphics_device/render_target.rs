/// Render target handle, descriptor and info
///
/// Render targets are owned by the graphics device. The rest of the crate only
/// holds `RenderTargetId` keys and queries properties through the device.

slotmap::new_key_type! {
    /// Opaque key of a GPU render target owned by a `GraphicsDevice`
    pub struct RenderTargetId;
}

/// Pixel layout of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    R,
    RG,
    #[default]
    RGBA,
}

/// Component type of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureType {
    #[default]
    UnsignedByte,
    HalfFloat,
    Float,
}

/// Filtering used when sampling a render target
///
/// Modes ending in `Mip*` sample mip levels and therefore need the render
/// target to be created with mipmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplingMode {
    /// Nearest mag/min, no mips
    #[default]
    Nearest,
    /// Nearest mag, linear min, no mips
    NearestLinear,
    /// Linear mag/min, no mips
    Bilinear,
    /// Nearest mag/min, nearest mip
    NearestMipNearest,
    /// Linear mag/min, nearest mip
    BilinearMipNearest,
    /// Linear mag/min, linear mip
    Trilinear,
}

impl SamplingMode {
    /// Whether this mode samples mip levels
    pub fn needs_mipmaps(self) -> bool {
        !matches!(
            self,
            SamplingMode::Nearest | SamplingMode::NearestLinear | SamplingMode::Bilinear
        )
    }
}

/// Descriptor for creating a render target
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Allocate a full mip chain
    pub generate_mipmaps: bool,
    /// Attach a depth buffer
    pub generate_depth_buffer: bool,
    /// Attach a stencil buffer (only meaningful with a depth buffer)
    pub generate_stencil_buffer: bool,
    /// Sampling mode used when this target is read
    pub sampling_mode: SamplingMode,
    /// Component type
    pub texture_type: TextureType,
    /// Pixel layout
    pub format: TextureFormat,
    /// MSAA sample count (1 = no multisampling)
    pub samples: u32,
    /// Debug label
    pub label: String,
}

/// Read-only properties of a created render target
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetInfo {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub has_depth: bool,
    pub has_stencil: bool,
    pub has_mipmaps: bool,
    pub sampling_mode: SamplingMode,
    pub texture_type: TextureType,
    pub format: TextureFormat,
    pub label: String,
}

impl RenderTargetInfo {
    /// Build the info a backend reports for a freshly created target
    pub fn from_desc(desc: &RenderTargetDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            samples: desc.samples,
            has_depth: desc.generate_depth_buffer,
            has_stencil: desc.generate_depth_buffer && desc.generate_stencil_buffer,
            has_mipmaps: desc.generate_mipmaps,
            sampling_mode: desc.sampling_mode,
            texture_type: desc.texture_type,
            format: desc.format,
            label: desc.label.clone(),
        }
    }
}

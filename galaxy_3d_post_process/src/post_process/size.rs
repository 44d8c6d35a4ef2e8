/// Post process sizing: size profile, power-of-two rounding and the
/// per-activation size computation.

use crate::graphics_device::{DeviceCapabilities, Viewport};

/// Requested output size of a post process
///
/// The output is `ratio` times the source (or render) size. A fixed width or
/// height overrides the ratio for that dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcessSize {
    pub ratio: f32,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PostProcessSize {
    /// Output sized at `ratio` times the source
    pub fn ratio(ratio: f32) -> Self {
        Self { ratio, width: None, height: None }
    }

    /// Output with fixed dimensions
    pub fn fixed(width: u32, height: u32) -> Self {
        Self { ratio: 1.0, width: Some(width), height: Some(height) }
    }
}

impl Default for PostProcessSize {
    fn default() -> Self {
        Self::ratio(1.0)
    }
}

/// Rounding policy when a dimension must become a power of two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleMode {
    #[default]
    Floor,
    Nearest,
    Ceiling,
}

fn floor_pot(value: u64) -> u64 {
    if value == 0 {
        0
    } else {
        1 << (63 - value.leading_zeros())
    }
}

fn ceiling_pot(value: u64) -> u64 {
    if value == 0 {
        0
    } else {
        value.next_power_of_two()
    }
}

/// Round `value` to a power of two with `mode`, capped at `max`
///
/// Zero stays zero. Rounding is done in 64 bits so values above 2^31 round
/// up without overflowing before the cap applies.
pub fn exponent_of_two(value: u32, max: u32, mode: ScaleMode) -> u32 {
    let value = u64::from(value);
    let pot = match mode {
        ScaleMode::Floor => floor_pot(value),
        ScaleMode::Ceiling => ceiling_pot(value),
        ScaleMode::Nearest => {
            let ceiling = ceiling_pot(value);
            let floor = floor_pot(value);
            if ceiling - value > value - floor { floor } else { ceiling }
        }
    };
    // the cap fits in u32, so the narrowing never truncates
    pot.min(u64::from(max)) as u32
}

/// Sizes computed at the start of an activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationSize {
    /// Source size times ratio (what the pass logically covers)
    pub required: (u32, u32),
    /// Size the render target must have
    pub desired: (u32, u32),
    /// The sampling mode needs a mip chain
    pub needs_mipmaps: bool,
}

/// Inputs of `compute_activation_size` taken from the stage configuration
#[derive(Debug, Clone, Copy)]
pub(crate) struct SizingParams {
    pub size: PostProcessSize,
    pub needs_mipmaps: bool,
    pub always_force_pot: bool,
    pub adapt_scale_to_current_viewport: bool,
    pub scale_mode: ScaleMode,
    /// Viewport and power-of-two adjustments only apply to stages owning textures
    pub owns_textures: bool,
}

pub(crate) fn compute_activation_size(
    params: &SizingParams,
    source: (u32, u32),
    caps: &DeviceCapabilities,
    viewport: Option<Viewport>,
) -> ActivationSize {
    let required = (
        (source.0 as f32 * params.size.ratio) as u32,
        (source.1 as f32 * params.size.ratio) as u32,
    );

    let mut desired = (
        params.size.width.unwrap_or(required.0),
        params.size.height.unwrap_or(required.1),
    );

    if params.owns_textures {
        if params.adapt_scale_to_current_viewport {
            if let Some(viewport) = viewport {
                desired.0 = (desired.0 as f32 * viewport.width) as u32;
                desired.1 = (desired.1 as f32 * viewport.height) as u32;
            }
        }

        let round_for_mips = params.needs_mipmaps && caps.needs_power_of_two_textures;
        if round_for_mips || params.always_force_pot {
            if params.size.width.is_none() {
                desired.0 = exponent_of_two(desired.0, caps.max_texture_size, params.scale_mode);
            }
            if params.size.height.is_none() {
                desired.1 = exponent_of_two(desired.1, caps.max_texture_size, params.scale_mode);
            }
        }
    }

    ActivationSize { required, desired, needs_mipmaps: params.needs_mipmaps }
}

#[cfg(test)]
#[path = "size_tests.rs"]
mod tests;

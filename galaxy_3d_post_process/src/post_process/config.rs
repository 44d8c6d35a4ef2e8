/// Post process configuration
///
/// Plain data describing one post process. Runtime state (textures, sizes,
/// ping-pong index) lives in `PostProcess`; this struct is what gets cloned
/// and persisted. Persistence goes through `fields()` / `set_field()`.

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{SamplingMode, TextureFormat, TextureType};
use super::size::{PostProcessSize, ScaleMode};

/// Blending applied when the post process is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    #[default]
    Disabled,
    Add,
    Combine,
    Multiply,
    PremultipliedAlpha,
}

/// What the post process draws
///
/// Shader compilation is handled elsewhere; the kind only names the effect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EffectKind {
    /// Copies its input unchanged
    #[default]
    Pass,
    /// Custom fragment shader
    Custom { fragment: String },
}

impl EffectKind {
    /// Fragment shader name
    pub fn fragment_name(&self) -> &str {
        match self {
            EffectKind::Pass => "pass",
            EffectKind::Custom { fragment } => fragment,
        }
    }
}

/// Configuration of one post process
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessConfig {
    /// Name, used for render target labels and logs
    pub name: String,
    pub effect: EffectKind,
    /// Output size (ratio of the source or fixed)
    pub size: PostProcessSize,
    /// Can be applied several times per frame (double-buffered)
    pub reusable: bool,
    pub sampling_mode: SamplingMode,
    pub texture_type: TextureType,
    pub texture_format: TextureFormat,
    /// MSAA sample count
    pub samples: u32,
    pub scale_mode: ScaleMode,
    /// Always round ratio-sized dimensions to a power of two
    pub always_force_pot: bool,
    /// Multiply the output size by the current viewport extent
    pub adapt_scale_to_current_viewport: bool,
    /// Render only the required sub-rectangle of a larger target
    pub enable_pixel_perfect_mode: bool,
    pub force_fullscreen_viewport: bool,
    /// Clear the target on activation
    pub auto_clear: bool,
    /// Clear color; the scene clear color is used when `None`
    pub clear_color: Option<[f32; 4]>,
    pub alpha_mode: AlphaMode,
    /// Clear even when alpha blending is enabled
    pub force_auto_clear_in_alpha_mode: bool,
}

impl PostProcessConfig {
    /// Configuration with defaults and the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: PostProcessSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_reusable(mut self, reusable: bool) -> Self {
        self.reusable = reusable;
        self
    }

    pub fn with_effect(mut self, effect: EffectKind) -> Self {
        self.effect = effect;
        self
    }

    /// Label given to render targets allocated for this post process
    pub fn render_target_label(&self) -> String {
        format!("PostProcessRTT-{}", self.name)
    }

    /// Persisted fields, in declaration order
    pub fn fields(&self) -> Vec<(&'static str, ConfigValue)> {
        vec![
            ("name", ConfigValue::Text(self.name.clone())),
            ("fragment", ConfigValue::Text(self.effect.fragment_name().to_string())),
            ("ratio", ConfigValue::Float(self.size.ratio)),
            ("width", ConfigValue::OptUInt(self.size.width)),
            ("height", ConfigValue::OptUInt(self.size.height)),
            ("reusable", ConfigValue::Bool(self.reusable)),
            ("samplingMode", ConfigValue::Sampling(self.sampling_mode)),
            ("textureType", ConfigValue::Type(self.texture_type)),
            ("textureFormat", ConfigValue::Format(self.texture_format)),
            ("samples", ConfigValue::UInt(self.samples)),
            ("scaleMode", ConfigValue::Scale(self.scale_mode)),
            ("alwaysForcePOT", ConfigValue::Bool(self.always_force_pot)),
            ("adaptScaleToCurrentViewport", ConfigValue::Bool(self.adapt_scale_to_current_viewport)),
            ("enablePixelPerfectMode", ConfigValue::Bool(self.enable_pixel_perfect_mode)),
            ("forceFullscreenViewport", ConfigValue::Bool(self.force_fullscreen_viewport)),
            ("autoClear", ConfigValue::Bool(self.auto_clear)),
            ("clearColor", ConfigValue::Color(self.clear_color)),
            ("alphaMode", ConfigValue::Alpha(self.alpha_mode)),
            ("forceAutoClearInAlphaMode", ConfigValue::Bool(self.force_auto_clear_in_alpha_mode)),
        ]
    }

    /// Write back one persisted field
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown or the value has the wrong type.
    pub fn set_field(&mut self, name: &str, value: ConfigValue) -> Result<()> {
        match (name, value) {
            ("name", ConfigValue::Text(v)) => self.name = v,
            ("fragment", ConfigValue::Text(v)) => {
                self.effect = if v == "pass" {
                    EffectKind::Pass
                } else {
                    EffectKind::Custom { fragment: v }
                };
            }
            ("ratio", ConfigValue::Float(v)) => self.size.ratio = v,
            ("width", ConfigValue::OptUInt(v)) => self.size.width = v,
            ("height", ConfigValue::OptUInt(v)) => self.size.height = v,
            ("reusable", ConfigValue::Bool(v)) => self.reusable = v,
            ("samplingMode", ConfigValue::Sampling(v)) => self.sampling_mode = v,
            ("textureType", ConfigValue::Type(v)) => self.texture_type = v,
            ("textureFormat", ConfigValue::Format(v)) => self.texture_format = v,
            ("samples", ConfigValue::UInt(v)) => self.samples = v,
            ("scaleMode", ConfigValue::Scale(v)) => self.scale_mode = v,
            ("alwaysForcePOT", ConfigValue::Bool(v)) => self.always_force_pot = v,
            ("adaptScaleToCurrentViewport", ConfigValue::Bool(v)) => self.adapt_scale_to_current_viewport = v,
            ("enablePixelPerfectMode", ConfigValue::Bool(v)) => self.enable_pixel_perfect_mode = v,
            ("forceFullscreenViewport", ConfigValue::Bool(v)) => self.force_fullscreen_viewport = v,
            ("autoClear", ConfigValue::Bool(v)) => self.auto_clear = v,
            ("clearColor", ConfigValue::Color(v)) => self.clear_color = v,
            ("alphaMode", ConfigValue::Alpha(v)) => self.alpha_mode = v,
            ("forceAutoClearInAlphaMode", ConfigValue::Bool(v)) => self.force_auto_clear_in_alpha_mode = v,
            (name, value) => {
                engine_bail!("galaxy3d::PostProcessConfig",
                    "Cannot set field '{}' to {:?}", name, value);
            }
        }
        Ok(())
    }
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            effect: EffectKind::Pass,
            size: PostProcessSize::default(),
            reusable: false,
            sampling_mode: SamplingMode::Nearest,
            texture_type: TextureType::UnsignedByte,
            texture_format: TextureFormat::RGBA,
            samples: 1,
            scale_mode: ScaleMode::Floor,
            always_force_pot: false,
            adapt_scale_to_current_viewport: false,
            enable_pixel_perfect_mode: false,
            force_fullscreen_viewport: true,
            auto_clear: true,
            clear_color: None,
            alpha_mode: AlphaMode::Disabled,
            force_auto_clear_in_alpha_mode: false,
        }
    }
}

/// Value of a persisted configuration field
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Float(f32),
    UInt(u32),
    OptUInt(Option<u32>),
    Text(String),
    Color(Option<[f32; 4]>),
    Sampling(SamplingMode),
    Type(TextureType),
    Format(TextureFormat),
    Scale(ScaleMode),
    Alpha(AlphaMode),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

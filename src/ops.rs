// src/ops.rs
//
// Decode request types.
// These are cheap to create and copy - the expensive work happens in the engine.

use crate::engine::DEFAULT_MAX_DIMENSION;

/// One axis of a requested target size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    /// Exact number of pixels
    Pixels(u32),
    /// Follow the other axis (keeps aspect ratio)
    Undefined,
}

impl Dimension {
    pub fn pixels(self) -> Option<u32> {
        match self {
            Dimension::Pixels(px) => Some(px),
            Dimension::Undefined => None,
        }
    }
}

/// What size the host asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Intrinsic SVG size scaled by device density
    Original,
    /// Explicit bounds
    Exact { width: Dimension, height: Dimension },
}

/// How the source is scaled into the target bounds. Both preserve aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scale {
    /// Largest size that fits inside the bounds
    #[default]
    Fit,
    /// Smallest size that covers the bounds (host crops)
    Fill,
}

impl Scale {
    pub fn from_str(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "fit" | "inside" | "contain" => Ok(Self::Fit),
            "fill" | "cover" => Ok(Self::Fill),
            other => Err(format!("unsupported scale: {other}")),
        }
    }
}

/// Size request for one decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeConstraint {
    pub target: Target,
    pub scale: Scale,
    /// Neither output edge may exceed this. None disables the clamp.
    pub max_dimension: Option<u32>,
}

impl Default for SizeConstraint {
    fn default() -> Self {
        Self::original()
    }
}

impl SizeConstraint {
    /// Intrinsic size times density, clamped to the default max dimension.
    pub fn original() -> Self {
        Self {
            target: Target::Original,
            scale: Scale::Fit,
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
        }
    }

    /// Explicit pixel bounds on both axes.
    pub fn exact(width: u32, height: u32, scale: Scale) -> Self {
        Self {
            target: Target::Exact {
                width: Dimension::Pixels(width),
                height: Dimension::Pixels(height),
            },
            scale,
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
        }
    }

    /// Bound only the width; height follows the aspect ratio.
    pub fn width(width: u32) -> Self {
        Self {
            target: Target::Exact {
                width: Dimension::Pixels(width),
                height: Dimension::Undefined,
            },
            scale: Scale::Fit,
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
        }
    }

    /// Bound only the height; width follows the aspect ratio.
    pub fn height(height: u32) -> Self {
        Self {
            target: Target::Exact {
                width: Dimension::Undefined,
                height: Dimension::Pixels(height),
            },
            scale: Scale::Fit,
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
        }
    }

    pub fn with_max_dimension(mut self, max_dimension: Option<u32>) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_original(&self) -> bool {
        matches!(self.target, Target::Original)
    }

    /// Get the built-in preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "original" => Some(Self::original()),
            "thumbnail" => Some(Self::thumbnail()),
            "avatar" => Some(Self::avatar()),
            "hero" => Some(Self::hero()),
            _ => None,
        }
    }

    /// Thumbnail preset: fits inside 150x150
    /// Use case: Gallery grids, file pickers
    pub fn thumbnail() -> Self {
        Self::exact(150, 150, Scale::Fit)
    }

    /// Avatar preset: covers 200x200 (host crops to a circle/square)
    pub fn avatar() -> Self {
        Self::exact(200, 200, Scale::Fill)
    }

    /// Hero preset: 1920 wide, height follows
    /// Use case: Banners, full-width illustrations
    pub fn hero() -> Self {
        Self::width(1920)
    }
}

/// Everything the host supplies alongside the SVG bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeRequest {
    pub constraint: SizeConstraint,
    /// Device pixels per logical unit. 1.0 on platforms without density scaling.
    pub density: f32,
    /// MIME type reported by the fetcher, if any
    pub mime_type: Option<String>,
    /// Identifier used when recording metrics (e.g. the image URL)
    pub model_key: Option<String>,
}

impl Default for DecodeRequest {
    fn default() -> Self {
        Self {
            constraint: SizeConstraint::original(),
            density: 1.0,
            mime_type: None,
            model_key: None,
        }
    }
}

impl DecodeRequest {
    pub fn new(constraint: SizeConstraint) -> Self {
        Self {
            constraint,
            ..Self::default()
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_model_key(mut self, model_key: impl Into<String>) -> Self {
        self.model_key = Some(model_key.into());
        self
    }
}

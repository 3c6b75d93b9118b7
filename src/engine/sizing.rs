// src/engine/sizing.rs
//
// Render size resolution: intrinsic SVG size + request constraints -> pixel size.
//
// Two-step approach: compute a destination size with the shared fit/fill/clamp
// policy, then derive a single uniform multiplier from it and re-apply that to the
// unrounded source. Independent per-axis rounding in the first step never leaks
// into the aspect ratio of the final render.

use crate::engine::{MAX_DIMENSION, MAX_PIXELS, SVG_DEFAULT_SIZE};
use crate::error::SvgDecodeError;
use crate::ops::{Scale, SizeConstraint, Target};

type SizingResult<T> = std::result::Result<T, SvgDecodeError>;

/// Width/height an SVG declares for itself, in user units. 0 means unspecified.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntrinsicSize {
    pub width: f32,
    pub height: f32,
}

impl IntrinsicSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pixel size handed to a rasterization backend. Both axes are always >= 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
}

impl RenderSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Tightly packed RGBA8 byte length
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

const TRUNCATION_EPSILON: f64 = 1e-6;

/// Ratio between destination and source, picked per scale policy.
/// Fit keeps the whole source inside the bounds, Fill covers them.
pub fn compute_size_multiplier(
    src_width: f64,
    src_height: f64,
    dst_width: f64,
    dst_height: f64,
    scale: Scale,
) -> f64 {
    let width_percent = dst_width / src_width;
    let height_percent = dst_height / src_height;
    match scale {
        Scale::Fit => width_percent.min(height_percent),
        Scale::Fill => width_percent.max(height_percent),
    }
}

#[inline]
fn scale_dims(width: u32, height: u32, multiplier: f64) -> (u32, u32) {
    (
        ((width as f64 * multiplier).round() as u32).max(1),
        ((height as f64 * multiplier).round() as u32).max(1),
    )
}

/// Uniform scale from a source size to the constraint's target bounds, capped so
/// that neither edge passes `max_dimension`. An undefined axis does not bind.
fn target_multiplier(src_width: f64, src_height: f64, constraint: &SizeConstraint) -> f64 {
    let multiplier = match constraint.target {
        Target::Original => 1.0,
        Target::Exact { width, height } => match (width.pixels(), height.pixels()) {
            (Some(w), Some(h)) => {
                compute_size_multiplier(src_width, src_height, w as f64, h as f64, constraint.scale)
            }
            (Some(w), None) => w as f64 / src_width,
            (None, Some(h)) => h as f64 / src_height,
            (None, None) => 1.0,
        },
    };

    match constraint.max_dimension {
        Some(max) => {
            let max = max.max(1) as f64;
            multiplier.min(max / src_width).min(max / src_height)
        }
        None => multiplier,
    }
}

/// Destination size for an integer source under the constraint's target, scale and clamp.
///
/// Fit yields the largest size <= target preserving aspect ratio, Fill the smallest
/// size >= target. Either result is scaled down uniformly so that no edge
/// exceeds `max_dimension`. Both axes are >= 1.
pub fn compute_dst_size(src_width: u32, src_height: u32, constraint: &SizeConstraint) -> (u32, u32) {
    let src_width = src_width.max(1);
    let src_height = src_height.max(1);

    let multiplier = target_multiplier(src_width as f64, src_height as f64, constraint);
    let (dst_width, dst_height) = scale_dims(src_width, src_height, multiplier);

    match constraint.max_dimension {
        Some(max) => {
            let max = max.max(1);
            (dst_width.min(max), dst_height.min(max))
        }
        None => (dst_width, dst_height),
    }
}

/// Resolve the pixel size to rasterize at.
///
/// `density` is device pixels per logical unit; it only applies to
/// `Target::Original`. Axes the SVG leaves unspecified fall back to
/// [`SVG_DEFAULT_SIZE`].
pub fn resolve(
    intrinsic: IntrinsicSize,
    constraint: &SizeConstraint,
    density: f32,
) -> SizingResult<RenderSize> {
    if !density.is_finite() || density <= 0.0 {
        return Err(SvgDecodeError::invalid_constraint(format!(
            "density must be a positive finite number, got {density}"
        )));
    }
    if !intrinsic.width.is_finite() || !intrinsic.height.is_finite() {
        return Err(SvgDecodeError::invalid_constraint(format!(
            "intrinsic size must be finite, got {}x{}",
            intrinsic.width, intrinsic.height
        )));
    }

    // Step 1: density only scales axes the SVG actually declared.
    let mut scaled_width = intrinsic.width as f64;
    let mut scaled_height = intrinsic.height as f64;
    if constraint.is_original() {
        let density = density as f64;
        if scaled_width > 0.0 {
            scaled_width *= density;
        }
        if scaled_height > 0.0 {
            scaled_height *= density;
        }
    }
    let has_width = scaled_width > 0.0;
    let has_height = scaled_height > 0.0;

    // Step 2
    let src_width = if has_width {
        (scaled_width.round() as u32).max(1)
    } else {
        SVG_DEFAULT_SIZE
    };
    let src_height = if has_height {
        (scaled_height.round() as u32).max(1)
    } else {
        SVG_DEFAULT_SIZE
    };

    // Step 3
    let (dst_width, dst_height) = compute_dst_size(src_width, src_height, constraint);

    // Step 4: unrounded source against the clamped target bounds.
    let multiplier = if has_width && has_height {
        target_multiplier(scaled_width, scaled_height, constraint)
    } else {
        1.0
    };

    // Step 5: truncate; defaulted or collapsed axes take the destination size.
    // The epsilon keeps e.g. (64 / 300) * 300 from landing on 63.999...
    let truncate = |scaled: f64, has_axis: bool, dst: u32| -> u32 {
        if !has_axis {
            return dst;
        }
        let px = (multiplier * scaled + TRUNCATION_EPSILON) as u32;
        if px == 0 {
            dst
        } else {
            px
        }
    };
    let mut width = truncate(scaled_width, has_width, dst_width);
    let mut height = truncate(scaled_height, has_height, dst_height);

    // With one axis unspecified the declared axis is not rescaled, so clamp it here.
    if let Some(max) = constraint.max_dimension {
        let max = max.max(1);
        width = width.min(max);
        height = height.min(max);
    }

    if width == 0 || height == 0 {
        return Err(SvgDecodeError::invalid_constraint(format!(
            "constraint {constraint:?} resolved to {width}x{height}"
        )));
    }

    tracing::debug!(
        intrinsic_width = intrinsic.width,
        intrinsic_height = intrinsic.height,
        density,
        width,
        height,
        "resolved svg render size"
    );

    Ok(RenderSize::new(width, height))
}

/// Check if render dimensions are within safe limits.
/// Returns an error before a backend is asked to allocate a hostile pixmap.
pub fn check_dimensions(width: u32, height: u32) -> SizingResult<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(SvgDecodeError::dimension_exceeds_limit(
            width.max(height),
            MAX_DIMENSION,
        ));
    }
    let pixels = width as u64 * height as u64;
    if pixels > MAX_PIXELS {
        return Err(SvgDecodeError::pixel_count_exceeds_limit(pixels, MAX_PIXELS));
    }
    Ok(())
}

// src/engine/firewall.rs
//
// SVG firewall configuration and enforcement helpers.
// Two knobs: size of the source document and pixel count of the render target.

use crate::error::SvgDecodeError;

const STRICT_MAX_PIXELS: u64 = 16_777_216; // 4096 x 4096
const LENIENT_MAX_PIXELS: u64 = 75_000_000; // below global MAX_PIXELS
const STRICT_MAX_BYTES: u64 = 4 * 1024 * 1024; // 4MB of markup
const LENIENT_MAX_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirewallPolicy {
    Disabled,
    Strict,
    Lenient,
    Custom,
}

impl FirewallPolicy {
    pub fn from_str(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "disabled" | "off" => Ok(Self::Disabled),
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown firewall policy: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FirewallConfig {
    pub enabled: bool,
    pub policy: FirewallPolicy,
    pub max_pixels: Option<u64>,
    pub max_bytes: Option<u64>,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            policy: FirewallPolicy::Disabled,
            max_pixels: None,
            max_bytes: None,
        }
    }
}

impl FirewallConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            enabled: true,
            policy: FirewallPolicy::Strict,
            max_pixels: Some(STRICT_MAX_PIXELS),
            max_bytes: Some(STRICT_MAX_BYTES),
        }
    }

    pub fn lenient() -> Self {
        Self {
            enabled: true,
            policy: FirewallPolicy::Lenient,
            max_pixels: Some(LENIENT_MAX_PIXELS),
            max_bytes: Some(LENIENT_MAX_BYTES),
        }
    }

    pub fn custom() -> Self {
        Self {
            enabled: true,
            policy: FirewallPolicy::Custom,
            max_pixels: None,
            max_bytes: None,
        }
    }

    pub fn apply_policy(policy: FirewallPolicy) -> Self {
        match policy {
            FirewallPolicy::Disabled => Self::disabled(),
            FirewallPolicy::Strict => Self::strict(),
            FirewallPolicy::Lenient => Self::lenient(),
            FirewallPolicy::Custom => Self::custom(),
        }
    }

    pub fn with_max_pixels(mut self, limit: u64) -> Self {
        self.max_pixels = Some(limit);
        self
    }

    pub fn with_max_bytes(mut self, limit: u64) -> Self {
        self.max_bytes = Some(limit);
        self
    }

    pub fn enforce_source_len(&self, len: usize) -> Result<(), SvgDecodeError> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit) = self.max_bytes {
            let len_u64 = len as u64;
            if len_u64 > limit {
                return Err(SvgDecodeError::firewall_violation(format!(
                    "SVG firewall: document size {} bytes exceeds limit of {} bytes",
                    len_u64, limit
                )));
            }
        }
        Ok(())
    }

    pub fn enforce_pixels(&self, width: u32, height: u32) -> Result<(), SvgDecodeError> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(limit) = self.max_pixels {
            let pixels = width as u64 * height as u64;
            if pixels > limit {
                return Err(SvgDecodeError::firewall_violation(format!(
                    "SVG firewall: render target {}x{} ({} pixels) exceeds limit of {} pixels. \
                     Request a smaller size or lower the density.",
                    width, height, pixels, limit
                )));
            }
        }
        Ok(())
    }
}

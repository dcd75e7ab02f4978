#![forbid(unsafe_code)]

//! Overlay configuration as data.
//!
//! Captures every tunable of the overlay engine as a single [`OverlayConfig`]
//! that can be loaded from TOML or JSON at startup instead of being baked into
//! the animation code.
//!
//! # Loading
//!
//! ```toml
//! # veil.toml
//! [dismiss]
//! projection_factor = 0.1
//! fling_velocity_threshold = 1000.0
//!
//! [gesture]
//! tap_max_travel = 32.0
//! ```
//!
//! ```rust,ignore
//! let config = OverlayConfig::from_toml_file("veil.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value the overlay was tuned with, so
//! `OverlayConfig::default()` reproduces the stock behavior.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use veil_core::animation::{DecayConfig, Easing, SpringConfig, TimingConfig};
use veil_core::gesture::GestureConfig;

// ---------------------------------------------------------------------------
// Top-level OverlayConfig
// ---------------------------------------------------------------------------

/// Top-level configuration of the overlay engine.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OverlayConfig {
    /// Pan/tap recognition thresholds.
    pub gesture: GestureConfig,

    /// Drag feedback ramps.
    pub drag: DragPolicyConfig,

    /// Release decision and dismissal animations.
    pub dismiss: DismissPolicyConfig,

    /// Show, hide and snap-back transitions.
    pub transitions: TransitionPolicyConfig,

    /// Frame ticker cadence.
    pub frame: FramePolicyConfig,
}

impl OverlayConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.gesture.pan_activation_distance <= 0.0 {
            errors.push(format!(
                "gesture.pan_activation_distance must be > 0, got {}",
                self.gesture.pan_activation_distance
            ));
        }
        if self.gesture.tap_max_travel < 0.0 {
            errors.push(format!(
                "gesture.tap_max_travel must be >= 0, got {}",
                self.gesture.tap_max_travel
            ));
        }
        if self.gesture.velocity_window_ms == 0 {
            errors.push("gesture.velocity_window_ms must be > 0".into());
        }

        for (name, value) in [
            ("drag.min_opacity", self.drag.min_opacity),
            ("drag.min_scale", self.drag.min_scale),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be in [0, 1], got {value}"));
            }
        }

        if self.dismiss.projection_factor < 0.0 {
            errors.push(format!(
                "dismiss.projection_factor must be >= 0, got {}",
                self.dismiss.projection_factor
            ));
        }
        if self.dismiss.fling_velocity_threshold < 0.0 {
            errors.push(format!(
                "dismiss.fling_velocity_threshold must be >= 0, got {}",
                self.dismiss.fling_velocity_threshold
            ));
        }
        let d = self.dismiss.decay.deceleration;
        if d <= 0.0 || d >= 1.0 {
            errors.push(format!("dismiss.decay.deceleration must be in (0, 1), got {d}"));
        }

        let spring = &self.transitions.show_spring;
        if spring.stiffness <= 0.0 {
            errors.push(format!(
                "transitions.show_spring.stiffness must be > 0, got {}",
                spring.stiffness
            ));
        }
        if spring.mass <= 0.0 {
            errors.push(format!(
                "transitions.show_spring.mass must be > 0, got {}",
                spring.mass
            ));
        }
        if spring.damping < 0.0 {
            errors.push(format!(
                "transitions.show_spring.damping must be >= 0, got {}",
                spring.damping
            ));
        }

        if self.frame.interval_ms == 0 {
            errors.push("frame.interval_ms must be > 0".into());
        }

        errors
    }

    /// Validate, turning any problems into [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Format as a JSONL line for structured logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"overlay-config-v1","projection_factor":{},"fling_velocity_threshold":{},"tap_max_travel":{},"pan_activation_distance":{},"dismiss_ms":{},"hide_ms":{},"show_stiffness":{}}}"#,
            self.dismiss.projection_factor,
            self.dismiss.fling_velocity_threshold,
            self.gesture.tap_max_travel,
            self.gesture.pan_activation_distance,
            self.dismiss.fade.duration_ms,
            self.transitions.hide.duration_ms,
            self.transitions.show_spring.stiffness,
        )
    }
}

// ---------------------------------------------------------------------------
// Sub-configs (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// How far the bubble visibly reacts to a drag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DragPolicyConfig {
    /// Opacity reached at half the screen height. Default: 0.75.
    pub min_opacity: f64,
    /// Scale reached at half the screen height. Default: 0.85.
    pub min_scale: f64,
}

impl Default for DragPolicyConfig {
    fn default() -> Self {
        Self {
            min_opacity: 0.75,
            min_scale: 0.85,
        }
    }
}

/// Release decision and dismissal animation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DismissPolicyConfig {
    /// Seconds of release velocity added to the translation when deciding.
    /// Default: 0.1.
    pub projection_factor: f64,
    /// Release speed (units/s) above which dismissal flings. Default: 1000.
    pub fling_velocity_threshold: f64,
    /// Opacity fade-out. Default: 200 ms ease-out.
    pub fade: TimingConfig,
    /// Non-fling position animation to full height. Default: 200 ms ease-out.
    pub slide: TimingConfig,
    /// Fling friction.
    pub decay: DecayConfig,
}

impl Default for DismissPolicyConfig {
    fn default() -> Self {
        Self {
            projection_factor: 0.1,
            fling_velocity_threshold: 1000.0,
            fade: TimingConfig::new(Duration::from_millis(200), Easing::EaseOut),
            slide: TimingConfig::new(Duration::from_millis(200), Easing::EaseOut),
            decay: DecayConfig::default(),
        }
    }
}

/// Show/hide/snap-back transitions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TransitionPolicyConfig {
    /// Spring presenting the overlay.
    pub show_spring: SpringConfig,
    /// Timing hiding the overlay. Default: 150 ms ease-out.
    pub hide: TimingConfig,
    /// Timing returning translate/scale/opacity to rest. Default: platform
    /// default (300 ms, quadratic in-out).
    pub snap_back: TimingConfig,
}

impl Default for TransitionPolicyConfig {
    fn default() -> Self {
        Self {
            show_spring: SpringConfig::overlay_show(),
            hide: TimingConfig::new(Duration::from_millis(150), Easing::EaseOut),
            snap_back: TimingConfig::default(),
        }
    }
}

/// Frame ticker cadence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FramePolicyConfig {
    /// Interval between frames in milliseconds. Default: 16.
    pub interval_ms: u64,
}

impl Default for FramePolicyConfig {
    fn default() -> Self {
        Self { interval_ms: 16 }
    }
}

impl FramePolicyConfig {
    /// Frame interval as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an overlay configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

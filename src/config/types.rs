//! Configuration type definitions.

use crate::draw::DEFAULT_STROKE_WIDTH;
use crate::inference::{DEFAULT_ENDPOINT, FeatureMode};
use crate::session::StaleResponsePolicy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Pen width in surface pixels (valid range: 5.0 - 60.0)
    /// The surface is 280px wide and is reduced 10x before classification,
    /// so thin strokes fade to almost nothing in the sample
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            stroke_width: default_stroke_width(),
        }
    }
}

/// Remote classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InferenceConfig {
    /// Absolute http(s) URL of the predict route
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Feature mode selected at startup (f1 - f5)
    #[serde(default)]
    pub default_feature: FeatureMode,

    /// Seconds allowed for establishing the connection (valid range: 1 - 300)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// What to do with a response that arrives after the surface was cleared
    /// - "apply": show it anyway
    /// - "discard": drop it
    #[serde(default)]
    pub stale_responses: StaleResponsePolicy,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_feature: FeatureMode::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

pub(super) fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WayfindConfig {
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Threshold written into generated `text_fuzzy` strategies.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default = "default_scroll_pixels_per_page")]
    pub scroll_pixels_per_page: i64,
    /// Append the page title to click/input descriptions.
    #[serde(default = "default_enrich_descriptions")]
    pub enrich_descriptions: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            scroll_pixels_per_page: default_scroll_pixels_per_page(),
            enrich_descriptions: default_enrich_descriptions(),
        }
    }
}

fn default_fuzzy_threshold() -> f64 {
    0.8
}

fn default_scroll_pixels_per_page() -> i64 {
    800
}

fn default_enrich_descriptions() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Used for `text_fuzzy` strategies whose metadata carries no threshold.
    #[serde(default = "default_fuzzy_threshold")]
    pub default_fuzzy_threshold: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            default_fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

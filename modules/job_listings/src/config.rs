use serde::{Deserialize, Serialize};

/// `modules.job_listings` section of the application config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobListingsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "max_page_size")]
    pub max_page_size: u64,
}

fn default_page_size() -> u64 {
    20
}

fn max_page_size() -> u64 {
    100
}

impl Default for JobListingsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}

impl JobListingsConfig {
    /// Parse the module's entry of the free-form `modules` bag; a missing entry means defaults.
    pub fn from_module_value(value: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        match value {
            Some(v) => Ok(serde_json::from_value(v.clone())?),
            None => Ok(Self::default()),
        }
    }

    /// Effective limits. Sizes are at least 1 and the default never exceeds the maximum.
    pub fn limits(&self) -> listing_core::PageLimits {
        let max = self.max_page_size.max(1);
        listing_core::PageLimits {
            default: self.default_page_size.clamp(1, max),
            max,
        }
    }
}

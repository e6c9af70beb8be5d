use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Ask the platform resolver about names missing from the domain table.
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DomainsConfig {
    /// INI-style domain table; built-in defaults are used when it does not exist.
    #[serde(default = "default_domains_path")]
    pub path: String,

    /// TTL, in seconds, of every synthesized A answer.
    #[serde(default = "default_answer_ttl")]
    pub ttl: u32,
}

impl Default for DomainsConfig {
    fn default() -> Self {
        Self {
            path: default_domains_path(),
            ttl: default_answer_ttl(),
        }
    }
}

fn default_domains_path() -> String {
    "domains.conf".to_string()
}

fn default_answer_ttl() -> u32 {
    60
}

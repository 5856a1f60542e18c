//! Application configuration. Mention policy, lookup limits.

use serde::Deserialize;

/// Default cap on `find_all` results when the query does not bound them.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// How the mention resolver handles same-display-name collisions on the
/// best-effort marker path. The originating client's data cannot
/// disambiguate these, so the policy is a deployment choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionPolicy {
    /// Return every candidate, in roster order.
    #[default]
    All,
    /// Return the first candidate only.
    First,
    /// Drop the ambiguous mention entirely.
    None,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Ambiguous-mention handling. Read from CHAT_CORE_MENTION_POLICY
    /// (`all` | `first` | `none`).
    #[serde(default)]
    pub mention_policy: MentionPolicy,

    /// Max results returned by `find_all`. Read from CHAT_CORE_SEARCH_LIMIT.
    #[serde(default)]
    pub search_limit: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("CHAT_CORE"));
        if let Ok(path) = std::env::var("CHAT_CORE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

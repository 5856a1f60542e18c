//! Application use cases. Orchestrate domain logic via ports.

pub mod dispatcher;
pub mod finder;
pub mod hydrator;
pub mod mentions;
pub mod message;

pub use finder::{find, find_all};
pub use message::{HydrationState, Message, Reply};

use std::sync::Arc;

use crate::ports::{DirectoryPort, TransportPort};
use crate::shared::config::{AppConfig, MentionPolicy, DEFAULT_SEARCH_LIMIT};

/// Collaborator handles injected into every message entity. Cheap to clone;
/// the ports are shared.
#[derive(Clone)]
pub struct Services {
    pub directory: Arc<dyn DirectoryPort>,
    pub transport: Arc<dyn TransportPort>,
    pub mention_policy: MentionPolicy,
    pub search_limit: usize,
}

impl Services {
    pub fn new(directory: Arc<dyn DirectoryPort>, transport: Arc<dyn TransportPort>) -> Self {
        Self {
            directory,
            transport,
            mention_policy: MentionPolicy::default(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Wire services from loaded configuration.
    pub fn with_config(
        directory: Arc<dyn DirectoryPort>,
        transport: Arc<dyn TransportPort>,
        cfg: &AppConfig,
    ) -> Self {
        Self {
            directory,
            transport,
            mention_policy: cfg.mention_policy,
            search_limit: cfg.search_limit(),
        }
    }
}

use crate::admin::fixtures::{CannedResponses, FixtureStore};
use crate::admin::scheduler::Scheduler;
use crate::config::Config;
use crate::directory::FixtureDirectory;
use crate::registry::SessionRegistry;
use std::sync::Arc;

/// Process-wide state shared by every connection and the HTTP side channel.
#[derive(Clone)]
pub struct ServerContext {
    pub domain: Arc<String>,
    pub registry: SessionRegistry,
    pub directory: FixtureDirectory,
    pub scheduler: Scheduler,
    pub fixtures: Arc<dyn FixtureStore>,
}

impl ServerContext {
    pub fn new(config: &Config) -> Self {
        ServerContext {
            domain: Arc::new(config.domain.clone()),
            registry: SessionRegistry::new(),
            directory: FixtureDirectory::new(config.friends_fixture.clone()),
            scheduler: Scheduler::new(),
            fixtures: Arc::new(CannedResponses::new()),
        }
    }
}

use crate::errors::upstream_error::UpstreamError;
use crate::models::identity;
use crate::models::profile::UserProfile;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Profiles and friends lists, read from a JSON fixture every time a session starts.
///
/// The fixture maps identities (or bare user names) to profiles; a `"*"` entry applies
/// to every user without one of their own. Without a fixture, or for unlisted users,
/// the profile is synthesized with an empty roster.
#[derive(Debug, Clone, Default)]
pub struct FixtureDirectory {
    path: Option<Arc<PathBuf>>,
}

impl FixtureDirectory {
    pub fn new(path: Option<PathBuf>) -> Self {
        FixtureDirectory {
            path: path.map(Arc::new),
        }
    }

    pub async fn profile(&self, identity: &str) -> Result<UserProfile, UpstreamError> {
        let Some(path) = &self.path else {
            return Ok(UserProfile::default());
        };

        let contents = tokio::fs::read_to_string(path.as_path()).await?;
        let mut profiles: HashMap<String, UserProfile> = serde_json::from_str(&contents)?;

        Ok(profiles
            .remove(identity)
            .or_else(|| profiles.remove(identity::local_part(identity)))
            .or_else(|| profiles.remove("*"))
            .unwrap_or_default())
    }
}

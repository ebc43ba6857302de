use super::friend::{Friend, Presence, Subscription};
use super::identity;
use super::local_user::LocalUser;
use super::roster::Roster;
use serde::Deserialize;
use std::sync::Arc;

/// A user as the friends fixture describes it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub persona_id: Option<String>,
    #[serde(default)]
    pub friends: Vec<FriendProfile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendProfile {
    pub identity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub persona_id: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub presence: Presence,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "loaded_subscription")]
    pub subscription: Subscription,
}

fn loaded_subscription() -> Subscription {
    Subscription::Both
}

impl UserProfile {
    pub fn local_user(&self, identity: &str) -> LocalUser {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| identity::local_part(identity).to_string());
        let persona_id = self.persona_id.clone().unwrap_or_else(|| name.clone());

        LocalUser::new(
            Arc::new(identity.to_string()),
            Arc::new(name),
            Arc::new(persona_id),
        )
    }

    /// Roster in the order the fixture lists friends. Duplicates keep the last entry.
    pub fn roster(&self) -> Roster {
        let mut roster = Roster::new();
        for friend in &self.friends {
            roster.add(friend.to_friend());
        }
        roster
    }
}

impl FriendProfile {
    pub fn to_friend(&self) -> Friend {
        let mut friend = Friend::synthesize(&self.identity);
        if let Some(name) = &self.name {
            friend.name = Arc::new(name.clone());
        }

        friend.persona_id = Arc::new(
            self.persona_id
                .clone()
                .unwrap_or_else(|| friend.name.to_string()),
        );

        friend.external_id = Arc::new(self.external_id.clone().unwrap_or_default());
        friend.presence = self.presence;
        friend.status = self.status.clone().map(Arc::new);
        friend.subscription = self.subscription;
        friend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::friend::Ask;

    #[test]
    fn loads_friends_in_fixture_order() {
        let profile: UserProfile = serde_json::from_str(
            r#"{
                "name": "Alice",
                "friends": [
                    { "identity": "bob@mock.local", "name": "Bob", "presence": "ONLINE" },
                    { "identity": "carol@mock.local", "subscription": "none" }
                ]
            }"#,
        )
        .unwrap();

        let roster = profile.roster();
        let friends: Vec<&Friend> = roster.all().collect();

        assert_eq!(friends.len(), 2);
        assert_eq!(*friends[0].name, "Bob");
        assert_eq!(friends[0].presence, Presence::Online);
        assert_eq!(friends[0].subscription, Subscription::Both);
        assert_eq!(*friends[1].name, "carol");
        assert_eq!(friends[1].subscription, Subscription::None);
        assert_eq!(friends[1].ask, Ask::Null);
    }

    #[test]
    fn local_user_defaults_to_local_part() {
        let user = UserProfile::default().local_user("dave@mock.local");

        assert_eq!(*user.name, "dave");
        assert_eq!(*user.persona_id, "dave");
        assert_eq!(user.presence, Presence::Offline);
    }
}

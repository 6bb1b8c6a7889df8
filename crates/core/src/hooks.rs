//! Hooks converting between a user profile and its session representation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{AuthError, Profile, Result};

/// Turns an authenticated profile into the value stored in the session.
#[async_trait]
pub trait SerializeUser: Send + Sync {
    async fn serialize_user(&self, user: &Profile) -> Result<Value>;
}

/// Turns a stored session value back into a profile.
///
/// Returning `Ok(None)` means the stored user is no longer valid; the session
/// is treated as logged out.
#[async_trait]
pub trait DeserializeUser: Send + Sync {
    async fn deserialize_user(&self, stored: Value) -> Result<Option<Profile>>;
}

/// Hook used when a user logs in.
#[derive(Clone, Default)]
pub enum SerializeHook {
    /// Store the full profile verbatim.
    #[default]
    Passthrough,
    Custom(Arc<dyn SerializeUser>),
}

impl SerializeHook {
    pub fn custom(hook: impl SerializeUser + 'static) -> Self {
        Self::Custom(Arc::new(hook))
    }

    pub async fn serialize(&self, user: &Profile) -> Result<Value> {
        match self {
            Self::Passthrough => {
                serde_json::to_value(user).map_err(|e| AuthError::Hook(e.to_string()))
            }
            Self::Custom(hook) => hook.serialize_user(user).await,
        }
    }
}

impl fmt::Debug for SerializeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => f.write_str("Passthrough"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Hook used when a session is restored on each request.
#[derive(Clone, Default)]
pub enum DeserializeHook {
    /// Read the stored value back as a full profile.
    #[default]
    Passthrough,
    Custom(Arc<dyn DeserializeUser>),
}

impl DeserializeHook {
    pub fn custom(hook: impl DeserializeUser + 'static) -> Self {
        Self::Custom(Arc::new(hook))
    }

    pub async fn deserialize(&self, stored: Value) -> Result<Option<Profile>> {
        match self {
            Self::Passthrough => serde_json::from_value(stored)
                .map(Some)
                .map_err(|e| AuthError::Hook(e.to_string())),
            Self::Custom(hook) => hook.deserialize_user(stored).await,
        }
    }
}

impl fmt::Debug for DeserializeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => f.write_str("Passthrough"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct IdOnly;

    #[async_trait]
    impl SerializeUser for IdOnly {
        async fn serialize_user(&self, user: &Profile) -> Result<Value> {
            Ok(json!(user.id))
        }
    }

    #[async_trait]
    impl DeserializeUser for IdOnly {
        async fn deserialize_user(&self, stored: Value) -> Result<Option<Profile>> {
            Ok(stored.as_str().map(|id| Profile::new("auth0", id)))
        }
    }

    #[tokio::test]
    async fn passthrough_stores_full_profile() {
        let profile = Profile::new("auth0", "user-1").with_email("a@example.com");

        let stored = SerializeHook::Passthrough.serialize(&profile).await.unwrap();
        assert_eq!(stored["id"], "user-1");
        assert_eq!(stored["emails"][0], "a@example.com");

        let restored = DeserializeHook::Passthrough.deserialize(stored).await.unwrap();
        assert_eq!(restored, Some(profile));
    }

    #[tokio::test]
    async fn passthrough_rejects_garbage() {
        let result = DeserializeHook::Passthrough.deserialize(json!(42)).await;
        assert!(matches!(result, Err(AuthError::Hook(_))));
    }

    #[tokio::test]
    async fn custom_hooks_are_used() {
        let profile = Profile::new("auth0", "user-2").with_display_name("Two");

        let stored = SerializeHook::custom(IdOnly).serialize(&profile).await.unwrap();
        assert_eq!(stored, json!("user-2"));

        let restored = DeserializeHook::custom(IdOnly)
            .deserialize(stored)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restored.id, "user-2");
        assert_eq!(restored.display_name, None);
    }

    #[test]
    fn debug_hides_hook_internals() {
        assert_eq!(format!("{:?}", SerializeHook::custom(IdOnly)), "Custom(..)");
        assert_eq!(format!("{:?}", DeserializeHook::default()), "Passthrough");
    }
}

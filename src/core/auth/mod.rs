use uuid::Uuid;

/// Placeholder access token accepted by offline/legacy clients.
pub const OFFLINE_ACCESS_TOKEN: &str = "null";
pub const LEGACY_USER_TYPE: &str = "legacy";

/// Identity values passed to the game. No login flow exists; every profile
/// is an offline profile with fixed placeholder credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchAccountProfile {
    pub username: String,
    pub uuid: String,
    pub access_token: String,
    pub user_type: String,
}

impl LaunchAccountProfile {
    /// Offline profile for `username`. The name is passed through untouched.
    pub fn offline(username: &str) -> Self {
        Self {
            username: username.to_string(),
            uuid: Uuid::nil().to_string(),
            access_token: OFFLINE_ACCESS_TOKEN.into(),
            user_type: LEGACY_USER_TYPE.into(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Portal role, least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Moderator,
    Super,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Member => "Member",
            Role::Moderator => "Moderator",
            Role::Super => "Super",
        }
    }

    /// Moderators and supers may use the portal at all.
    pub fn can_access_portal(self) -> bool {
        self >= Role::Moderator
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub code: String,
    pub name: String,
    pub role: Role,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub ld_id: Option<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ld {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LdsResponse {
    #[serde(default)]
    pub lds: Vec<Ld>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwitchLdResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Create and PIN-reset both return the freshly generated PIN so it can be
/// shown to the moderator exactly once.
#[derive(Debug, Clone, Deserialize)]
pub struct PinResponse {
    pub pin: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dashboard {
    pub ld_id: Option<String>,
    pub ld_name: Option<String>,
    pub users_count: Option<u32>,
    pub hunts_this_month: Option<u32>,
    pub last_sync: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{LoginResponse, MeResponse, Role, User, UsersResponse};

    #[test]
    fn role_names_on_the_wire() {
        let user: User =
            serde_json::from_str(r#"{"code":"1001","name":"A","role":"super"}"#).unwrap();
        assert_eq!(user.role, Role::Super);
        assert!(user.enabled);

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains(r#""role":"super""#));
    }

    #[test]
    fn portal_access_requires_moderator() {
        assert!(!Role::Member.can_access_portal());
        assert!(Role::Moderator.can_access_portal());
        assert!(Role::Super.can_access_portal());
    }

    #[test]
    fn login_then_me_carries_the_same_code() {
        let login: LoginResponse = serde_json::from_str(
            r#"{"token":"t0k","user":{"code":"1001","name":"Mod","role":"moderator","ldId":"ld1"}}"#,
        )
        .unwrap();
        assert_eq!(login.token, "t0k");

        let me: MeResponse = serde_json::from_str(
            r#"{"user":{"code":"1001","name":"Mod","role":"moderator","ldId":"ld1"}}"#,
        )
        .unwrap();
        assert_eq!(me.user.code, login.user.code);
        assert_eq!(me.user.ld_id.as_deref(), Some("ld1"));
    }

    #[test]
    fn users_list_tolerates_missing_fields() {
        let resp: UsersResponse =
            serde_json::from_str(r#"{"users":[{"code":"7","name":"X","role":"member","enabled":false}]}"#)
                .unwrap();
        assert_eq!(resp.users.len(), 1);
        assert!(!resp.users[0].enabled);
    }
}

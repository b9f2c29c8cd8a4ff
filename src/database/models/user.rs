use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Local mirror of an identity-provider account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written by `POST /api/auth/register`. Empty or missing email and
/// display name keep whatever the stored record already has.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

impl User {
    /// Apply a registration on top of an existing record (or a fresh one)
    pub fn merge_profile(existing: Option<User>, profile: UserProfile) -> User {
        let now = Utc::now();
        let email = profile.email.filter(|e| !e.is_empty());
        let display_name = profile.display_name.filter(|n| !n.is_empty());

        match existing {
            Some(mut user) => {
                if let Some(email) = email {
                    user.email = email;
                }
                if let Some(name) = display_name {
                    user.display_name = name;
                }
                user.email_verified = profile.email_verified;
                user.updated_at = now;
                user
            }
            None => User {
                uid: profile.uid,
                email: email.unwrap_or_default(),
                display_name: display_name.unwrap_or_default(),
                email_verified: profile.email_verified,
                created_at: now,
                updated_at: now,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: Option<&str>, name: Option<&str>, verified: bool) -> UserProfile {
        UserProfile {
            uid: "uid-1".into(),
            email: email.map(String::from),
            display_name: name.map(String::from),
            email_verified: verified,
        }
    }

    #[test]
    fn new_user_defaults_missing_fields_to_empty() {
        let user = User::merge_profile(None, profile(None, None, false));
        assert_eq!(user.uid, "uid-1");
        assert_eq!(user.email, "");
        assert_eq!(user.display_name, "");
    }

    #[test]
    fn existing_user_keeps_fields_the_token_omits() {
        let first = User::merge_profile(None, profile(Some("a@example.com"), Some("Ada"), false));
        let second = User::merge_profile(Some(first.clone()), profile(Some(""), None, true));
        assert_eq!(second.email, "a@example.com");
        assert_eq!(second.display_name, "Ada");
        assert!(second.email_verified);
        assert_eq!(second.created_at, first.created_at);
    }
}

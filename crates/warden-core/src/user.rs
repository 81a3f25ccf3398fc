use serde::{Deserialize, Serialize};

/// A stored account. The collection of all users is the entire persisted
/// state of the service; there are no ids, timestamps, or roles.
///
/// Field order is the canonical serialization order for the encrypted
/// blob, so reordering fields is a format change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique, case-sensitive identifier.
    pub username: String,
    /// Argon2id PHC string. Raw passwords are never persisted.
    pub password_hash: String,
    /// Display name.
    pub name: String,
}

/// Projection of a [`User`] with the secret field stripped. This is the
/// only user shape that ever leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafeUser {
    pub username: String,
    pub name: String,
}

impl User {
    pub fn safe_view(&self) -> SafeUser {
        SafeUser {
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

/// Safe views of every user, insertion order preserved.
pub fn safe_views(users: &[User]) -> Vec<SafeUser> {
    users.iter().map(User::safe_view).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> User {
        User {
            username: username.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            name: format!("{username} display"),
        }
    }

    #[test]
    fn safe_view_strips_the_hash() {
        let view = user("alice").safe_view();
        let json = serde_json::to_value(&view).expect("serialize");

        assert_eq!(json["username"], "alice");
        assert_eq!(json["name"], "alice display");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn safe_views_preserve_order() {
        let users = vec![user("a"), user("b"), user("c")];
        let views = safe_views(&users);

        let usernames: Vec<_> = views.iter().map(|v| v.username.as_str()).collect();
        assert_eq!(usernames, ["a", "b", "c"]);
    }
}

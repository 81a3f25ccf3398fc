//! Pure operations over the user collection. Nothing here touches the
//! file system; callers load a collection, transform it, and persist the
//! result through a [`crate::store::UserStore`].

use thiserror::Error;

use crate::password::verify_password;
use crate::user::User;

/// Errors from collection-level operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Insert would violate username uniqueness.
    #[error("user already exists: {username}")]
    DuplicateUser { username: String },
    /// Remove target does not exist.
    #[error("user not found: {username}")]
    UserNotFound { username: String },
}

/// Exact, case-sensitive lookup. Uniqueness guarantees at most one match.
pub fn find_by_username<'a>(users: &'a [User], username: &str) -> Option<&'a User> {
    users.iter().find(|u| u.username == username)
}

/// Append a user, enforcing username uniqueness. Returns the new
/// collection; the caller decides whether it gets persisted.
pub fn insert(mut users: Vec<User>, user: User) -> Result<Vec<User>, RegistryError> {
    if find_by_username(&users, &user.username).is_some() {
        return Err(RegistryError::DuplicateUser {
            username: user.username,
        });
    }
    users.push(user);
    Ok(users)
}

/// Remove the user with the given username, preserving the order of the
/// remaining users.
pub fn remove(users: Vec<User>, username: &str) -> Result<Vec<User>, RegistryError> {
    if find_by_username(&users, username).is_none() {
        return Err(RegistryError::UserNotFound {
            username: username.to_string(),
        });
    }
    Ok(users.into_iter().filter(|u| u.username != username).collect())
}

/// Resolve a username/password pair to its user, or `None` when either
/// the username is unknown or the password does not verify.
pub fn verify_credentials<'a>(
    users: &'a [User],
    username: &str,
    raw_password: &str,
) -> Option<&'a User> {
    find_by_username(users, username).filter(|u| verify_password(raw_password, &u.password_hash))
}

mod require;
pub use require::*;

use crate::{
    authenticator::{error::AuthorizationError, user::UserInformation},
    default::DEFAULT_ROLE_PERMISSIONS,
    Permission,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use venter_entity::role::Role;

/// Grants permissions to users based on their role.
#[derive(Clone, Debug)]
pub struct Authorizer {
    permissions: Arc<HashMap<Role, HashSet<Permission>>>,
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_PERMISSIONS.iter().copied())
    }
}

impl Authorizer {
    pub fn new<'a>(mappings: impl IntoIterator<Item = (Role, &'a [Permission])>) -> Self {
        let mut permissions = HashMap::<Role, HashSet<Permission>>::new();
        for (role, granted) in mappings {
            permissions
                .entry(role)
                .or_default()
                .extend(granted.iter().copied());
        }

        Self {
            permissions: Arc::new(permissions),
        }
    }

    /// Check if the user has the permission.
    pub fn has(&self, user: &UserInformation, permission: Permission) -> bool {
        match user {
            UserInformation::Authenticated(details) => self
                .permissions
                .get(&details.role)
                .is_some_and(|granted| granted.contains(&permission)),
            UserInformation::Anonymous => false,
        }
    }

    /// Require a permission from the user.
    ///
    /// Fails with [`AuthorizationError::Anonymous`] for unauthenticated users, and with
    /// [`AuthorizationError::Failed`] if the role lacks the permission.
    pub fn require(
        &self,
        user: &UserInformation,
        permission: Permission,
    ) -> Result<(), AuthorizationError> {
        match user {
            UserInformation::Anonymous => Err(AuthorizationError::Anonymous),
            user if self.has(user, permission) => Ok(()),
            UserInformation::Authenticated(details) => {
                log::debug!(
                    "user {} ({}) lacks permission {permission}",
                    details.username,
                    details.role
                );
                Err(AuthorizationError::Failed)
            }
        }
    }
}

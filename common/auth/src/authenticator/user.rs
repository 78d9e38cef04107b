use crate::authenticator::error::AuthorizationError;
use venter_entity::{profile, role::Role, user};

/// The identity of an authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserDetails {
    pub id: i32,
    pub username: String,
    pub role: Role,
    /// The organisation of the user's profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<i32>,
    /// The id of the user's profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<i32>,
    /// The session generation of the user when this identity was loaded
    #[serde(default)]
    pub session: i32,
}

impl From<(user::Model, Option<profile::Model>)> for UserDetails {
    fn from((user, profile): (user::Model, Option<profile::Model>)) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            organisation: profile.as_ref().and_then(|p| p.organisation_id),
            profile: profile.map(|p| p.id),
            session: user.session_version,
        }
    }
}

impl UserDetails {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UserInformation {
    Authenticated(UserDetails),
    #[default]
    Anonymous,
}

impl UserInformation {
    pub fn id(&self) -> Option<i32> {
        self.details().map(|details| details.id)
    }

    pub fn details(&self) -> Option<&UserDetails> {
        match self {
            Self::Authenticated(details) => Some(details),
            Self::Anonymous => None,
        }
    }

    pub fn require_details(&self) -> Result<&UserDetails, AuthorizationError> {
        self.details().ok_or(AuthorizationError::Anonymous)
    }
}

#[cfg(feature = "actix-web")]
mod actix {
    use super::*;
    use actix_http::{HttpMessage, Payload};
    use actix_web::{FromRequest, HttpRequest};
    use core::future::{ready, Ready};

    impl FromRequest for UserInformation {
        type Error = actix_web::Error;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
            ready(Ok(req
                .extensions()
                .get::<UserInformation>()
                .cloned()
                .unwrap_or_default()))
        }
    }

    /// Extract the details of the authenticated user.
    ///
    /// Anonymous requests get rejected, redirecting to the login page.
    impl FromRequest for UserDetails {
        type Error = AuthorizationError;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
            ready(match req.extensions().get::<UserInformation>() {
                Some(UserInformation::Authenticated(details)) => Ok(details.clone()),
                _ => Err(AuthorizationError::Anonymous),
            })
        }
    }
}

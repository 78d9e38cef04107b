use actix_http::{HttpMessage, Request};
use venter_auth::authenticator::user::{UserDetails, UserInformation};

/// Convenient way of adding (authenticated) user information to the request.
pub trait TestAuthentication: Sized {
    /// Make the request an authenticated request with the provided user details
    fn test_auth_details(self, details: UserDetails) -> Self;
}

impl TestAuthentication for Request {
    fn test_auth_details(self, details: UserDetails) -> Self {
        test_auth(self, details)
    }
}

/// Add data making the request authenticated.
///
/// The authentication middleware keeps this identity, as the request carries no session token.
pub fn test_auth(request: Request, details: UserDetails) -> Request {
    request
        .extensions_mut()
        .insert(UserInformation::Authenticated(details));
    request
}

use crate::{
    authenticator::{error::AuthorizationError, user::UserInformation},
    authorizer::Authorizer,
};
use std::marker::PhantomData;

pub struct Require<T: Requirement>(PhantomData<T>);

#[derive(Debug, thiserror::Error)]
pub enum RequirementError {
    #[error("missing authorizer, must call .app_data(authorizer)")]
    MissingAuthorizer,
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
}

#[cfg(feature = "actix-web")]
impl actix_web::ResponseError for RequirementError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            Self::MissingAuthorizer => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::Authorization(err) => actix_web::ResponseError::status_code(err),
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse<actix_http::body::BoxBody> {
        match self {
            Self::MissingAuthorizer => actix_web::HttpResponse::InternalServerError().json(
                venter_common::error::ErrorInformation {
                    error: "MissingAuthorizer".into(),
                    message: self.to_string(),
                    details: None,
                },
            ),
            Self::Authorization(err) => actix_web::ResponseError::error_response(err),
        }
    }
}

pub trait Requirement {
    fn enforce(authorizer: &Authorizer, user: &UserInformation) -> Result<(), RequirementError>;
}

#[cfg(feature = "actix-web")]
impl<T: Requirement> actix_web::FromRequest for Require<T> {
    type Error = RequirementError;
    type Future = core::future::Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_http::Payload,
    ) -> Self::Future {
        fn enforce<T: Requirement>(
            req: &actix_web::HttpRequest,
        ) -> Result<Require<T>, RequirementError> {
            use actix_http::HttpMessage;

            let authorizer = req
                .app_data::<actix_web::web::Data<Authorizer>>()
                .ok_or(RequirementError::MissingAuthorizer)?;
            let ext = req.extensions();
            let user = ext.get::<UserInformation>();

            T::enforce(authorizer, user.unwrap_or(&UserInformation::Anonymous))?;

            Ok(Require(Default::default()))
        }

        core::future::ready(enforce(req))
    }
}

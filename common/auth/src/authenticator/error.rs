use jsonwebtoken::errors::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("authentication failed")]
    Failed,
    #[error("session expired")]
    Expired,
    #[error("unable to issue session: {0}")]
    Issue(String),
}

impl From<jsonwebtoken::errors::Error> for AuthenticationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Failed,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    /// There is no authenticated user
    #[error("authentication required")]
    Anonymous,
    #[error("Unauthorized")]
    Failed,
}

#[cfg(feature = "actix-web")]
mod actix {
    use super::*;
    use actix_web::{http::header, HttpResponse, ResponseError};
    use venter_common::error::ErrorInformation;

    /// Where anonymous users get sent to.
    pub const LOGIN_PATH: &str = "/venter/login/";

    impl ResponseError for AuthenticationError {
        fn status_code(&self) -> actix_web::http::StatusCode {
            match self {
                Self::Issue(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                _ => actix_web::http::StatusCode::UNAUTHORIZED,
            }
        }

        fn error_response(&self) -> HttpResponse {
            HttpResponse::build(self.status_code())
                .json(ErrorInformation::new("Authentication", self))
        }
    }

    impl ResponseError for AuthorizationError {
        fn status_code(&self) -> actix_web::http::StatusCode {
            match self {
                Self::Anonymous => actix_web::http::StatusCode::SEE_OTHER,
                Self::Failed => actix_web::http::StatusCode::UNAUTHORIZED,
            }
        }

        fn error_response(&self) -> HttpResponse {
            match self {
                Self::Anonymous => HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, LOGIN_PATH))
                    .finish(),
                Self::Failed => {
                    HttpResponse::Unauthorized().json(ErrorInformation::new("Unauthorized", self))
                }
            }
        }
    }
}

#[cfg(feature = "actix-web")]
pub use actix::LOGIN_PATH;

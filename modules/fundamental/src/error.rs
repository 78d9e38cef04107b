use actix_web::body::BoxBody;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, TransactionError};
use venter_auth::authenticator::error::{AuthenticationError, AuthorizationError};
use venter_common::error::ErrorInformation;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Database(anyhow::Error),
    #[error(transparent)]
    Storage(anyhow::Error),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        Self::Database(value.into())
    }
}

impl From<TransactionError<Error>> for Error {
    fn from(value: TransactionError<Error>) -> Self {
        match value {
            TransactionError::Connection(err) => err.into(),
            TransactionError::Transaction(err) => err,
        }
    }
}

impl From<actix_multipart::MultipartError> for Error {
    fn from(value: actix_multipart::MultipartError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            Self::Authorization(err) => err.status_code(),
            Self::Authentication(err) => err.status_code(),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Storage(_) | Self::Any(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::Authorization(err) => err.error_response(),
            Self::Authentication(err) => err.error_response(),
            Self::NotFound(what) => {
                HttpResponse::NotFound().json(ErrorInformation::new("NotFound", what))
            }
            Self::BadRequest(msg) => {
                HttpResponse::BadRequest().json(ErrorInformation::new("Bad request", msg))
            }
            Self::Database(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Database error", err)),
            Self::Storage(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("Storage error", err)),
            Self::Any(err) => HttpResponse::InternalServerError()
                .json(ErrorInformation::new("System unknown", err)),
        }
    }
}

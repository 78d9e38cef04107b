#[cfg(test)]
mod test;

use crate::{
    file::{
        model::{FileList, UploadState},
        service::{FileService, Visibility},
    },
    form::FormState,
    validation::upload::{Candidate, FIELD, MAX_UPLOAD_SIZE},
    Error,
};
use actix_multipart::{Multipart, MultipartError};
use actix_web::{get, http::header, post, web, HttpResponse, Responder};
use bytes::BytesMut;
use futures::TryStreamExt;
use sea_orm::EntityTrait;
use venter_auth::{
    authenticator::user::{UserDetails, UserInformation},
    authorizer::{Authorizer, Require},
    DeleteFile, Permission, ReadFile, UploadFile,
};
use venter_common::db::Database;
use venter_entity::organisation;
use venter_module_storage::service::fs::FileSystemBackend;

pub const DASHBOARD_PATH: &str = "/venter/dashboard/";

pub fn configure(
    config: &mut utoipa_actix_web::service_config::ServiceConfig,
    db: Database,
    storage: FileSystemBackend,
) {
    let service = FileService::new(storage);

    config
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(service))
        .service(upload_form)
        .service(upload)
        .service(dashboard)
        .service(delete);
}

async fn allowed_extension(
    user: &UserDetails,
    db: &Database,
) -> Result<Option<String>, Error> {
    let Some(organisation) = user.organisation else {
        return Ok(None);
    };

    Ok(organisation::Entity::find_by_id(organisation)
        .one(db)
        .await?
        .map(|org| org.upload_format.extension().to_string()))
}

#[utoipa::path(
    tag = "file",
    operation_id = "getUploadForm",
    responses(
        (status = 200, description = "The upload form", body = FormState<UploadState>),
        (status = 303, description = "Not logged in"),
    ),
)]
#[get("/upload_file/")]
/// Show the upload form
pub async fn upload_form(
    db: web::Data<Database>,
    user: UserDetails,
    _: Require<UploadFile>,
) -> Result<impl Responder, Error> {
    let allowed_extension = allowed_extension(&user, &db).await?;

    Ok(HttpResponse::Ok().json(FormState::unbound(UploadState {
        allowed_extension,
        file: None,
    })))
}

#[utoipa::path(
    tag = "file",
    operation_id = "uploadFile",
    request_body(content_type = "multipart/form-data", content = Vec<u8>),
    responses(
        (status = 200, description = "The outcome of the upload", body = FormState<UploadState>),
        (status = 303, description = "Not logged in"),
        (status = 401, description = "Not a member of an organisation"),
    ),
)]
#[post("/upload_file/")]
/// Upload a file for the requester's organisation
pub async fn upload(
    service: web::Data<FileService>,
    db: web::Data<Database>,
    user: UserDetails,
    _: Require<UploadFile>,
    mut payload: Multipart,
) -> Result<impl Responder, Error> {
    let candidate = read_upload(&mut payload).await?;
    let allowed_extension = allowed_extension(&user, &db).await?;

    let state = match service.upload(&user, candidate, db.as_ref()).await? {
        Ok(file) => FormState::accepted(UploadState {
            allowed_extension,
            file: Some(file),
        }),
        Err(rejected) => FormState::rejected(
            rejected,
            UploadState {
                allowed_extension,
                file: None,
            },
        ),
    };

    Ok(HttpResponse::Ok().json(state))
}

/// Read the `input_file` part of the upload.
///
/// Content beyond [`MAX_UPLOAD_SIZE`] is counted, but discarded. Other parts are ignored. A part
/// without a file name, or a body ending before its first part, counts as no file.
async fn read_upload(payload: &mut Multipart) -> Result<Option<Candidate>, Error> {
    let mut result = None;
    let mut parts = 0usize;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(MultipartError::Incomplete) if parts == 0 => {
                log::debug!("upload without any part");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        parts += 1;

        let file_name = field
            .content_disposition()
            .filter(|cd| cd.get_name() == Some(FIELD))
            .and_then(|cd| cd.get_filename())
            .map(ToString::to_string);

        let mut content = BytesMut::new();
        let mut size: u64 = 0;
        while let Some(chunk) = field.try_next().await? {
            size = size.saturating_add(chunk.len() as u64);
            if file_name.is_some() && size <= MAX_UPLOAD_SIZE {
                content.extend_from_slice(&chunk);
            }
        }

        if let Some(file_name) = file_name.filter(|name| !name.is_empty()) {
            if result.is_none() {
                result = Some(Candidate {
                    file_name,
                    size,
                    content: content.freeze(),
                });
            }
        }
    }

    Ok(result)
}

#[utoipa::path(
    tag = "file",
    operation_id = "listFiles",
    responses(
        (status = 200, description = "The files visible to the requester", body = FileList),
        (status = 303, description = "Not logged in"),
    ),
)]
#[get("/dashboard/")]
/// List uploaded files
///
/// Admins see all files of their organisation, employees only their own uploads.
pub async fn dashboard(
    service: web::Data<FileService>,
    db: web::Data<Database>,
    authorizer: web::Data<Authorizer>,
    user: UserInformation,
    _: Require<ReadFile>,
) -> Result<impl Responder, Error> {
    let visibility = if authorizer.has(&user, Permission::ReadAllFiles) {
        Visibility::Organisation
    } else {
        Visibility::Own
    };
    let details = user.require_details()?;

    let file_list = service
        .fetch_files(details, visibility, db.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(FileList { file_list }))
}

#[utoipa::path(
    tag = "file",
    operation_id = "deleteFile",
    params(
        ("id", Path, description = "The id of the file"),
    ),
    responses(
        (status = 303, description = "The file was deleted, continue with the dashboard"),
        (status = 401, description = "The requester may not delete files"),
        (status = 404, description = "No such file in the requester's organisation"),
    ),
)]
#[get("/delete_file/{id}/")]
/// Delete a file
pub async fn delete(
    service: web::Data<FileService>,
    db: web::Data<Database>,
    id: web::Path<i32>,
    user: UserDetails,
    _: Require<DeleteFile>,
) -> Result<impl Responder, Error> {
    let id = id.into_inner();
    let not_found = || Error::NotFound(format!("file {id}"));

    let organisation = user.organisation.ok_or_else(not_found)?;

    if service.delete_file(id, organisation, db.as_ref()).await? {
        log::info!("file {id} deleted by {}", user.username);
        Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, DASHBOARD_PATH))
            .finish())
    } else {
        Err(not_found())
    }
}

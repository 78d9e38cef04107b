#[cfg(test)]
mod test;

use crate::{
    form::FormState,
    profile::{
        model::{ProfileForm, ProfileState},
        service::ProfileService,
    },
    Error,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use venter_auth::authenticator::user::UserDetails;
use venter_common::db::Database;

pub fn configure(config: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    let service = ProfileService::new();

    config
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(service))
        .service(get)
        .service(update);
}

#[utoipa::path(
    tag = "profile",
    operation_id = "getProfile",
    params(
        ("user_id", Path, description = "The id of the user"),
    ),
    responses(
        (status = 200, description = "The profile form", body = FormState<ProfileState>),
        (status = 303, description = "Not logged in"),
        (status = 401, description = "The requester may not access the profile"),
        (status = 404, description = "The user has no profile"),
    ),
)]
#[get("/update_profile/{user_id}/")]
/// Show the profile of a user
pub async fn get(
    service: web::Data<ProfileService>,
    db: web::Data<Database>,
    user_id: web::Path<i32>,
    user: UserDetails,
) -> Result<impl Responder, Error> {
    let user_id = user_id.into_inner();
    service.check_access(&user, user_id, db.as_ref()).await?;

    match service.fetch_profile(user_id, db.as_ref()).await? {
        Some(profile) => Ok(HttpResponse::Ok().json(FormState::unbound(ProfileState { profile }))),
        None => Err(Error::NotFound(format!("profile of user {user_id}"))),
    }
}

#[utoipa::path(
    tag = "profile",
    operation_id = "updateProfile",
    params(
        ("user_id", Path, description = "The id of the user"),
    ),
    request_body(content = ProfileForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The outcome of the update", body = FormState<ProfileState>),
        (status = 303, description = "Not logged in"),
        (status = 401, description = "The requester may not access the profile"),
        (status = 404, description = "The user has no profile"),
    ),
)]
#[post("/update_profile/{user_id}/")]
/// Update the profile of a user
pub async fn update(
    service: web::Data<ProfileService>,
    db: web::Data<Database>,
    user_id: web::Path<i32>,
    user: UserDetails,
    web::Form(form): web::Form<ProfileForm>,
) -> Result<impl Responder, Error> {
    let user_id = user_id.into_inner();
    service.check_access(&user, user_id, db.as_ref()).await?;

    let state = match service.update_profile(user_id, form, db.as_ref()).await? {
        Ok(profile) => FormState::accepted(ProfileState { profile }),
        Err(rejected) => {
            let profile = service
                .fetch_profile(user_id, db.as_ref())
                .await?
                .ok_or_else(|| Error::NotFound(format!("profile of user {user_id}")))?;
            FormState::rejected(rejected, ProfileState { profile })
        }
    };

    Ok(HttpResponse::Ok().json(state))
}


use crate::{
    contact::{model::ContactForm, service::ContactService},
    form::{FormState, NoData},
    Error,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use venter_common::db::Database;

pub fn configure(config: &mut utoipa_actix_web::service_config::ServiceConfig, db: Database) {
    let service = ContactService::new();

    config
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(service))
        .service(contact_form)
        .service(contact);
}

#[utoipa::path(
    tag = "contact",
    operation_id = "getContactForm",
    responses(
        (status = 200, description = "The contact form", body = FormState<NoData>),
    ),
)]
#[get("/contact_us/")]
/// Show the contact form
pub async fn contact_form() -> impl Responder {
    HttpResponse::Ok().json(FormState::unbound(NoData {}))
}

#[utoipa::path(
    tag = "contact",
    operation_id = "submitContactForm",
    request_body(content = ContactForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The outcome of the submission", body = FormState<NoData>),
    ),
)]
#[post("/contact_us/")]
/// Send an inquiry
pub async fn contact(
    service: web::Data<ContactService>,
    db: web::Data<Database>,
    web::Form(form): web::Form<ContactForm>,
) -> Result<impl Responder, Error> {
    let outcome = service
        .submit(form, db.as_ref())
        .await?
        .map(|_| NoData {});

    Ok(HttpResponse::Ok().json(FormState::submitted(outcome, NoData::default)))
}

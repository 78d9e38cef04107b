use crate::{
    contact::model::ContactForm,
    validation::{field, Pipeline, Rejected},
    Error,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use time::OffsetDateTime;
use tracing::instrument;
use venter_entity::contact_inquiry;

#[derive(Default)]
pub struct ContactService {}

impl ContactService {
    pub fn new() -> Self {
        Self {}
    }

    /// Validate and persist an inquiry.
    #[instrument(skip(self, form, connection), fields(company = %form.company_name), err)]
    pub async fn submit<C: ConnectionTrait>(
        &self,
        form: ContactForm,
        connection: &C,
    ) -> Result<Result<i32, Rejected>, Error> {
        let form = ContactForm {
            first_name: form.first_name.trim().into(),
            last_name: form.last_name.trim().into(),
            company_name: form.company_name.trim().into(),
            email_address: form.email_address.trim().into(),
            contact_no: form.contact_no.trim().into(),
            requirement_details: form.requirement_details.trim().into(),
        };

        let outcome = Pipeline::<ContactForm>::new()
            .check("first_name", |f| field::is_present(&f.first_name), field::REQUIRED)
            .check("last_name", |f| field::is_present(&f.last_name), field::REQUIRED)
            .check("company_name", |f| field::is_present(&f.company_name), field::REQUIRED)
            .check("email_address", |f| field::is_present(&f.email_address), field::REQUIRED)
            .check(
                "email_address",
                |f| field::is_valid_email(&f.email_address),
                field::INVALID_EMAIL,
            )
            .check("contact_no", |f| field::is_present(&f.contact_no), field::REQUIRED)
            .check(
                "contact_no",
                |f| field::is_valid_phone_number(&f.contact_no),
                field::INVALID_PHONE_NUMBER,
            )
            .check(
                "requirement_details",
                |f| field::is_present(&f.requirement_details),
                field::REQUIRED,
            )
            .validate(&form);
        if let Err(rejected) = outcome {
            return Ok(Err(rejected));
        }

        let inquiry = contact_inquiry::ActiveModel {
            first_name: Set(form.first_name),
            last_name: Set(form.last_name),
            company_name: Set(form.company_name),
            email_address: Set(form.email_address),
            contact_no: Set(form.contact_no),
            requirement_details: Set(form.requirement_details),
            submitted_at: Set(OffsetDateTime::now_utc()),
            ..Default::default()
        }
        .insert(connection)
        .await?;

        log::info!(
            "contact inquiry {} from {} {} ({}, {})",
            inquiry.id,
            inquiry.first_name,
            inquiry.last_name,
            inquiry.company_name,
            inquiry.email_address
        );

        Ok(Ok(inquiry.id))
    }
}


use crate::{
    account::{
        model::{
            EmployeeSummary, LoginForm, LoginState, PasswordResetConfirmForm, PasswordResetForm,
            RegisterEmployeeForm, RegisterState, ResetState,
        },
        service::{AccountService, ResetOutcome, INVALID_LOGIN},
    },
    form::{FormErrors, FormState, NoData, NON_FIELD_ERRORS},
    validation::{field, Pipeline},
    Error,
};
use actix_web::{get, http::header, post, web, HttpResponse, Responder};
use venter_auth::{
    authenticator::{
        error::LOGIN_PATH,
        user::{UserDetails, UserInformation},
        Authenticator,
    },
    authorizer::Require,
    middleware::{removal_cookie, session_cookie},
    RegisterEmployee,
};
use venter_common::db::Database;
use venter_module_storage::service::fs::FileSystemBackend;

/// Where to continue after logging in.
pub const LOGIN_REDIRECT_PATH: &str = "/venter/upload_file/";

pub fn configure(
    config: &mut utoipa_actix_web::service_config::ServiceConfig,
    db: Database,
    storage: FileSystemBackend,
    authenticator: Authenticator,
) {
    let service = AccountService::new(storage);

    config
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(service))
        .app_data(web::Data::new(authenticator))
        .service(login_form)
        .service(login)
        .service(logout)
        .service(logout_post)
        .service(register_form)
        .service(register)
        .service(password_reset_form)
        .service(password_reset)
        .service(reset_confirm_form)
        .service(reset_confirm);
}

#[utoipa::path(
    tag = "account",
    operation_id = "getLoginForm",
    responses(
        (status = 200, description = "The login form", body = FormState<LoginState>),
    ),
)]
#[get("/login/")]
/// Show the login form
pub async fn login_form() -> impl Responder {
    HttpResponse::Ok().json(FormState::unbound(LoginState::default()))
}

#[utoipa::path(
    tag = "account",
    operation_id = "login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The login failed", body = FormState<LoginState>),
        (status = 303, description = "Logged in, the session cookie is set"),
    ),
)]
#[post("/login/")]
/// Log in
pub async fn login(
    service: web::Data<AccountService>,
    authenticator: web::Data<Authenticator>,
    db: web::Data<Database>,
    web::Form(form): web::Form<LoginForm>,
) -> Result<impl Responder, Error> {
    let state = LoginState {
        username: form.username.clone(),
    };

    let outcome = Pipeline::<LoginForm>::new()
        .check("username", |f| field::is_present(&f.username), field::REQUIRED)
        .check("password", |f| !f.password.is_empty(), field::REQUIRED)
        .validate(&form);
    if let Err(rejected) = outcome {
        return Ok(HttpResponse::Ok().json(FormState::rejected(rejected, state)));
    }

    let Some(user) = service
        .authenticate(&form.username, &form.password, db.as_ref())
        .await?
    else {
        let mut errors = FormErrors::default();
        errors.add(NON_FIELD_ERRORS, INVALID_LOGIN);
        return Ok(HttpResponse::Ok().json(FormState::rejected(errors, state)));
    };

    let token = authenticator.issue(&user)?;

    log::info!("{} logged in", user.username);

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_REDIRECT_PATH))
        .cookie(session_cookie(&authenticator, token))
        .finish())
}

/// End the sessions of the user, if any, and drop the session cookie.
async fn logged_out(
    user: UserInformation,
    service: &AccountService,
    db: &Database,
) -> Result<HttpResponse, Error> {
    if let Some(details) = user.details() {
        service.end_sessions(details.id, db).await?;
        log::info!("{} logged out", details.username);
    }

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .cookie(removal_cookie())
        .finish())
}

#[utoipa::path(
    tag = "account",
    operation_id = "logout",
    responses(
        (status = 303, description = "Logged out, the session cookie is removed"),
    ),
)]
#[get("/logout/")]
/// Log out, ending all sessions of the user
pub async fn logout(
    service: web::Data<AccountService>,
    db: web::Data<Database>,
    user: UserInformation,
) -> Result<impl Responder, Error> {
    logged_out(user, &service, &db).await
}

#[utoipa::path(
    tag = "account",
    operation_id = "logoutPost",
    responses(
        (status = 303, description = "Logged out, the session cookie is removed"),
    ),
)]
#[post("/logout/")]
/// Log out, ending all sessions of the user
pub async fn logout_post(
    service: web::Data<AccountService>,
    db: web::Data<Database>,
    user: UserInformation,
) -> Result<impl Responder, Error> {
    logged_out(user, &service, &db).await
}

#[utoipa::path(
    tag = "account",
    operation_id = "getRegisterEmployeeForm",
    responses(
        (status = 200, description = "The registration form", body = FormState<RegisterState>),
        (status = 303, description = "Not logged in"),
        (status = 401, description = "The requester is not an admin"),
    ),
)]
#[get("/register_employee/")]
/// Show the employee registration form
pub async fn register_form(_: Require<RegisterEmployee>) -> impl Responder {
    HttpResponse::Ok().json(FormState::unbound(RegisterState::default()))
}

#[utoipa::path(
    tag = "account",
    operation_id = "registerEmployee",
    request_body(content = RegisterEmployeeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The outcome of the registration", body = FormState<RegisterState>),
        (status = 303, description = "Not logged in"),
        (status = 401, description = "The requester is not an admin"),
    ),
)]
#[post("/register_employee/")]
/// Register an employee in the requester's organisation
pub async fn register(
    service: web::Data<AccountService>,
    db: web::Data<Database>,
    admin: UserDetails,
    _: Require<RegisterEmployee>,
    web::Form(form): web::Form<RegisterEmployeeForm>,
) -> Result<impl Responder, Error> {
    let email = form.email.clone();

    let state = match service.register_employee(&admin, form, db.as_ref()).await? {
        Ok(employee) => FormState::accepted(RegisterState {
            employee: Some(EmployeeSummary {
                user_id: employee.id,
                username: employee.username,
                email,
                organisation: employee.organisation,
            }),
        }),
        Err(rejected) => FormState::rejected(rejected, RegisterState::default()),
    };

    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    tag = "account",
    operation_id = "getPasswordResetForm",
    responses(
        (status = 200, description = "The password reset form", body = FormState<NoData>),
    ),
)]
#[get("/password_reset/")]
/// Show the password reset form
pub async fn password_reset_form() -> impl Responder {
    HttpResponse::Ok().json(FormState::unbound(NoData {}))
}

#[utoipa::path(
    tag = "account",
    operation_id = "requestPasswordReset",
    request_body(content = PasswordResetForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The outcome of the request", body = FormState<NoData>),
    ),
)]
#[post("/password_reset/")]
/// Request a password reset
///
/// Succeeds for any valid email address, whether a user has it or not.
pub async fn password_reset(
    service: web::Data<AccountService>,
    db: web::Data<Database>,
    web::Form(form): web::Form<PasswordResetForm>,
) -> Result<impl Responder, Error> {
    let outcome = service
        .request_password_reset(&form.email, db.as_ref())
        .await?
        .map(|_| NoData {});

    Ok(HttpResponse::Ok().json(FormState::submitted(outcome, NoData::default)))
}

#[utoipa::path(
    tag = "account",
    operation_id = "getPasswordResetConfirmForm",
    params(
        ("token", Path, description = "The reset token"),
    ),
    responses(
        (status = 200, description = "The password reset confirmation form", body = FormState<ResetState>),
    ),
)]
#[get("/reset/{token}/")]
/// Show the form for setting a new password
pub async fn reset_confirm_form(
    service: web::Data<AccountService>,
    db: web::Data<Database>,
    token: web::Path<String>,
) -> Result<impl Responder, Error> {
    let valid_link = service
        .fetch_valid_token(&token, db.as_ref())
        .await?
        .is_some();

    Ok(HttpResponse::Ok().json(FormState::unbound(ResetState { valid_link })))
}

#[utoipa::path(
    tag = "account",
    operation_id = "confirmPasswordReset",
    params(
        ("token", Path, description = "The reset token"),
    ),
    request_body(content = PasswordResetConfirmForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The outcome of the reset", body = FormState<ResetState>),
    ),
)]
#[post("/reset/{token}/")]
/// Set a new password
pub async fn reset_confirm(
    service: web::Data<AccountService>,
    db: web::Data<Database>,
    token: web::Path<String>,
    web::Form(form): web::Form<PasswordResetConfirmForm>,
) -> Result<impl Responder, Error> {
    let state = match service
        .reset_password(&token, &form.new_password, db.as_ref())
        .await?
    {
        ResetOutcome::Done => FormState::accepted(ResetState { valid_link: true }),
        ResetOutcome::Rejected(rejected) => {
            FormState::rejected(rejected, ResetState { valid_link: true })
        }
        ResetOutcome::InvalidLink => FormState {
            successful_submit: Some(false),
            errors: FormErrors::default(),
            data: ResetState { valid_link: false },
        },
    };

    Ok(HttpResponse::Ok().json(state))
}

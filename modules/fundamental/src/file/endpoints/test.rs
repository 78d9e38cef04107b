use crate::test::{
    caller, empty_upload_request, raw_upload_request, truncated_upload_body, upload_request,
};
use actix_http::StatusCode;
use crate::account::service::AccountService;
use actix_web::{cookie::Cookie, http::header, test::TestRequest};
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;
use venter_auth::authenticator::{user::UserDetails, SESSION_COOKIE};
use venter_entity::{file, role::Role, upload_format::UploadFormat, user};
use venter_test_context::{
    auth::TestAuthentication, call::CallService, VenterContext, TEST_PASSWORD,
};

struct Setup {
    admin: UserDetails,
    user1: UserDetails,
    user2: UserDetails,
}

async fn setup(ctx: &VenterContext) -> Result<Setup, anyhow::Error> {
    let icmc = ctx.create_organisation("ICMC", UploadFormat::Csv).await?;
    ctx.add_headers(icmc.id, &["name", "category", "details"])
        .await?;

    Ok(Setup {
        admin: ctx.create_user("admin.icmc", Role::Admin, Some(icmc.id)).await?,
        user1: ctx.create_user("user1.icmc", Role::Employee, Some(icmc.id)).await?,
        user2: ctx.create_user("user2.icmc", Role::Employee, Some(icmc.id)).await?,
    })
}

const GOOD_CSV: &[u8] = b"Name,Category,Details\nA,B,C\n";

async fn upload(
    app: &impl CallService,
    user: &UserDetails,
    file_name: &str,
    content: &[u8],
) -> Value {
    let request = upload_request("/venter/upload_file/", "input_file", file_name, content)
        .to_request()
        .test_auth_details(user.clone());
    app.call_and_read_body_json(request).await
}

async fn file_count(ctx: &VenterContext) -> Result<u64, anyhow::Error> {
    Ok(file::Entity::find().count(&ctx.db).await?)
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn upload_form(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let app = caller(ctx).await?;

    let request = TestRequest::get()
        .uri("/venter/upload_file/")
        .to_request()
        .test_auth_details(setup.user1);
    let response: Value = app.call_and_read_body_json(request).await;

    assert_eq!(
        response,
        json!({
            "successful_submit": null,
            "errors": {},
            "allowed_extension": "csv",
        })
    );

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn anonymous_is_redirected(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;

    for uri in ["/venter/upload_file/", "/venter/dashboard/", "/venter/delete_file/1/"] {
        let request = TestRequest::get().uri(uri).to_request();
        let response = app.call_service(request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(
            response.headers().get(header::LOCATION),
            Some(&header::HeaderValue::from_static("/venter/login/")),
        );
    }

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn upload_csv(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let app = caller(ctx).await?;

    let response = upload(&app, &setup.user1, "sample.csv", GOOD_CSV).await;
    assert_eq!(response["successful_submit"], json!(true));
    assert_eq!(response["file"]["file_name"], json!("sample.csv"));
    assert_eq!(response["file"]["uploaded_by"]["username"], json!("user1.icmc"));
    assert_eq!(file_count(ctx).await?, 1);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn upload_rejections(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let app = caller(ctx).await?;

    let response = upload(&app, &setup.user1, "sample.xlsx", b"PK\x03\x04").await;
    assert_eq!(response["successful_submit"], json!(false));
    assert_eq!(
        response["errors"]["input_file"],
        json!(["Please upload .csv extension files only"])
    );

    let response = upload(&app, &setup.user1, "sample_blank.csv", b",,\n").await;
    assert_eq!(
        response["errors"]["input_file"],
        json!(["Incorrect headers detected, please upload correct file"])
    );

    let response = upload(&app, &setup.user1, "wrong.csv", b"foo,bar,baz\n").await;
    assert_eq!(
        response["errors"]["input_file"],
        json!(["Incorrect headers detected, please upload correct file"])
    );

    let large = vec![b'x'; 5 * 1024 * 1024 + 1];
    let response = upload(&app, &setup.user1, "large.pdf", &large).await;
    assert_eq!(
        response["errors"]["input_file"],
        json!(["File size must not exceed 5 MB"])
    );

    let request = empty_upload_request("/venter/upload_file/")
        .to_request()
        .test_auth_details(setup.user1.clone());
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(
        response["errors"]["input_file"],
        json!(["This field is required."])
    );

    let response = upload(&app, &setup.user1, "", GOOD_CSV).await;
    assert_eq!(
        response["errors"]["input_file"],
        json!(["This field is required."])
    );

    assert_eq!(file_count(ctx).await?, 0);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn upload_without_parts(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let app = caller(ctx).await?;

    for request in [
        raw_upload_request("/venter/upload_file/", ""),
        empty_upload_request("/venter/upload_file/"),
    ] {
        let request = request.to_request().test_auth_details(setup.user1.clone());
        let response = app.call_service(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response: Value = actix_web::test::read_body_json(response).await;
        assert_eq!(response["successful_submit"], json!(false));
        assert_eq!(
            response["errors"]["input_file"],
            json!(["This field is required."])
        );
        assert_eq!(response["allowed_extension"], json!("csv"));
    }

    // a body broken within a part is still a bad request
    let request = raw_upload_request("/venter/upload_file/", truncated_upload_body())
        .to_request()
        .test_auth_details(setup.user1.clone());
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(file_count(ctx).await?, 0);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn upload_xlsx(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let civis = ctx.create_organisation("CIVIS", UploadFormat::Xlsx).await?;
    let user = ctx.create_user("user1.civis", Role::Employee, Some(civis.id)).await?;
    let app = caller(ctx).await?;

    let response = upload(&app, &user, "sample.csv", GOOD_CSV).await;
    assert_eq!(
        response["errors"]["input_file"],
        json!(["File extension 'csv' is not allowed. Allowed extensions are: 'xlsx'."])
    );

    let response = upload(&app, &user, "sample.xlsx", b"PK\x03\x04").await;
    assert_eq!(response["successful_submit"], json!(true));
    assert_eq!(response["allowed_extension"], json!("xlsx"));

    assert_eq!(file_count(ctx).await?, 1);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn dashboard(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let app = caller(ctx).await?;

    upload(&app, &setup.user1, "a.csv", GOOD_CSV).await;
    upload(&app, &setup.user1, "b.csv", GOOD_CSV).await;
    upload(&app, &setup.user2, "c.csv", GOOD_CSV).await;

    let list = |user: &UserDetails| {
        TestRequest::get()
            .uri("/venter/dashboard/")
            .to_request()
            .test_auth_details(user.clone())
    };

    let response: Value = app.call_and_read_body_json(list(&setup.user1)).await;
    let files = response["file_list"].as_array().expect("must be an array");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["file_name"], json!("b.csv"));

    let response: Value = app.call_and_read_body_json(list(&setup.user2)).await;
    assert_eq!(response["file_list"].as_array().map(Vec::len), Some(1));

    let response: Value = app.call_and_read_body_json(list(&setup.admin)).await;
    assert_eq!(response["file_list"].as_array().map(Vec::len), Some(3));

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn delete(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let other = ctx.create_organisation("CIVIS", UploadFormat::Xlsx).await?;
    let other_admin = ctx.create_user("admin.civis", Role::Admin, Some(other.id)).await?;
    let app = caller(ctx).await?;

    let response = upload(&app, &setup.user1, "a.csv", GOOD_CSV).await;
    let id = response["file"]["id"].as_i64().expect("must have an id");
    let uri = format!("/venter/delete_file/{id}/");

    // employees may not delete
    let request = TestRequest::get()
        .uri(&uri)
        .to_request()
        .test_auth_details(setup.user1.clone());
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(file_count(ctx).await?, 1);

    // admins of other organisations don't see it
    let request = TestRequest::get()
        .uri(&uri)
        .to_request()
        .test_auth_details(other_admin);
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(file_count(ctx).await?, 1);

    let request = TestRequest::get()
        .uri(&uri)
        .to_request()
        .test_auth_details(setup.admin.clone());
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION),
        Some(&header::HeaderValue::from_static("/venter/dashboard/")),
    );
    assert_eq!(file_count(ctx).await?, 0);

    let request = TestRequest::get()
        .uri(&uri)
        .to_request()
        .test_auth_details(setup.admin);
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

async fn login(app: &impl CallService, username: &str) -> Cookie<'static> {
    let request = TestRequest::post()
        .uri("/venter/login/")
        .set_form([("username", username), ("password", TEST_PASSWORD)])
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    response
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie must be set")
        .into_owned()
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn delete_with_session_of_deleted_admin(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let app = caller(ctx).await?;

    let response = upload(&app, &setup.user1, "a.csv", GOOD_CSV).await;
    let id = response["file"]["id"].as_i64().expect("must have an id");

    let cookie = login(&app, "admin.icmc").await;

    AccountService::new(ctx.storage.clone())
        .delete_user(setup.admin.id, &ctx.db)
        .await?;

    let request = TestRequest::get()
        .uri(&format!("/venter/delete_file/{id}/"))
        .cookie(cookie)
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION),
        Some(&header::HeaderValue::from_static("/venter/login/")),
    );
    assert_eq!(file_count(ctx).await?, 1);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn delete_with_session_of_demoted_admin(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let setup = setup(ctx).await?;
    let app = caller(ctx).await?;

    let response = upload(&app, &setup.user1, "a.csv", GOOD_CSV).await;
    let id = response["file"]["id"].as_i64().expect("must have an id");

    let cookie = login(&app, "admin.icmc").await;

    user::Entity::update_many()
        .col_expr(user::Column::Role, Expr::value(Role::Employee))
        .filter(user::Column::Id.eq(setup.admin.id))
        .exec(&ctx.db)
        .await?;

    let request = TestRequest::get()
        .uri(&format!("/venter/delete_file/{id}/"))
        .cookie(cookie)
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(file_count(ctx).await?, 1);

    Ok(())
}

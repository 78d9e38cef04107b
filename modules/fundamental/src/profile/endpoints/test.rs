use crate::test::caller;
use actix_http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::{json, Value};
use test_context::test_context;
use test_log::test;
use venter_entity::{role::Role, upload_format::UploadFormat};
use venter_test_context::{auth::TestAuthentication, call::CallService, VenterContext};

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn update_profile(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let civis = ctx.create_organisation("CIVIS", UploadFormat::Xlsx).await?;
    let user = ctx.create_user("user1.civis", Role::Employee, Some(civis.id)).await?;
    let app = caller(ctx).await?;
    let uri = format!("/venter/update_profile/{}/", user.id);

    let request = TestRequest::get()
        .uri(&uri)
        .to_request()
        .test_auth_details(user.clone());
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(response["successful_submit"], Value::Null);
    assert_eq!(response["profile"]["username"], json!("user1.civis"));
    assert_eq!(response["profile"]["organisation"]["name"], json!("CIVIS"));

    let post = |phone_number: Option<&str>| {
        let request = TestRequest::post().uri(&uri);
        let request = match phone_number {
            Some(phone_number) => request.set_form([("phone_number", phone_number)]),
            None => request.set_form(Vec::<(&str, &str)>::new()),
        };
        request.to_request().test_auth_details(user.clone())
    };

    let response: Value = app.call_and_read_body_json(post(None)).await;
    assert_eq!(response["successful_submit"], json!(true));

    let response: Value = app.call_and_read_body_json(post(Some("9870827126"))).await;
    assert_eq!(response["successful_submit"], json!(true));
    assert_eq!(response["profile"]["phone_number"], json!("9870827126"));

    let response: Value = app.call_and_read_body_json(post(Some("1234567890"))).await;
    assert_eq!(response["successful_submit"], json!(false));
    assert_eq!(
        response["errors"]["phone_number"],
        json!(["Please enter a valid phone number"])
    );
    // unchanged
    assert_eq!(response["profile"]["phone_number"], json!("9870827126"));

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn profile_access(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let civis = ctx.create_organisation("CIVIS", UploadFormat::Xlsx).await?;
    let admin = ctx.create_user("admin.civis", Role::Admin, Some(civis.id)).await?;
    let user1 = ctx.create_user("user1.civis", Role::Employee, Some(civis.id)).await?;
    let user2 = ctx.create_user("user2.civis", Role::Employee, Some(civis.id)).await?;
    let app = caller(ctx).await?;

    let uri = format!("/venter/update_profile/{}/", user1.id);

    let request = TestRequest::post()
        .uri(&uri)
        .set_form([("phone_number", "9870827126")])
        .to_request()
        .test_auth_details(user2);
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = TestRequest::post()
        .uri(&uri)
        .set_form([("phone_number", "9870827126")])
        .to_request()
        .test_auth_details(admin);
    let response: Value = app.call_and_read_body_json(request).await;
    assert_eq!(response["successful_submit"], json!(true));

    let request = TestRequest::get().uri(&uri).to_request();
    let response = app.call_service(request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    Ok(())
}

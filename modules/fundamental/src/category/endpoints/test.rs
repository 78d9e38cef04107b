use crate::test::caller;
use actix_http::StatusCode;
use actix_web::{http::header, test::TestRequest};
use serde_json::Value;
use test_context::test_context;
use test_log::test;
use venter_auth::authenticator::user::UserDetails;
use venter_entity::{role::Role, upload_format::UploadFormat};
use venter_test_context::{auth::TestAuthentication, call::CallService, VenterContext};

async fn setup(ctx: &VenterContext) -> Result<(UserDetails, UserDetails), anyhow::Error> {
    let icmc = ctx.create_organisation("ICMC", UploadFormat::Csv).await?;
    let civis = ctx.create_organisation("CIVIS", UploadFormat::Xlsx).await?;

    let mut names = (1..=13)
        .map(|i| format!("Ward issue {i}"))
        .collect::<Vec<_>>();
    names.extend(
        [
            "Cleaning of roads",
            "Garbage cleaning",
            "Drain Cleaning",
            "Cleaning of public toilets",
        ]
        .map(String::from),
    );
    let names = names.iter().map(String::as_str).collect::<Vec<_>>();
    ctx.add_categories(icmc.id, &names).await?;
    ctx.add_categories(civis.id, &["Cleaning of parks", "Water supply"])
        .await?;

    Ok((
        ctx.create_user("user1.icmc", Role::Employee, Some(icmc.id))
            .await?,
        ctx.create_user("admin.civis", Role::Admin, Some(civis.id))
            .await?,
    ))
}

fn list(uri: &str, user: &UserDetails) -> actix_http::Request {
    TestRequest::get()
        .uri(uri)
        .to_request()
        .test_auth_details(user.clone())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn first_page(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let (icmc, _) = setup(ctx).await?;
    let app = caller(ctx).await?;

    let response: Value = app
        .call_and_read_body_json(list("/venter/category_list/", &icmc))
        .await;

    assert_eq!(response["category_list"].as_array().map(Vec::len), Some(10));
    assert_eq!(response["paginator"]["number_of_items"], 17);
    assert_eq!(response["paginator"]["number_of_pages"], 2);
    assert_eq!(response["paginator"]["has_next"], true);
    assert_eq!(response["category_list"][0]["category"], "Ward issue 1");

    let response: Value = app
        .call_and_read_body_json(list("/venter/category_list/?page=2", &icmc))
        .await;
    assert_eq!(response["category_list"].as_array().map(Vec::len), Some(7));
    assert_eq!(response["paginator"]["has_next"], false);
    assert_eq!(response["paginator"]["has_previous"], true);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn search(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let (icmc, civis) = setup(ctx).await?;
    let app = caller(ctx).await?;

    let response: Value = app
        .call_and_read_body_json(list("/venter/category_list/?q=cleaning", &icmc))
        .await;
    assert_eq!(response["paginator"]["number_of_items"], 4);
    assert_eq!(response["category_list"].as_array().map(Vec::len), Some(4));

    let response: Value = app
        .call_and_read_body_json(list("/venter/category_list/?q=cleaning", &civis))
        .await;
    assert_eq!(response["paginator"]["number_of_items"], 1);
    assert_eq!(response["category_list"][0]["category"], "Cleaning of parks");

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn page_out_of_range(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let (icmc, _) = setup(ctx).await?;
    let app = caller(ctx).await?;

    let response = app
        .call_service(list("/venter/category_list/?page=3", &icmc))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn without_organisation(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    setup(ctx).await?;
    let loner = ctx.create_user("loner", Role::Employee, None).await?;
    let app = caller(ctx).await?;

    let response: Value = app
        .call_and_read_body_json(list("/venter/category_list/", &loner))
        .await;
    assert_eq!(response["category_list"].as_array().map(Vec::len), Some(0));
    assert_eq!(response["paginator"]["number_of_items"], 0);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn anonymous(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;

    let request = TestRequest::get().uri("/venter/category_list/").to_request();
    let response = app.call_service(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/venter/login/")
    );

    Ok(())
}

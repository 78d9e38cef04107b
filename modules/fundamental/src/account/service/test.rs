use super::*;
use crate::validation::upload::Candidate;
use bytes::Bytes;
use test_context::test_context;
use test_log::test;
use venter_entity::{file, upload_format::UploadFormat};
use venter_module_storage::service::{StorageBackend, StorageKey};
use venter_test_context::{VenterContext, TEST_PASSWORD};

fn form(username: &str, password: &str, email: &str) -> RegisterEmployeeForm {
    RegisterEmployeeForm {
        username: username.into(),
        password: password.into(),
        email: email.into(),
        ..Default::default()
    }
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn authenticate(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let org = ctx.create_organisation("CIVIS", UploadFormat::Xlsx).await?;
    let created = ctx.create_user("admin.civis", Role::Admin, Some(org.id)).await?;
    let service = AccountService::new(ctx.storage.clone());

    let user = service
        .authenticate("admin.civis", TEST_PASSWORD, &ctx.db)
        .await?;
    assert_eq!(user, Some(created.clone()));

    let stored = user::Entity::find_by_id(created.id)
        .one(&ctx.db)
        .await?
        .expect("user must exist");
    assert!(stored.last_login.is_some());

    assert_eq!(
        service.authenticate("admin.civis", "wrong", &ctx.db).await?,
        None
    );
    assert_eq!(
        service.authenticate("Admin.Civis", TEST_PASSWORD, &ctx.db).await?,
        None
    );
    assert_eq!(
        service.authenticate("nobody", TEST_PASSWORD, &ctx.db).await?,
        None
    );

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn register_employee(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let org = ctx.create_organisation("CIVIS", UploadFormat::Xlsx).await?;
    let admin = ctx.create_user("admin.civis", Role::Admin, Some(org.id)).await?;
    let service = AccountService::new(ctx.storage.clone());

    let cases = [
        (form("", "", ""), Rejected::new("username", field::REQUIRED)),
        (
            form("user civis", "useruser", "user@civis.com"),
            Rejected::new("username", field::INVALID_USERNAME),
        ),
        (
            form("admin.civis", "useruser", "user@civis.com"),
            Rejected::new("username", field::DUPLICATE_USERNAME),
        ),
        (
            form("user.civis", "useruser", "user@civis"),
            Rejected::new("email", field::INVALID_EMAIL),
        ),
        (
            form("user.civis", "1234", "user@civis.com"),
            Rejected::new("password", "This password is too common."),
        ),
        (
            form("user.civis", "user.civis", "user@civis.com"),
            Rejected::new("password", "The password is too similar to the username."),
        ),
        (
            form("user.civis", "98798798", "user@civis.com"),
            Rejected::new("password", "This password is entirely numeric."),
        ),
    ];

    for (form, expected) in cases {
        let result = service.register_employee(&admin, form, &ctx.db).await?;
        assert_eq!(result, Err(expected));
    }

    let employee = service
        .register_employee(&admin, form("user.civis", "useruser", "user@civis.com"), &ctx.db)
        .await??;
    assert_eq!(employee.role, Role::Employee);
    assert_eq!(employee.organisation, Some(org.id));
    assert!(employee.profile.is_some());

    let user = service
        .authenticate("user.civis", "useruser", &ctx.db)
        .await?;
    assert_eq!(user, Some(employee));

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn password_reset(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let org = ctx.create_organisation("ICMC", UploadFormat::Csv).await?;
    ctx.create_user("user1.icmc", Role::Employee, Some(org.id)).await?;
    let service = AccountService::new(ctx.storage.clone());

    assert_eq!(
        service.request_password_reset("user@company", &ctx.db).await?,
        Err(Rejected::new("email", field::INVALID_EMAIL))
    );
    assert_eq!(
        service
            .request_password_reset("nobody@example.com", &ctx.db)
            .await?,
        Ok(0)
    );
    assert_eq!(
        service
            .request_password_reset("User1.ICMC@example.com", &ctx.db)
            .await?,
        Ok(1)
    );

    let token = password_reset::Entity::find()
        .one(&ctx.db)
        .await?
        .expect("token must be issued")
        .token;

    assert!(service.fetch_valid_token(&token, &ctx.db).await?.is_some());

    assert_eq!(
        service.reset_password(&token, "1234", &ctx.db).await?,
        ResetOutcome::Rejected(Rejected::new("new_password", "This password is too common."))
    );
    assert_eq!(
        service
            .reset_password(&token, "a better secret", &ctx.db)
            .await?,
        ResetOutcome::Done
    );
    // single use
    assert_eq!(
        service
            .reset_password(&token, "another secret", &ctx.db)
            .await?,
        ResetOutcome::InvalidLink
    );
    assert_eq!(
        service.reset_password("unknown", "another secret", &ctx.db).await?,
        ResetOutcome::InvalidLink
    );

    // sessions from before the reset are over
    let user = service
        .authenticate("user1.icmc", "a better secret", &ctx.db)
        .await?
        .expect("must authenticate with the new password");
    assert_eq!(user.session, 1);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn reset_of_inactive_user(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let user = ctx.create_user("user1.icmc", Role::Employee, None).await?;
    let service = AccountService::new(ctx.storage.clone());

    assert_eq!(
        service
            .request_password_reset("user1.icmc@example.com", &ctx.db)
            .await?,
        Ok(1)
    );
    let token = password_reset::Entity::find()
        .one(&ctx.db)
        .await?
        .expect("token must be issued")
        .token;

    let stored = user::Entity::find_by_id(user.id)
        .one(&ctx.db)
        .await?
        .expect("user must exist");
    let hash = stored.password.clone();
    let mut inactive = stored.into_active_model();
    inactive.is_active = Set(false);
    inactive.update(&ctx.db).await?;

    assert_eq!(
        service
            .reset_password(&token, "a better secret", &ctx.db)
            .await?,
        ResetOutcome::InvalidLink
    );

    let stored = user::Entity::find_by_id(user.id)
        .one(&ctx.db)
        .await?
        .expect("user must exist");
    assert_eq!(stored.password, hash);
    assert_eq!(stored.session_version, 0);
    assert!(service.fetch_valid_token(&token, &ctx.db).await?.is_some());

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn end_sessions(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let user = ctx.create_user("user1.icmc", Role::Employee, None).await?;
    let other = ctx.create_user("user2.icmc", Role::Employee, None).await?;
    let service = AccountService::new(ctx.storage.clone());
    assert_eq!(user.session, 0);

    service.end_sessions(user.id, &ctx.db).await?;
    service.end_sessions(user.id, &ctx.db).await?;

    let current = service
        .authenticate("user1.icmc", TEST_PASSWORD, &ctx.db)
        .await?
        .expect("must authenticate");
    assert_eq!(current.session, 2);

    let untouched = service
        .authenticate("user2.icmc", TEST_PASSWORD, &ctx.db)
        .await?
        .expect("must authenticate");
    assert_eq!(untouched.session, other.session);

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn expired_token(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let user = ctx.create_user("user1.icmc", Role::Employee, None).await?;
    let service = AccountService::new(ctx.storage.clone());

    let issued = OffsetDateTime::now_utc() - RESET_TOKEN_TTL - Duration::from_secs(1);
    password_reset::ActiveModel {
        token: Set("expired".into()),
        user_id: Set(user.id),
        created_at: Set(issued),
        expires_at: Set(issued + RESET_TOKEN_TTL),
        used: Set(false),
    }
    .insert(&ctx.db)
    .await?;

    assert_eq!(
        service
            .reset_password("expired", "a better secret", &ctx.db)
            .await?,
        ResetOutcome::InvalidLink
    );

    Ok(())
}

#[test_context(VenterContext)]
#[test(actix_web::test)]
async fn delete_user(ctx: &VenterContext) -> Result<(), anyhow::Error> {
    let org = ctx.create_organisation("ICMC", UploadFormat::Csv).await?;
    let user = ctx.create_user("user1.icmc", Role::Admin, Some(org.id)).await?;
    let other = ctx.create_user("user2.icmc", Role::Employee, Some(org.id)).await?;

    let mut owned = org.clone().into_active_model();
    owned.user_id = Set(Some(user.id));
    owned.update(&ctx.db).await?;

    let files = FileService::new(ctx.storage.clone());
    let upload = |name: &str, content: &'static [u8]| Candidate {
        file_name: name.into(),
        size: content.len() as u64,
        content: Bytes::from_static(content),
    };
    files
        .upload(&user, Some(upload("a.csv", b"own\n")), &ctx.db)
        .await??;
    files
        .upload(&user, Some(upload("b.csv", b"shared\n")), &ctx.db)
        .await??;
    files
        .upload(&other, Some(upload("c.csv", b"shared\n")), &ctx.db)
        .await??;

    let own_key: StorageKey = file::Entity::find()
        .filter(file::Column::FileName.eq("a.csv"))
        .one(&ctx.db)
        .await?
        .expect("file must exist")
        .input_file
        .parse()?;
    let shared_key: StorageKey = file::Entity::find()
        .filter(file::Column::FileName.eq("c.csv"))
        .one(&ctx.db)
        .await?
        .expect("file must exist")
        .input_file
        .parse()?;

    let service = AccountService::new(ctx.storage.clone());
    service.request_password_reset("user1.icmc@example.com", &ctx.db).await??;

    assert!(service.delete_user(user.id, &ctx.db).await?);
    assert!(!service.delete_user(user.id, &ctx.db).await?);

    assert_eq!(file::Entity::find().count(&ctx.db).await?, 1);
    assert_eq!(profile::Entity::find().count(&ctx.db).await?, 1);
    assert_eq!(password_reset::Entity::find().count(&ctx.db).await?, 0);

    let org = organisation::Entity::find_by_id(org.id)
        .one(&ctx.db)
        .await?
        .expect("organisation must survive");
    assert_eq!(org.user_id, None);

    assert!(ctx.storage.retrieve_buf(&own_key).await?.is_none());
    assert!(ctx.storage.retrieve_buf(&shared_key).await?.is_some());

    Ok(())
}

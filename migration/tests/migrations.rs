use sea_orm::{ConnectOptions, Database};
use test_log::test;
use venter_migration::{Migrator, MigratorTrait};

#[test(tokio::test)]
async fn up_and_down() -> Result<(), sea_orm::DbErr> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);
    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;
    assert!(Migrator::get_pending_migrations(&db).await?.is_empty());

    Migrator::down(&db, None).await?;
    assert_eq!(Migrator::get_pending_migrations(&db).await?.len(), 8);

    Ok(())
}

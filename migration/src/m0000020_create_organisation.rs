use crate::m0000010_create_user::User;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organisation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organisation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organisation::Name).text().not_null())
                    .col(ColumnDef::new(Organisation::ProfilePicture).string())
                    .col(
                        ColumnDef::new(Organisation::PhoneNumber)
                            .string_len(10)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Organisation::UserId).integer())
                    .col(
                        ColumnDef::new(Organisation::UploadFormat)
                            .string()
                            .not_null()
                            .default("csv"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(Organisation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Organisation::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum Organisation {
    Table,
    Id,
    Name,
    ProfilePicture,
    PhoneNumber,
    UserId,
    UploadFormat,
}

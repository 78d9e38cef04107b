use crate::m0000020_create_organisation::Organisation;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Header::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Header::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Header::Header)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Header::OrganisationId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(Header::OrganisationId)
                            .to(Organisation::Table, Organisation::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Header::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Header {
    Table,
    Id,
    Header,
    OrganisationId,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactInquiry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactInquiry::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContactInquiry::FirstName).string().not_null())
                    .col(ColumnDef::new(ContactInquiry::LastName).string().not_null())
                    .col(
                        ColumnDef::new(ContactInquiry::CompanyName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContactInquiry::EmailAddress)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContactInquiry::ContactNo)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContactInquiry::RequirementDetails)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContactInquiry::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ContactInquiry::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum ContactInquiry {
    Table,
    Id,
    FirstName,
    LastName,
    CompanyName,
    EmailAddress,
    ContactNo,
    RequirementDetails,
    SubmittedAt,
}

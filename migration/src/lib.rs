pub use sea_orm_migration::prelude::*;

mod m0000010_create_user;
mod m0000020_create_organisation;
mod m0000030_create_profile;
mod m0000040_create_file;
mod m0000050_create_category;
mod m0000060_create_header;
mod m0000070_create_contact_inquiry;
mod m0000080_create_password_reset;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_user::Migration),
            Box::new(m0000020_create_organisation::Migration),
            Box::new(m0000030_create_profile::Migration),
            Box::new(m0000040_create_file::Migration),
            Box::new(m0000050_create_category::Migration),
            Box::new(m0000060_create_header::Migration),
            Box::new(m0000070_create_contact_inquiry::Migration),
            Box::new(m0000080_create_password_reset::Migration),
        ]
    }
}

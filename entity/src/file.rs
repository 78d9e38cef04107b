use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "file")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The profile of the uploader
    pub uploaded_by: i32,
    /// The key of the content in the storage
    pub input_file: String,
    /// The file name as provided by the uploader
    pub file_name: String,
    pub size: i64,
    pub uploaded_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity"
        from = "Column::UploadedBy"
        to = "super::profile::Column::Id")]
    Uploader,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::{sea_query::StringLen, DeriveActiveEnum, EnumIter};

#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// A plain organisation member
    #[default]
    #[sea_orm(string_value = "employee")]
    Employee,
    /// Staff of an organisation, allowed to see and manage all of its files
    #[sea_orm(string_value = "admin")]
    Admin,
}

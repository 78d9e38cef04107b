use sea_orm::{sea_query::StringLen, DeriveActiveEnum, EnumIter};

/// The kind of files an organisation uploads.
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
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
pub enum UploadFormat {
    #[sea_orm(string_value = "xlsx")]
    Xlsx,
    #[sea_orm(string_value = "csv")]
    Csv,
}

impl UploadFormat {
    /// The single file extension accepted for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use venter_entity::{organisation, upload_format::UploadFormat};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrganisationSummary {
    pub id: i32,
    pub name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// The kind of files the organisation uploads
    pub upload_format: UploadFormat,
}

impl From<organisation::Model> for OrganisationSummary {
    fn from(value: organisation::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            phone_number: value.phone_number,
            profile_picture: value.profile_picture,
            upload_format: value.upload_format,
        }
    }
}

/// Information required to onboard an organisation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrganisation {
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// The id of the owning user
    #[serde(default)]
    pub owner: Option<i32>,
    pub upload_format: UploadFormat,
}

use crate::organisation::model::OrganisationSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use venter_entity::role::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileDetails {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub organisation: Option<OrganisationSummary>,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// The context of the profile form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileState {
    pub profile: ProfileDetails,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileForm {
    /// A ten digit mobile number, may be blank
    #[serde(default)]
    pub phone_number: String,
}

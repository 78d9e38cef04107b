use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use venter_entity::file;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileSummary {
    pub id: i32,
    /// The file name, as provided by the uploader
    pub file_name: String,
    /// The size in bytes
    pub size: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    pub uploaded_by: Uploader,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Uploader {
    /// The id of the uploader's profile
    pub profile: i32,
    pub username: String,
}

impl FileSummary {
    pub fn new(file: file::Model, username: String) -> Self {
        Self {
            id: file.id,
            uploaded_by: Uploader {
                profile: file.uploaded_by,
                username,
            },
            file_name: file.file_name,
            size: file.size,
            uploaded_at: file.uploaded_at,
        }
    }
}

/// The files visible to the requester, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileList {
    pub file_list: Vec<FileSummary>,
}

/// The context of the upload form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadState {
    /// The extension the requester's organisation accepts
    pub allowed_extension: Option<String>,
    /// The file created by a successful upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileSummary>,
}

use std::path::PathBuf;

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Storage")]
#[group(id = "storage")]
pub struct StorageConfig {
    /// Base directory of the uploaded file storage
    #[arg(
        id = "storage-fs-path",
        long,
        env = "VENTER_STORAGE_FS_PATH",
        default_value = "./.venter/storage"
    )]
    pub fs_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            fs_path: "./.venter/storage".into(),
        }
    }
}

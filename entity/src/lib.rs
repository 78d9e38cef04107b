pub mod category;
pub mod contact_inquiry;
pub mod file;
pub mod header;
pub mod organisation;
pub mod password_reset;
pub mod profile;
pub mod role;
pub mod upload_format;
pub mod user;

pub mod account;
pub mod category;
pub mod contact;
pub mod endpoints;
pub mod error;
pub mod file;
pub mod form;
pub mod header;
pub mod organisation;
pub mod profile;
pub mod validation;

pub use endpoints::configure;
pub use error::Error;

#[cfg(test)]
pub mod test;

use utoipa::openapi::{Info, InfoBuilder};

/// The information block of the served API document.
pub fn info() -> Info {
    InfoBuilder::new()
        .title("Venter")
        .description(Some(
            "Upload, categorise and review complaint sheets of an organisation",
        ))
        .version(env!("CARGO_PKG_VERSION"))
        .build()
}

use crate::validation::{field::REQUIRED, Pipeline, Rejected};
use bytes::Bytes;
use std::borrow::Cow;
use std::collections::HashSet;
use venter_entity::upload_format::UploadFormat;

/// The maximum size of an uploaded file, 5 MiB.
pub const MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;

pub const FIELD: &str = "input_file";
pub const TOO_LARGE: &str = "File size must not exceed 5 MB";
pub const CSV_ONLY: &str = "Please upload .csv extension files only";
pub const INCORRECT_HEADERS: &str = "Incorrect headers detected, please upload correct file";

/// A file received for upload.
#[derive(Clone, Debug, Default)]
pub struct Candidate {
    /// The file name as provided by the client
    pub file_name: String,
    /// The full size of the upload
    pub size: u64,
    /// The content, cut off after [`MAX_UPLOAD_SIZE`]
    pub content: Bytes,
}

/// The expectations an organisation has for its uploads.
#[derive(Clone, Debug)]
pub struct UploadRules {
    pub format: UploadFormat,
    /// The expected header row of CSV files
    pub headers: Vec<String>,
}

/// The lower-cased extension of a file name, empty if there is none.
///
/// Names starting with a dot, or ending with one, don't have an extension.
pub fn extension(file_name: &str) -> String {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    match name.rfind('.') {
        Some(i) if i > 0 && i < name.len() - 1 => name[i + 1..].to_lowercase(),
        _ => String::new(),
    }
}

pub fn check_size(size: u64) -> Result<(), Cow<'static, str>> {
    if size > MAX_UPLOAD_SIZE {
        Err(TOO_LARGE.into())
    } else {
        Ok(())
    }
}

pub fn check_extension(format: UploadFormat, file_name: &str) -> Result<(), Cow<'static, str>> {
    let ext = extension(file_name);
    if ext == format.extension() {
        return Ok(());
    }

    Err(match format {
        UploadFormat::Csv => CSV_ONLY.into(),
        UploadFormat::Xlsx => format!(
            "File extension '{ext}' is not allowed. Allowed extensions are: '{}'.",
            format.extension()
        )
        .into(),
    })
}

/// Check the first record of a CSV file against the expected header names.
///
/// Names are compared trimmed and case-insensitive. Without expected headers, any non-blank
/// header row is accepted.
pub fn check_headers(content: &[u8], expected: &[String]) -> Result<(), Cow<'static, str>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut record = csv::ByteRecord::new();
    let found = match reader.read_byte_record(&mut record) {
        Ok(true) => record
            .iter()
            .map(|name| normalize(&String::from_utf8_lossy(name)))
            .filter(|name| !name.is_empty())
            .collect::<HashSet<_>>(),
        Ok(false) => HashSet::new(),
        Err(err) => {
            log::debug!("unable to read header row: {err}");
            return Err(INCORRECT_HEADERS.into());
        }
    };

    if found.is_empty() {
        return Err(INCORRECT_HEADERS.into());
    }

    if expected.is_empty() {
        return Ok(());
    }

    let expected = expected
        .iter()
        .map(|name| normalize(name))
        .collect::<HashSet<_>>();

    if found == expected {
        Ok(())
    } else {
        log::debug!("headers mismatch, expected: {expected:?}, found: {found:?}");
        Err(INCORRECT_HEADERS.into())
    }
}

fn normalize(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Validate an upload: presence, size, extension and, for CSV, the header row.
pub fn validate_upload(candidate: Option<&Candidate>, rules: &UploadRules) -> Result<(), Rejected> {
    let Some(candidate) = candidate else {
        return Err(Rejected::new(FIELD, REQUIRED));
    };

    let mut pipeline = Pipeline::<Candidate>::new()
        .rule(FIELD, |c: &Candidate| check_size(c.size))
        .rule(FIELD, |c: &Candidate| check_extension(rules.format, &c.file_name));

    if rules.format == UploadFormat::Csv {
        pipeline = pipeline.rule(FIELD, |c: &Candidate| check_headers(&c.content, &rules.headers));
    }

    pipeline.validate(candidate)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn csv_rules(headers: &[&str]) -> UploadRules {
        UploadRules {
            format: UploadFormat::Csv,
            headers: headers.iter().map(|h| h.to_string()).collect(),
        }
    }

    fn candidate(file_name: &str, content: &'static [u8]) -> Candidate {
        Candidate {
            file_name: file_name.into(),
            size: content.len() as u64,
            content: Bytes::from_static(content),
        }
    }

    #[test_log::test(rstest)]
    #[case("sample.csv", "csv")]
    #[case("Sample.XLSX", "xlsx")]
    #[case("archive.tar.gz", "gz")]
    #[case("dir/sub.d/file", "")]
    #[case("noext", "")]
    #[case(".bashrc", "")]
    #[case("trailing.", "")]
    fn extensions(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(extension(name), expected);
    }

    #[test_log::test(rstest)]
    #[case(UploadFormat::Xlsx, "data.xlsx", None)]
    #[case(
        UploadFormat::Xlsx,
        "data.csv",
        Some("File extension 'csv' is not allowed. Allowed extensions are: 'xlsx'.")
    )]
    #[case(
        UploadFormat::Xlsx,
        "data",
        Some("File extension '' is not allowed. Allowed extensions are: 'xlsx'.")
    )]
    #[case(UploadFormat::Csv, "data.CSV", None)]
    #[case(UploadFormat::Csv, "data.xlsx", Some(CSV_ONLY))]
    fn extension_per_format(
        #[case] format: UploadFormat,
        #[case] name: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            check_extension(format, name).err().as_deref(),
            expected
        );
    }

    #[test_log::test(rstest)]
    #[case(b"Name, Category ,Details\nfoo,bar,baz\n", true)]
    #[case(b"\xef\xbb\xbfdetails,name,category\n", true)]
    #[case(b"name,category\n", false)]
    #[case(b"name,category,details,extra\n", false)]
    #[case(b"", false)]
    #[case(b",,\n,,\n", false)]
    fn headers(#[case] content: &[u8], #[case] accepted: bool) {
        let expected = ["name", "category", "details"].map(String::from);
        assert_eq!(check_headers(content, &expected).is_ok(), accepted);
    }

    #[test]
    fn any_headers_without_configuration() {
        assert!(check_headers(b"a,b\n", &[]).is_ok());
        assert!(check_headers(b"\n", &[]).is_err());
    }

    #[test]
    fn size_is_checked_first() {
        let candidate = Candidate {
            file_name: "large.pdf".into(),
            size: MAX_UPLOAD_SIZE + 1,
            content: Bytes::new(),
        };
        assert_eq!(
            validate_upload(Some(&candidate), &csv_rules(&[])),
            Err(Rejected::new(FIELD, TOO_LARGE))
        );
    }

    #[test]
    fn missing_file() {
        assert_eq!(
            validate_upload(None, &csv_rules(&[])),
            Err(Rejected::new(FIELD, REQUIRED))
        );
    }

    #[test]
    fn xlsx_content_is_not_inspected() {
        let rules = UploadRules {
            format: UploadFormat::Xlsx,
            headers: vec!["name".into()],
        };
        assert_eq!(
            validate_upload(Some(&candidate("data.xlsx", b"PK\x03\x04")), &rules),
            Ok(())
        );
    }

    #[test]
    fn csv_with_headers() {
        let rules = csv_rules(&["name", "category"]);
        assert_eq!(
            validate_upload(Some(&candidate("data.csv", b"category,name\n")), &rules),
            Ok(())
        );
        assert_eq!(
            validate_upload(Some(&candidate("data.csv", b"\n\n")), &rules),
            Err(Rejected::new(FIELD, INCORRECT_HEADERS))
        );
    }
}

use regex::Regex;
use std::sync::OnceLock;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_PHONE_NUMBER: &str = "Please enter a valid phone number";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

pub const USERNAME_MAX_LENGTH: usize = 150;
const EMAIL_MAX_LENGTH: usize = 320;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    #[allow(clippy::unwrap_used)]
    cell.get_or_init(|| Regex::new(pattern).unwrap())
}

/// A required text field must contain more than whitespace.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// A ten digit mobile number, starting with 6 to 9.
pub fn is_valid_phone_number(value: &str) -> bool {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    regex(&PHONE, r"^[6-9][0-9]{9}$").is_match(value)
}

/// Check the syntax of an email address.
///
/// The local part must be a dot separated list of atoms, the domain a list of labels ending
/// with a top level label of at least two characters.
pub fn is_valid_email(value: &str) -> bool {
    static USER: OnceLock<Regex> = OnceLock::new();
    static DOMAIN: OnceLock<Regex> = OnceLock::new();

    if value.len() > EMAIL_MAX_LENGTH {
        return false;
    }

    let Some((user, domain)) = value.rsplit_once('@') else {
        return false;
    };

    let user_ok = regex(
        &USER,
        r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*$",
    )
    .is_match(user);
    if !user_ok {
        return false;
    }

    if domain.eq_ignore_ascii_case("localhost") {
        return true;
    }

    regex(
        &DOMAIN,
        r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z0-9-]{2,63}$",
    )
    .is_match(domain)
        && !domain.ends_with('-')
}

/// Check a username for its length and the allowed characters.
pub fn check_username(value: &str) -> Result<(), String> {
    static USERNAME: OnceLock<Regex> = OnceLock::new();

    let length = value.chars().count();
    if length > USERNAME_MAX_LENGTH {
        return Err(format!(
            "Ensure this value has at most {USERNAME_MAX_LENGTH} characters (it has {length})."
        ));
    }

    if regex(&USERNAME, r"^[\w.@+-]+$").is_match(value) {
        Ok(())
    } else {
        Err(INVALID_USERNAME.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test_log::test(rstest)]
    #[case("9870827126", true)]
    #[case("6000000000", true)]
    #[case("1234567890", false)]
    #[case("987082712", false)]
    #[case("98708271260", false)]
    #[case("98708a7126", false)]
    #[case("", false)]
    fn phone_numbers(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_phone_number(input), expected);
    }

    #[test_log::test(rstest)]
    #[case("user@civis.com", true)]
    #[case("first.last+tag@mail.example.org", true)]
    #[case("root@localhost", true)]
    #[case("user@company", false)]
    #[case("user@civis", false)]
    #[case("user@@civis.com", false)]
    #[case("user.@civis.com", false)]
    #[case("user@civis.c", false)]
    #[case("user@civis.com-", false)]
    #[case("user civis@civis.com", false)]
    #[case("civis.com", false)]
    #[case("", false)]
    fn emails(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(input), expected);
    }

    #[test_log::test(rstest)]
    #[case("user.civis", true)]
    #[case("user+1@civis", true)]
    #[case("user_civis-2", true)]
    #[case("user civis", false)]
    #[case("user/civis", false)]
    fn usernames(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(check_username(input).is_ok(), expected);
    }

    #[test]
    fn username_too_long() {
        let name = "a".repeat(151);
        assert_eq!(
            check_username(&name),
            Err("Ensure this value has at most 150 characters (it has 151).".to_string())
        );
    }

    #[test]
    fn presence() {
        assert!(is_present("a"));
        assert!(!is_present("  \t"));
    }
}

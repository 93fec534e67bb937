//! Field-level predicates run on every change.
//!
//! Required-ness is not checked here: an empty phone or email is valid and
//! the wizard's step gate rejects it separately.

use std::collections::BTreeMap;

use crate::core::form::Field;

pub const NAME_MAX_CHARS: usize = 25;
pub const ZONE_MAX_CHARS: usize = 15;
pub const PHONE_MAX_DIGITS: usize = 11;

pub const INVALID_EMAIL: &str = "Invalid email format";

/// How a field's value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Zone,
    Phone,
    Email,
    Text,
    Choice,
}

pub fn validate(kind: FieldKind, value: &str) -> Option<String> {
    match kind {
        FieldKind::Name if value.chars().count() > NAME_MAX_CHARS => Some(format!(
            "Must be {} characters or fewer",
            NAME_MAX_CHARS
        )),
        FieldKind::Zone if value.chars().count() > ZONE_MAX_CHARS => Some(format!(
            "Must be {} characters or fewer",
            ZONE_MAX_CHARS
        )),
        FieldKind::Phone if !is_valid_phone(value) => Some(format!(
            "Phone number may contain up to {} digits only",
            PHONE_MAX_DIGITS
        )),
        FieldKind::Email if !value.is_empty() && !is_valid_email(value) => {
            Some(INVALID_EMAIL.to_string())
        }
        _ => None,
    }
}

pub fn is_valid_phone(value: &str) -> bool {
    value.len() <= PHONE_MAX_DIGITS && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain
/// with text on both sides.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

/// Current validation message per field; absent keys are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    /// Re-validates one field, replacing whatever was recorded for it.
    pub fn revalidate(&mut self, field: Field, value: &str) {
        match validate(field.kind(), value) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_up_to_eleven_digits() {
        for ok in ["", "1", "12345678901"] {
            assert!(validate(FieldKind::Phone, ok).is_none(), "{ok}");
        }
        for bad in ["123456789012", "12a", "+385", "091 123"] {
            assert!(validate(FieldKind::Phone, bad).is_some(), "{bad}");
        }
    }

    #[test]
    fn email_shape() {
        assert!(validate(FieldKind::Email, "a@b.co").is_none());
        assert!(validate(FieldKind::Email, "").is_none());
        for bad in ["a@b", "a.com", "a b@c.com", "@b.co", "a@.co", "a@b.", "a@@b.co"] {
            assert_eq!(
                validate(FieldKind::Email, bad).as_deref(),
                Some(INVALID_EMAIL),
                "{bad}"
            );
        }
    }

    #[test]
    fn length_limits_count_characters() {
        assert!(validate(FieldKind::Name, &"ž".repeat(25)).is_none());
        assert!(validate(FieldKind::Name, &"a".repeat(26)).is_some());
        assert!(validate(FieldKind::Zone, &"a".repeat(15)).is_none());
        assert!(validate(FieldKind::Zone, &"a".repeat(16)).is_some());
        assert!(validate(FieldKind::Text, &"a".repeat(500)).is_none());
    }

    #[test]
    fn revalidate_replaces_previous_message() {
        let mut errors = FieldErrors::default();
        errors.revalidate(Field::Email, "foo");
        assert_eq!(errors.get(Field::Email), Some(INVALID_EMAIL));
        errors.revalidate(Field::Email, "foo@bar.com");
        assert!(errors.get(Field::Email).is_none());
        assert!(errors.is_empty());
    }
}

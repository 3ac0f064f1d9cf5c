//! Required/format checks over the tenant form.

use std::sync::OnceLock;

use regex::Regex;

use crate::fields::{FieldKey, FormData, FormErrors, FORM_FIELDS};
use crate::locale::Dictionary;

static WHATSAPP_NUMBER: OnceLock<Regex> = OnceLock::new();

fn whatsapp_number_pattern() -> &'static Regex {
    // Optional leading '+', then at least ten ASCII digits.
    WHATSAPP_NUMBER
        .get_or_init(|| Regex::new(r"^\+?[0-9]{10,}$").expect("whatsapp number pattern is valid"))
}

/// Validate with the default (English) messages.
pub fn validate(form: &FormData) -> FormErrors {
    validate_with(form, &Dictionary::english())
}

/// Check every field independently and return a fresh error map.
///
/// The declared-field pass runs last, so its generic message wins for any
/// key that also has a dedicated rule.
pub fn validate_with(form: &FormData, text: &Dictionary) -> FormErrors {
    let mut errors = FormErrors::new();

    if form.is_blank(FieldKey::Name) {
        errors.insert(FieldKey::Name, text.name_required);
    }

    if form.is_blank(FieldKey::WhatsappNumber) {
        errors.insert(FieldKey::WhatsappNumber, text.whatsapp_required);
    } else if !is_valid_whatsapp_number(form.get(FieldKey::WhatsappNumber)) {
        errors.insert(FieldKey::WhatsappNumber, text.invalid_whatsapp);
    }

    if form.is_blank(FieldKey::WhatsappBusinessId) {
        errors.insert(FieldKey::WhatsappBusinessId, text.business_id_required);
    }

    for field in FORM_FIELDS.iter() {
        if form.is_blank(field.key) {
            errors.insert(field.key, required_message(field.key.as_str()));
        }
    }

    errors
}

pub fn is_valid_whatsapp_number(value: &str) -> bool {
    whatsapp_number_pattern().is_match(value)
}

/// `"openaiAPI"` -> `"openai API is required"`.
pub fn required_message(key: &str) -> String {
    format!("{} is required", split_camel_case(key))
}

/// Insert a space at each camel-case boundary, keeping the original casing.
///
/// A boundary sits before an uppercase letter that follows a lowercase
/// letter or digit, and before the last capital of an acronym run when a
/// lowercase letter follows it (`APIToken` -> `API Token`).
pub fn split_camel_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let after_word = prev.is_lowercase() || prev.is_ascii_digit();
            let ends_acronym = prev.is_uppercase() && next_is_lower;
            if after_word || ends_acronym {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn filled_form() -> FormData {
        let mut form = FormData::new();
        for key in FieldKey::all() {
            form.set(key, "value");
        }
        form.set(FieldKey::WhatsappNumber, "+14155551234");
        form
    }

    #[test]
    fn test_blank_form_flags_every_field() {
        let form = FormData::new();
        let errors = validate(&form);

        for field in FORM_FIELDS.iter() {
            assert!(errors.contains(field.key), "missing error for {}", field.key.as_str());
        }
        assert_eq!(errors.get(FieldKey::Name), Some("Name is required"));
        assert_eq!(
            errors.get(FieldKey::WhatsappNumber),
            Some("WhatsApp number is required")
        );
        assert!(errors.contains(FieldKey::WhatsappBusinessId));
        assert_eq!(errors.len(), FieldKey::all().len());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut form = FormData::new();
        form.set(FieldKey::Email, "ops@example.com");
        assert_eq!(validate(&form), validate(&form));
    }

    #[test]
    fn test_filled_form_passes() {
        assert!(validate(&filled_form()).is_empty());
    }

    #[test]
    fn test_short_whatsapp_number_is_invalid() {
        let mut form = filled_form();
        form.set(FieldKey::WhatsappNumber, "12345");
        let errors = validate(&form);
        assert_eq!(errors.get(FieldKey::WhatsappNumber), Some("Invalid WhatsApp number"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_international_whatsapp_number_is_valid() {
        assert!(is_valid_whatsapp_number("+14155551234"));
        assert!(is_valid_whatsapp_number("4155551234"));
        assert!(!is_valid_whatsapp_number("+1 415 555 1234"));
        assert!(!is_valid_whatsapp_number("++14155551234"));
        assert!(!is_valid_whatsapp_number(" +14155551234"));
        assert!(!is_valid_whatsapp_number("+١٤١٥٥٥٥١٢٣٤"));
    }

    #[test]
    fn test_camel_case_keys_expand_to_spaced_messages() {
        assert_eq!(required_message("openaiAPI"), "openai API is required");
        assert_eq!(required_message("whatsappAPIToken"), "whatsapp API Token is required");
        assert_eq!(required_message("businessName"), "business Name is required");
        assert_eq!(required_message("email"), "email is required");
        assert_eq!(
            required_message("retrievalToolDescription"),
            "retrieval Tool Description is required"
        );
    }

    #[test]
    fn test_business_id_ends_with_generic_message() {
        let mut form = filled_form();
        form.set(FieldKey::WhatsappBusinessId, " ");
        let errors = validate(&form);
        assert_eq!(
            errors.get(FieldKey::WhatsappBusinessId),
            Some("whatsapp Business Id is required")
        );
    }

    #[test]
    fn test_localized_messages_for_identity_fields() {
        let errors = validate_with(&FormData::new(), &Locale::Fr.dictionary());
        assert_eq!(errors.get(FieldKey::Name), Some("Le nom est obligatoire"));
        assert_eq!(errors.get(FieldKey::Email), Some("email is required"));
    }
}

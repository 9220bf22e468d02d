//! String normalization over a record's declared string fields.

use crate::entity::Entity;

/// Trim leading and trailing whitespace from every writable string field of
/// a record, in place.
///
/// Fields marked exempt are skipped. A value that is null or entirely
/// whitespace is left untouched; only a non-empty value with surrounding
/// whitespace is replaced by its trimmed form.
pub fn trim_strings<T: Entity>(record: &mut T) {
    for field in T::string_fields() {
        if field.exempt {
            continue;
        }

        let replacement = match (field.get)(record) {
            Some(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() || trimmed.len() == value.len() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => None,
        };

        if let Some(value) = replacement {
            (field.set)(record, value);
        }
    }
}

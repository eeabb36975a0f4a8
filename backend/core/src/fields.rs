//! Field mutation operations.
//!
//! Each operation takes the current draft by reference and returns the next one, so a
//! failed operation leaves the caller's draft exactly as it was.

use crate::draft::{EmbedDraft, Field, MAX_FIELDS};
use crate::error::{EmbedError, ValidationError};

/// Append a field at the end of the field list.
pub fn add_field(draft: &EmbedDraft, field: Field) -> Result<EmbedDraft, EmbedError> {
    if draft.fields.len() >= MAX_FIELDS {
        return Err(ValidationError::TooManyFields { limit: MAX_FIELDS }.into());
    }
    let mut next = draft.clone();
    next.fields.push(field);
    next.check_limits()?;
    Ok(next)
}

/// Remove the field at `index`, keeping the order of the others.
pub fn remove_field_at(draft: &EmbedDraft, index: usize) -> Result<EmbedDraft, EmbedError> {
    check_index(draft, index)?;
    let mut next = draft.clone();
    next.fields.remove(index);
    Ok(next)
}

/// Replace the field at `index` in place.
pub fn set_field_at(draft: &EmbedDraft, index: usize, field: Field) -> Result<EmbedDraft, EmbedError> {
    check_index(draft, index)?;
    let mut next = draft.clone();
    next.fields[index] = field;
    next.check_limits()?;
    Ok(next)
}

/// Empty list is reported before the index is looked at.
pub fn check_index(draft: &EmbedDraft, index: usize) -> Result<(), EmbedError> {
    let len = draft.fields.len();
    if len == 0 {
        return Err(EmbedError::NoFields);
    }
    if index >= len {
        return Err(EmbedError::IndexOutOfRange { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Rgb;

    fn field(name: &str) -> Field {
        Field::new(name, "value", true).unwrap()
    }

    fn draft_with(names: &[&str]) -> EmbedDraft {
        let mut draft = EmbedDraft::empty(Rgb::default());
        draft.fields = names.iter().map(|n| field(n)).collect();
        draft
    }

    #[test]
    fn add_appends_in_order() {
        let draft = draft_with(&["a"]);
        let next = add_field(&draft, field("b")).unwrap();
        let names: Vec<_> = next.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(draft.fields.len(), 1);
    }

    #[test]
    fn add_then_remove_restores_fields() {
        let draft = draft_with(&["a", "b"]);
        let added = add_field(&draft, field("c")).unwrap();
        let removed = remove_field_at(&added, 2).unwrap();
        assert_eq!(removed.fields, draft.fields);
    }

    #[test]
    fn add_rejects_26th_field() {
        let names: Vec<String> = (0..MAX_FIELDS).map(|i| format!("f{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let draft = draft_with(&refs);
        let err = add_field(&draft, field("extra")).unwrap_err();
        assert_eq!(err, EmbedError::Validation(ValidationError::TooManyFields { limit: 25 }));
    }

    #[test]
    fn remove_keeps_order_of_others() {
        let draft = draft_with(&["a", "b", "c"]);
        let next = remove_field_at(&draft, 1).unwrap();
        let names: Vec<_> = next.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let draft = draft_with(&["a", "b", "c"]);
        let next = set_field_at(&draft, 1, Field::new("B", "new", false).unwrap()).unwrap();
        assert_eq!(next.fields[1].name, "B");
        assert!(!next.fields[1].inline);
        assert_eq!(next.fields[0].name, "a");
        assert_eq!(next.fields[2].name, "c");
    }

    #[test]
    fn empty_list_reports_no_fields_before_index() {
        let draft = draft_with(&[]);
        assert_eq!(remove_field_at(&draft, 0).unwrap_err(), EmbedError::NoFields);
        assert_eq!(set_field_at(&draft, 7, field("x")).unwrap_err(), EmbedError::NoFields);
    }

    #[test]
    fn index_past_end_is_out_of_range() {
        let draft = draft_with(&["a"]);
        assert_eq!(
            remove_field_at(&draft, 1).unwrap_err(),
            EmbedError::IndexOutOfRange { index: 1, len: 1 }
        );
        assert_eq!(
            set_field_at(&draft, 3, field("x")).unwrap_err(),
            EmbedError::IndexOutOfRange { index: 3, len: 1 }
        );
    }
}

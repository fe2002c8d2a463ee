use uuid::Uuid;

use super::*;

#[test]
fn error_codes_are_stable() {
    let id = Uuid::nil();
    assert_eq!(EngineError::validation(id, "bad").error_code(), "E_VALIDATION");
    assert_eq!(EngineError::NotFound(id).error_code(), "E_NOT_FOUND");
    assert_eq!(EngineError::DuplicateId(id).error_code(), "E_DUPLICATE_ID");
    assert_eq!(EngineError::EmptyCommand.error_code(), "E_EMPTY_COMMAND");
}

#[test]
fn validation_display_includes_reason() {
    let err = EngineError::validation(Uuid::nil(), "width below minimum");
    let s = err.to_string();
    assert!(s.contains("width below minimum"));
    assert!(s.contains("00000000-0000-0000-0000-000000000000"));
}

#[test]
fn not_found_display_includes_id() {
    let id = Uuid::new_v4();
    assert_eq!(EngineError::NotFound(id).to_string(), format!("element not found: {id}"));
}

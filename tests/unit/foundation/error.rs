use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SheetError::invalid_range("x")
            .to_string()
            .contains("invalid range:")
    );
    assert!(
        SheetError::empty_selection("x")
            .to_string()
            .contains("empty selection:")
    );
    assert!(
        SheetError::degenerate_trim("x")
            .to_string()
            .contains("degenerate trim:")
    );
    assert!(
        SheetError::source_unavailable("x")
            .to_string()
            .contains("source unavailable:")
    );
    assert!(
        SheetError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SheetError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SheetError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

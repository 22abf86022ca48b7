use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DonutError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(DonutError::render("x").to_string().contains("render error:"));
    assert!(
        DonutError::unsupported("x")
            .to_string()
            .contains("unsupported:")
    );
    assert!(
        DonutError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DonutError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_validation());
}

#[test]
fn is_validation_only_matches_validation() {
    assert!(DonutError::validation("bad weights").is_validation());
    assert!(!DonutError::render("no pixmap").is_validation());
}

use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuadfitError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QuadfitError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        QuadfitError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuadfitError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HalfblockError::invalid_dimensions(0, 4)
            .to_string()
            .contains("invalid dimensions: 0x4")
    );
    assert!(
        HalfblockError::buffer_too_small(16, 8)
            .to_string()
            .contains("buffer too small:")
    );
    assert!(
        HalfblockError::invalid_value("x")
            .to_string()
            .contains("invalid value:")
    );
    assert!(
        HalfblockError::invalid_duration("x")
            .to_string()
            .contains("invalid duration:")
    );
    assert!(
        HalfblockError::invalid_alpha_range("x")
            .to_string()
            .contains("invalid alpha range:")
    );
    assert!(
        HalfblockError::invalid_blur_radius("x")
            .to_string()
            .contains("invalid blur radius:")
    );
    assert!(
        HalfblockError::invalid_png_data("x")
            .to_string()
            .contains("invalid png data:")
    );
    assert!(
        HalfblockError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        HalfblockError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HalfblockError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

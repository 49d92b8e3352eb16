use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardgenError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        CardgenError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn render_error_names_the_panel() {
    let err = CardgenError::render("inside", "no track line fits");
    let msg = err.to_string();
    assert!(msg.contains("'inside'"));
    assert!(msg.contains("no track line fits"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardgenError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn fallback_warning_display_names_kind() {
    let w = AssetFallbackWarning::emit(FallbackKind::Artwork, "cover.png unreadable");
    assert_eq!(w.to_string(), "artwork fallback: cover.png unreadable");
}

use super::*;

#[test]
fn gaps_are_equal_and_content_is_centered() {
    let comps = SpineComponents {
        art_left: true,
        dolby_logo: true,
        art_right: false,
    };
    let slots = pack_spine(288.0, comps, 100.0).unwrap();
    let kinds: Vec<SpineComponent> = slots.iter().map(|s| s.component).collect();
    assert_eq!(
        kinds,
        vec![
            SpineComponent::ArtLeft,
            SpineComponent::Text,
            SpineComponent::DolbyLogo
        ]
    );
    let gap = slots[0].start;
    assert!((gap - (288.0 - 172.0) / 4.0).abs() < 1e-9);
    for pair in slots.windows(2) {
        assert!((pair[1].start - pair[0].end() - gap).abs() < 1e-9);
    }
    assert!((288.0 - slots[2].end() - gap).abs() < 1e-9);
}

#[test]
fn absent_components_take_no_length() {
    let slots = pack_spine(288.0, SpineComponents::default(), 88.0).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start, 100.0);
}

#[test]
fn budget_subtracts_fixed_components_and_minimum_gaps() {
    let all = SpineComponents {
        art_left: true,
        dolby_logo: true,
        art_right: true,
    };
    let budget = text_budget(288.0, all).unwrap();
    assert!((budget - (288.0 - 108.0 - 5.0 * SPINE_MIN_GAP_PT)).abs() < 1e-9);
    assert!(text_budget(100.0, all).is_err());
}

#[test]
fn overfull_spine_is_render_error() {
    let err = pack_spine(50.0, SpineComponents::default(), 80.0).unwrap_err();
    assert!(err.to_string().contains("'spine'"));
}

use super::*;

#[test]
fn dpi_bounds_are_inclusive() {
    assert!(Dpi::new(299).is_err());
    assert_eq!(Dpi::new(300).unwrap().get(), 300);
    assert_eq!(Dpi::new(1200).unwrap().get(), 1200);
    let err = Dpi::new(1201).unwrap_err();
    assert!(err.to_string().starts_with("config error:"));
}

#[test]
fn spine_is_half_inch_in_pixels() {
    let spine_pt = to_points(SPINE_WIDTH_IN);
    assert_eq!(spine_pt, 36.0);
    assert_eq!(to_pixels(spine_pt, 300).unwrap(), 150.0);
    assert_eq!(to_pixels(spine_pt, 600).unwrap(), 300.0);
    assert!(to_pixels(spine_pt, 72).is_err());
}

#[test]
fn points_and_inches_invert() {
    assert_eq!(points_to_inches(to_points(2.5)), 2.5);
}

#[test]
fn dpi_deserialization_validates() {
    let ok: Dpi = serde_json::from_str("450").unwrap();
    assert_eq!(ok.get(), 450);
    assert!(serde_json::from_str::<Dpi>("100").is_err());
}

#[test]
fn page_sizes_parse_and_report_points() {
    assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
    assert_eq!(PageSize::Letter.points(), (612.0, 792.0));
    assert!("tabloid".parse::<PageSize>().is_err());
}

#[test]
fn orientation_prefers_portrait_then_landscape() {
    let four = to_points(6.167);
    let five = to_points(8.667);
    let h = to_points(CARD_HEIGHT_IN);
    assert_eq!(
        PageSize::Letter.orientation_for(four, h).unwrap(),
        Orientation::Portrait
    );
    assert_eq!(
        PageSize::Letter.orientation_for(five, h).unwrap(),
        Orientation::Landscape
    );
    assert_eq!(
        PageSize::Letter.oriented_points(Orientation::Landscape),
        (792.0, 612.0)
    );
    let err = PageSize::A5.orientation_for(five, h).unwrap_err();
    assert!(err.to_string().contains("a5"));
}

use super::*;

#[test]
fn durations_switch_to_hours_at_sixty_minutes() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(59), "0:59");
    assert_eq!(format_duration(245), "4:05");
    assert_eq!(format_duration(3599), "59:59");
    assert_eq!(format_duration(3600), "1:00:00");
    assert_eq!(format_duration(5025), "1:23:45");
}

#[test]
fn only_the_first_genre_carries_the_label() {
    let rows = left_rows(&["Ambient".to_string(), "Drone".to_string()]);
    assert_eq!(rows[0].text, "Genre: Ambient");
    assert!(!rows[0].indented);
    assert_eq!(rows[1].text, "Drone");
    assert!(rows[1].indented);
    assert!(left_rows(&[]).is_empty());
}

#[test]
fn absent_year_and_label_are_skipped() {
    let texts: Vec<String> = right_rows(None, None, 125, 3)
        .into_iter()
        .map(|r| r.text)
        .collect();
    assert_eq!(texts, vec!["Duration: 2:05", "Tracks: 3"]);

    let texts: Vec<String> = right_rows(Some(1994), Some("Warp"), 3725, 12)
        .into_iter()
        .map(|r| r.text)
        .collect();
    assert_eq!(
        texts,
        vec!["Year: 1994", "Label: Warp", "Duration: 1:02:05", "Tracks: 12"]
    );
}

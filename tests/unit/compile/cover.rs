use super::*;

#[test]
fn square_crop_is_centered_on_the_long_side() {
    assert_eq!(square_crop(400.0, 200.0), Rect::new(100.0, 0.0, 300.0, 200.0));
    assert_eq!(square_crop(200.0, 300.0), Rect::new(0.0, 50.0, 200.0, 250.0));
    assert_eq!(square_crop(64.0, 64.0), Rect::new(0.0, 0.0, 64.0, 64.0));
}

#[test]
fn fullscale_crops_width_by_alignment() {
    // 1000x500 scaled to 100pt high is 200pt wide; a 100pt slot shows half of it.
    let dest = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(
        fullscale_crop(1000.0, 500.0, dest, Align::Left),
        Rect::new(0.0, 0.0, 500.0, 500.0)
    );
    assert_eq!(
        fullscale_crop(1000.0, 500.0, dest, Align::Center),
        Rect::new(250.0, 0.0, 750.0, 500.0)
    );
    assert_eq!(
        fullscale_crop(1000.0, 500.0, dest, Align::Right),
        Rect::new(500.0, 0.0, 1000.0, 500.0)
    );
}

#[test]
fn narrow_art_is_cropped_vertically_instead() {
    let dest = Rect::new(0.0, 0.0, 200.0, 100.0);
    let crop = fullscale_crop(100.0, 400.0, dest, Align::Left);
    assert_eq!(crop, Rect::new(0.0, 175.0, 100.0, 225.0));
}

#[test]
fn crop_aspect_matches_destination() {
    let dest = Rect::new(0.0, 0.0, 180.0, 228.0);
    let crop = fullscale_crop(640.0, 480.0, dest, Align::Center);
    let want = dest.width() / dest.height();
    assert!((crop.width() / crop.height() - want).abs() < 1e-9);
    assert!(crop.x0 >= 0.0 && crop.x1 <= 640.0);
}

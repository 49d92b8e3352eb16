use super::*;

fn album(durations: &[u32]) -> Album {
    durations
        .iter()
        .enumerate()
        .fold(Album::builder("A", "T"), |b, (i, d)| b.track(format!("Track {}", i + 1), *d))
        .build()
}

fn numbers(side: &SidePlan<'_>) -> Vec<u32> {
    side.tracks.iter().map(|(_, t)| t.number).collect()
}

#[test]
fn side_a_fills_greedily_then_side_b_takes_the_rest() {
    let albums = [album(&[600, 600, 600, 300])];
    let sides = assign_sides(&albums, 1500);
    assert_eq!(sides.len(), 2);
    assert_eq!(numbers(&sides[0]), vec![1, 2]);
    // Track 4 would fit Side A but order is kept.
    assert_eq!(numbers(&sides[1]), vec![3, 4]);
    assert_eq!(sides[1].side, TapeSide::B);
    assert_eq!(sides[1].offset_secs, 300);
}

#[test]
fn short_album_has_no_side_b() {
    let albums = [album(&[100, 200])];
    let sides = assign_sides(&albums, 2700);
    assert_eq!(sides.len(), 1);
    assert_eq!(sides[0].side, TapeSide::A);
}

#[test]
fn overlong_album_still_assigns_every_track() {
    let albums = [album(&[3000, 3000])];
    let sides = assign_sides(&albums, 2700);
    let count: usize = sides.iter().map(|s| s.tracks.len()).sum();
    assert_eq!(count, 2);
    assert!(sides[0].tracks.is_empty());
    assert_eq!(sides[1].offset_secs, 2700);
}

#[test]
fn double_albums_get_one_side_each() {
    let albums = [album(&[100, 100]), album(&[50])];
    let sides = assign_sides(&albums, 2700);
    assert_eq!(sides.len(), 2);
    assert!(sides[0].tracks.iter().all(|(a, _)| *a == 0));
    assert!(sides[1].tracks.iter().all(|(a, _)| *a == 1));
    assert_eq!(sides[1].offset_secs, 0);
}

#[test]
fn minimap_segments_are_proportional_and_start_after_offset() {
    let albums = [album(&[500, 1000, 1000])];
    let sides = assign_sides(&albums, 2000);
    let a = minimap_segments(&sides[0], 2000);
    assert_eq!(a.len(), 2);
    assert_eq!((a[0].start, a[0].end), (0.0, 0.25));
    assert_eq!((a[1].start, a[1].end), (0.25, 0.75));

    let b = minimap_segments(&sides[1], 2000);
    assert_eq!(sides[1].offset_secs, 500);
    assert_eq!((b[0].start, b[0].end), (0.25, 0.75));
    assert_eq!(b[0].track, 3);
}

#[test]
fn minimap_segments_clamp_at_the_tape_end() {
    let albums = [album(&[100, 200])];
    let sides = assign_sides(&albums, 250);
    let b = minimap_segments(&sides[1], 250);
    assert_eq!(b[0].end, 1.0);
}

use super::*;

#[test]
fn spine_line_joins_present_parts() {
    let album = Album::builder("Boards of Canada", "Geogaddi").year(2002).build();
    assert_eq!(spine_line(&album), "Boards of Canada \u{2022} Geogaddi \u{2022} 2002");

    let undated = Album::builder("Low", "Things We Lost in the Fire").build();
    assert_eq!(spine_line(&undated), "Low \u{2022} Things We Lost in the Fire");
}

#[test]
fn blank_parts_are_skipped() {
    let album = Album::builder("  ", "Untitled").year(1999).build();
    assert_eq!(spine_line(&album), "Untitled \u{2022} 1999");
}

use super::*;
use crate::text::metrics::ApproxMetrics;

fn font() -> FontRef {
    FontRef::new("Helvetica", 400)
}

fn width(text: &str, size: f64, spacing: f64) -> f64 {
    ApproxMetrics.width(text, &font(), size, spacing)
}

#[test]
fn empty_and_blank_text_produce_no_runs() {
    let f = font();
    assert!(fit_text(&FitRequest::new("", &f, 100.0, 100.0, 10.0), &ApproxMetrics).is_empty());
    assert!(fit_text(&FitRequest::new("   ", &f, 100.0, 100.0, 10.0), &ApproxMetrics).is_empty());
}

#[test]
fn fitting_text_is_emitted_unchanged() {
    let f = font();
    let runs = fit_text(&FitRequest::new("Hello", &f, 100.0, 100.0, 10.0), &ApproxMetrics);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Hello");
    assert_eq!(runs[0].size, 10.0);
    assert_eq!(runs[0].spacing, 0.0);
    assert!((runs[0].bbox.width() - 22.2).abs() < 1e-9);
    assert!((runs[0].bbox.height() - 12.0).abs() < 1e-9);
}

#[test]
fn spacing_tightens_to_the_first_fitting_step() {
    let f = font();
    let req = FitRequest::new("Hello", &f, 20.0, 100.0, 10.0).spacing(0.0, -1.0);
    let runs = fit_text(&req, &ApproxMetrics);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Hello");
    assert!((runs[0].spacing + 0.6).abs() < 1e-9, "{}", runs[0].spacing);
    assert!(width("Hello", 10.0, runs[0].spacing) <= 20.0 + 1e-6);
}

#[test]
fn truncate_appends_ellipsis_and_never_grows() {
    let f = font();
    let input = "Hello World";
    let runs = fit_text(&FitRequest::new(input, &f, 25.0, 100.0, 10.0), &ApproxMetrics);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Hell\u{2026}");
    assert!(runs[0].text.chars().count() <= input.chars().count());
    assert!(runs[0].bbox.width() <= 25.0 + 1e-6);
}

#[test]
fn truncate_trims_whitespace_before_ellipsis() {
    let f = font();
    // "Hello W…" is too wide but "Hello…" fits.
    let runs = fit_text(&FitRequest::new("Hello World", &f, 28.0, 100.0, 10.0), &ApproxMetrics);
    assert_eq!(runs[0].text, "Hello\u{2026}");
}

#[test]
fn truncate_emits_empty_run_when_nothing_fits() {
    let f = font();
    let runs = fit_text(&FitRequest::new("Hello", &f, 3.0, 100.0, 10.0), &ApproxMetrics);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "");
}

#[test]
fn truncate_handles_very_long_titles() {
    let f = font();
    let long = "a".repeat(20_000);
    let short = "a".repeat(200);
    let fit = |text: &str| {
        let req = FitRequest::new(text, &f, 100.0, 12.0, 10.0).spacing(0.0, -1.0);
        fit_text(&req, &ApproxMetrics)
    };
    let runs = fit(&long);
    assert_eq!(runs.len(), 1);
    assert!(runs[0].text.ends_with(ELLIPSIS));
    assert!(runs[0].bbox.width() <= 100.0 + 1e-6);
    assert_eq!(runs, fit(&short));
}

#[test]
fn truncate_keeps_the_longest_prefix_that_fits() {
    let f = font();
    let input = "Hello World";
    let runs = fit_text(&FitRequest::new(input, &f, 25.0, 100.0, 10.0), &ApproxMetrics);
    let kept = runs[0].text.trim_end_matches(ELLIPSIS);
    let longer: String = input.chars().take(kept.chars().count() + 1).collect();
    assert!(width(&format!("{}{ELLIPSIS}", longer.trim_end()), 10.0, 0.0) > 25.0);
}

#[test]
fn truncate_ignores_region_height() {
    let f = font();
    let runs = fit_text(&FitRequest::new("Hi", &f, 100.0, 0.0, 10.0), &ApproxMetrics);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Hi");
}

#[test]
fn wrap_breaks_overflowing_title_into_lines_within_width() {
    let f = font();
    let req = FitRequest::new("The Quick Brown Fox Jumps", &f, 60.0, 100.0, 10.0)
        .overflow(OverflowPolicy::Wrap);
    assert!(width(req.text, 10.0, 0.0) > 60.0);
    let runs = fit_text(&req, &ApproxMetrics);
    assert!(runs.len() >= 2);
    for (i, run) in runs.iter().enumerate() {
        assert!(width(&run.text, run.size, run.spacing) <= 60.0 + 1e-6);
        assert!((run.bbox.y0 - (i as f64) * 12.0).abs() < 1e-9);
    }
    let joined: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(joined.join(" "), "The Quick Brown Fox Jumps");
}

#[test]
fn wrap_hard_splits_words_that_fit_nowhere() {
    let f = font();
    let word = "Supercalifragilistic";
    let req = FitRequest::new(word, &f, 30.0, 100.0, 10.0)
        .floor(8.0)
        .overflow(OverflowPolicy::Wrap);
    let runs = fit_text(&req, &ApproxMetrics);
    assert!(runs.len() > 1);
    let mut joined = String::new();
    for run in &runs {
        assert_eq!(run.size, 8.0);
        assert!(width(&run.text, run.size, run.spacing) <= 30.0 + 1e-6);
        joined.push_str(&run.text);
    }
    assert_eq!(joined, word);
}

#[test]
fn wrap_shrinks_size_before_splitting() {
    let f = font();
    // "Overture" is 43.2pt wide at 10pt and 38.9pt at 9pt.
    let req = FitRequest::new("Overture", &f, 40.0, 100.0, 10.0)
        .floor(6.0)
        .overflow(OverflowPolicy::Wrap);
    let runs = fit_text(&req, &ApproxMetrics);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Overture");
    assert_eq!(runs[0].size, 9.0);
}

#[test]
fn wrap_drops_lines_beyond_height() {
    let f = font();
    let req = FitRequest::new("aaa bbb ccc ddd", &f, 20.0, 12.0, 10.0).overflow(OverflowPolicy::Wrap);
    let runs = fit_text(&req, &ApproxMetrics);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "aaa");
}

#[test]
fn wrap_returns_nothing_when_no_line_fits_height() {
    let f = font();
    let req = FitRequest::new("aaa", &f, 100.0, 5.0, 10.0)
        .floor(6.0)
        .overflow(OverflowPolicy::Wrap);
    assert!(fit_text(&req, &ApproxMetrics).is_empty());
}

#[test]
fn fitting_is_idempotent() {
    let f = font();
    let requests = [
        FitRequest::new("Hello World", &f, 25.0, 100.0, 10.0),
        FitRequest::new("Hello", &f, 20.0, 100.0, 10.0).spacing(0.0, -1.0),
        FitRequest::new("A Much Longer Album Title Here", &f, 50.0, 60.0, 10.0)
            .floor(6.0)
            .spacing(0.0, -0.5)
            .overflow(OverflowPolicy::Wrap),
    ];
    for req in &requests {
        let first = fit_text(req, &ApproxMetrics);
        for run in &first {
            let mut again = req.clone();
            again.text = &run.text;
            again.base_size = run.size;
            again.floor_size = again.floor_size.min(run.size);
            again.base_spacing = run.spacing;
            again.min_spacing = again.min_spacing.min(run.spacing);
            let second = fit_text(&again, &ApproxMetrics);
            assert_eq!(second.len(), 1, "{:?}", run.text);
            assert_eq!(second[0].text, run.text);
            assert_eq!(second[0].size, run.size);
            assert_eq!(second[0].spacing, run.spacing);
            assert_eq!(second[0].bbox.width(), run.bbox.width());
        }
    }

    let truncated = fit_text(&requests[0], &ApproxMetrics);
    let mut again = requests[0].clone();
    again.text = &truncated[0].text;
    assert_eq!(fit_text(&again, &ApproxMetrics), truncated);
}

#[test]
fn alignment_positions_runs_in_region() {
    let f = font();
    let centered = fit_text(
        &FitRequest::new("Hello", &f, 100.0, 100.0, 10.0).align(Align::Center),
        &ApproxMetrics,
    );
    assert!((centered[0].bbox.x0 - (100.0 - 22.2) / 2.0).abs() < 1e-9);
    let right = fit_text(
        &FitRequest::new("Hello", &f, 100.0, 100.0, 10.0).align(Align::Right),
        &ApproxMetrics,
    );
    assert!((right[0].bbox.x1 - 100.0).abs() < 1e-9);
}

#[test]
fn overflow_policy_parses() {
    assert_eq!("wrap".parse::<OverflowPolicy>().unwrap(), OverflowPolicy::Wrap);
    assert!("clip".parse::<OverflowPolicy>().is_err());
}

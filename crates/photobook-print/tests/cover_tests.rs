mod common;

use common::*;
use lopdf::Object;
use photobook_print::document::text_width_pt;
use photobook_print::*;

fn cover_spec(page_count: u32) -> CoverSpec {
    CoverSpec {
        book_size: book_size("8x8").unwrap(),
        page_count,
        front_image: photo("front"),
        back_image: Some(photo("back")),
        title: None,
        spine_text: None,
    }
}

fn media_width(bytes: &[u8]) -> f64 {
    let doc = load(bytes);
    let page = page_ids(&doc)[0];
    page_box(&doc, page, b"MediaBox")[2]
}

#[test]
fn test_cover_is_single_page() {
    let cover = compose_cover(&cover_spec(24), &PrintOptions::default()).unwrap();
    assert_eq!(cover.page_count, 1);
    assert_eq!(load(&cover.bytes).get_pages().len(), 1);
}

#[test]
fn test_spine_width_delta_between_page_counts() {
    let options = PrintOptions::default();
    let thin = compose_cover(&cover_spec(20), &options).unwrap();
    let thick = compose_cover(&cover_spec(60), &options).unwrap();

    // 20 extra sheets at 0.012in
    let delta = media_width(&thick.bytes) - media_width(&thin.bytes);
    assert!((delta - 0.24 * 72.0).abs() < 0.01, "delta was {}", delta);

    let size = book_size("8x8").unwrap();
    let thin_layout = CoverLayout::new(size, 20, options.paper_thickness_in).unwrap();
    let thick_layout = CoverLayout::new(size, 60, options.paper_thickness_in).unwrap();
    for region in [CoverRegion::Back, CoverRegion::Front] {
        assert_eq!(
            thin_layout.region_rect(region).width,
            thick_layout.region_rect(region).width
        );
    }
    assert!((thin_layout.width_pt() - media_width(&thin.bytes)).abs() < 0.01);
}

#[test]
fn test_cover_height_is_bleed_height() {
    let cover = compose_cover(&cover_spec(20), &PrintOptions::default()).unwrap();
    let doc = load(&cover.bytes);
    let media = page_box(&doc, page_ids(&doc)[0], b"MediaBox");
    assert!((media[3] - 594.0).abs() < 0.01);
}

#[test]
fn test_cover_trim_box_insets_bleed() {
    let cover = compose_cover(&cover_spec(20), &PrintOptions::default()).unwrap();
    let doc = load(&cover.bytes);
    let page = page_ids(&doc)[0];
    let media = page_box(&doc, page, b"MediaBox");
    let trim = page_box(&doc, page, b"TrimBox");

    assert!((trim[0] - 9.0).abs() < 0.01);
    assert!((trim[1] - 9.0).abs() < 0.01);
    assert!((media[2] - trim[2] - 9.0).abs() < 0.01);
    assert!((media[3] - trim[3] - 9.0).abs() < 0.01);
}

#[test]
fn test_spine_text_omitted_when_spine_too_narrow() {
    let mut spec = cover_spec(20);
    spec.spine_text = Some("Summer at the Lake".to_string());
    let cover = compose_cover(&spec, &PrintOptions::default()).unwrap();

    assert!(cover.warnings.iter().any(|w| w.contains("spine text omitted")));
    let doc = load(&cover.bytes);
    let ops = operations(&doc, page_ids(&doc)[0]);
    assert_eq!(count_ops(&ops, "Tm"), 0);
}

#[test]
fn test_spine_text_rotated_and_clipped() {
    let mut spec = cover_spec(60);
    spec.spine_text = Some("Summer".to_string());
    let cover = compose_cover(&spec, &PrintOptions::default()).unwrap();
    assert!(cover.warnings.iter().all(|w| !w.contains("Spine")));

    let doc = load(&cover.bytes);
    let ops = operations(&doc, page_ids(&doc)[0]);
    assert_eq!(count_ops(&ops, "W"), 1);

    let spine = CoverLayout::new(spec.book_size, 60, PrintOptions::default().paper_thickness_in)
        .unwrap()
        .region_rect(CoverRegion::Spine);
    let texts = shown_text(&ops);
    assert_eq!(texts.len(), 1);
    let text = &texts[0];
    assert!(text.rotated);
    assert_eq!(text.text, "Summer");
    // Rotated text runs downward from its start point
    assert!(text.x >= spine.x && text.x <= spine.right());
    assert!(text.y - text_width_pt("Summer", text.size) >= spine.y);
    assert!(text.y <= spine.top());
}

#[test]
fn test_title_stays_inside_safe_area() {
    let mut spec = cover_spec(40);
    spec.title = Some(
        "A Very Long Title For Our Wonderful Summer Holiday At The Lake House".to_string(),
    );
    let options = PrintOptions::default();
    let cover = compose_cover(&spec, &options).unwrap();

    let layout = CoverLayout::new(spec.book_size, 40, options.paper_thickness_in).unwrap();
    let safe = layout.title_safe_area();

    let doc = load(&cover.bytes);
    let texts = shown_text(&operations(&doc, page_ids(&doc)[0]));
    assert!(!texts.is_empty());
    for text in &texts {
        let width = text_width_pt(&text.text, text.size);
        assert!(!text.rotated);
        assert!(text.x >= safe.x - 0.01, "{:?} left of safe area", text);
        assert!(text.x + width <= safe.right() + 0.01, "{:?} right of safe area", text);
        assert!(text.y >= safe.y && text.y <= safe.top(), "{:?} outside safe area", text);
    }

    // Centred on the front panel
    let first = &texts[0];
    let centre = first.x + text_width_pt(&first.text, first.size) / 2.0;
    assert!((centre - safe.center_x()).abs() < 0.05);
}

#[test]
fn test_missing_back_leaves_white_panel() {
    let mut spec = cover_spec(20);
    spec.back_image = None;
    let cover = compose_cover(&spec, &PrintOptions::default()).unwrap();

    assert!(cover.warnings.iter().all(|w| !w.contains("Back cover")));
    let doc = load(&cover.bytes);
    let ops = operations(&doc, page_ids(&doc)[0]);
    assert_eq!(count_ops(&ops, "Do"), 1);
    assert_eq!(image_streams(&doc).len(), 1);

    // The first paint is an opaque white fill of the whole spread
    let first_fill = ops.iter().position(|op| op.operator == "rg").unwrap();
    let white: Vec<f64> = ops[first_fill].operands.iter().map(number).collect();
    assert_eq!(white, vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_undecodable_back_falls_back_to_white() {
    let mut spec = cover_spec(20);
    spec.back_image = Some(broken_photo("back"));
    let cover = compose_cover(&spec, &PrintOptions::default()).unwrap();

    assert!(cover.warnings.iter().any(|w| w.contains("Back cover photo back")));
    let doc = load(&cover.bytes);
    assert_eq!(count_ops(&operations(&doc, page_ids(&doc)[0]), "Do"), 1);
}

#[test]
fn test_undecodable_front_is_fatal() {
    let mut spec = cover_spec(20);
    spec.front_image = broken_photo("front");
    match compose_cover(&spec, &PrintOptions::default()) {
        Err(err @ PrintError::NoCoverImage) => assert!(!err.is_retryable()),
        other => panic!("Expected NoCoverImage, got {:?}", other.map(|d| d.warnings)),
    }
}

#[test]
fn test_low_resolution_cover_warns() {
    let cover = compose_cover(&cover_spec(20), &PrintOptions::default()).unwrap();
    assert!(cover
        .warnings
        .iter()
        .any(|w| w.starts_with("Front cover photo front") && w.contains("DPI")));
}

#[test]
fn test_cmyk_cover_declares_output_intent() {
    let options = PrintOptions {
        convert_to_cmyk: true,
        ..PrintOptions::default()
    };
    let cover = compose_cover(&cover_spec(20), &options).unwrap();
    let doc = load(&cover.bytes);

    let intents = doc
        .catalog()
        .unwrap()
        .get(b"OutputIntents")
        .unwrap()
        .as_array()
        .unwrap();
    let intent = intents[0].as_dict().unwrap();
    match intent.get(b"OutputConditionIdentifier").unwrap() {
        Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"CGATS21_CRPC6"),
        other => panic!("Expected string, got {:?}", other),
    }

    for stream in image_streams(&doc) {
        assert_eq!(
            stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceCMYK"
        );
    }
    let ops = operations(&doc, page_ids(&doc)[0]);
    assert_eq!(count_ops(&ops, "rg"), 0);
    assert!(count_ops(&ops, "k") > 0);
}

#[test]
fn test_rgb_cover_has_no_output_intent() {
    let cover = compose_cover(&cover_spec(20), &PrintOptions::default()).unwrap();
    let doc = load(&cover.bytes);
    assert!(doc.catalog().unwrap().get(b"OutputIntents").is_err());
}

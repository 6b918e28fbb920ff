use std::sync::Arc;

use super::*;

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font() -> Option<PreparedFont> {
    SYSTEM_FONT_CANDIDATES.iter().find_map(|p| {
        std::fs::read(p).ok().map(|bytes| PreparedFont {
            name: "system".to_string(),
            bytes: Arc::new(bytes),
        })
    })
}

#[test]
fn fixed_advance_counts_chars() {
    let mut m = FixedAdvanceMetrics {
        advance_px: 7.0,
        line_height_px: 12.0,
    };
    assert_eq!(m.text_width("HELLO").unwrap(), 35.0);
    assert_eq!(m.text_width("ÉÉ").unwrap(), 14.0);
    assert_eq!(m.text_width("").unwrap(), 0.0);
    assert_eq!(m.line_height().unwrap(), 12.0);
}

#[test]
fn rejects_non_positive_font_size() {
    let font = PreparedFont {
        name: "x".to_string(),
        bytes: Arc::new(vec![]),
    };
    assert!(TextLayoutEngine::new(&font, 0.0).is_err());
    assert!(TextLayoutEngine::new(&font, f32::NAN).is_err());
}

#[test]
fn garbage_font_bytes_are_an_asset_error() {
    let font = PreparedFont {
        name: "broken".to_string(),
        bytes: Arc::new(b"definitely not a font".to_vec()),
    };
    let err = TextLayoutEngine::new(&font, 16.0).err().unwrap();
    assert!(err.to_string().contains("broken"));
}

#[test]
fn system_font_metrics_are_monotonic() {
    let Some(font) = system_font() else {
        return;
    };

    let mut engine = TextLayoutEngine::new(&font, 16.0).unwrap();
    assert!(!engine.family_name().is_empty());

    let short = engine.text_width("HI").unwrap();
    let long = engine.text_width("HELLO THERE").unwrap();
    assert!(short > 0.0);
    assert!(long > short);

    let h1 = engine.line_height().unwrap();
    let h2 = engine.line_height().unwrap();
    assert!(h1 > 0.0);
    assert_eq!(h1, h2);
}

use super::*;
use crate::text::bubble::{Pointing, SpeechBubble};

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

fn is_near(px: [u8; 4], want: [u8; 4]) -> bool {
    px.iter()
        .zip(want.iter())
        .all(|(a, b)| (i16::from(*a) - i16::from(*b)).abs() <= 8)
}

#[test]
fn panel_surface_must_fit_u16() {
    assert!(surface_size(70_000, 10).is_err());
    assert!(surface_size(0, 10).is_err());
    assert_eq!(surface_size(3, 4).unwrap(), (3, 4));
}

#[test]
fn plan_renders_image_and_bubble() {
    let Some(font) = system_font() else {
        return;
    };
    let mut backend = CpuBackend::new(&font, 16.0).unwrap();

    let bg = image::RgbaImage::from_pixel(200, 150, image::Rgba([0, 0, 255, 255]));
    let bubble = &SpeechBubble::create_text("hi", true)[0];
    let geometry = bubble
        .layout(Point::new(10.0, 10.0), Pointing::Left, backend.text_engine())
        .unwrap();
    let body = geometry.body;

    let plan = PanelPlan {
        width: 200,
        height: 150,
        ops: vec![
            DrawOp::Image {
                image: Arc::new(bg),
                origin: Point::ORIGIN,
            },
            DrawOp::Bubble {
                geometry,
                lines: bubble.lines().to_vec(),
            },
        ],
    };
    let out = backend.render_plan(&plan).unwrap();

    assert_eq!(out.size(), (200, 150));
    assert!(is_near(out.pixel(199, 149).unwrap(), [0, 0, 255, 255]));
    let inside = out
        .pixel(body.x0 as u32 + 6, (body.y0 + body.height() / 2.0) as u32)
        .unwrap();
    assert!(is_near(inside, [255, 255, 255, 255]));
    let edge = out
        .pixel(body.x0 as u32 + 10, body.y0 as u32)
        .unwrap();
    assert!(edge[0] < 128 && edge[2] < 200, "outline pixel {edge:?}");
}

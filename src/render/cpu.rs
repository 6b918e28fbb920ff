use std::sync::Arc;

use kurbo::Shape;

use crate::{
    assets::decode::premultiplied_rgba8,
    assets::store::PreparedFont,
    compile::plan::{DrawOp, PanelPlan},
    foundation::core::{Point, Raster, Rgba8},
    foundation::error::{ChatstripError, ChatstripResult},
    text::bubble::{BubbleGeometry, CORNER_RADIUS, OUTLINE_WIDTH},
    text::metrics::TextLayoutEngine,
};

const PATH_TOLERANCE: f64 = 0.1;

/// CPU rasterizer for panel plans, bound to one font.
///
/// Holds parley contexts, so each render worker builds its own.
pub struct CpuBackend {
    font: vello_cpu::peniko::FontData,
    text: TextLayoutEngine,
}

impl CpuBackend {
    pub fn new(font: &PreparedFont, font_size_px: f32) -> ChatstripResult<Self> {
        let text = TextLayoutEngine::new(font, font_size_px)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            0,
        );
        Ok(Self { font, text })
    }

    /// Text metrics of the bound font, for compiling plans this backend will draw.
    pub fn text_engine(&mut self) -> &mut TextLayoutEngine {
        &mut self.text
    }

    pub fn render_plan(&mut self, plan: &PanelPlan) -> ChatstripResult<Raster> {
        let (w, h) = surface_size(plan.width, plan.height)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        for op in &plan.ops {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match op {
                DrawOp::Image { image, origin } => draw_image(&mut ctx, image, *origin)?,
                DrawOp::Bubble { geometry, lines } => self.draw_bubble(&mut ctx, geometry, lines),
            }
        }

        finish(ctx, w, h)
    }

    fn draw_bubble(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        geometry: &BubbleGeometry,
        lines: &[String],
    ) {
        let outline = vello_cpu::kurbo::Stroke::new(OUTLINE_WIDTH)
            .with_join(vello_cpu::kurbo::Join::Round)
            .with_caps(vello_cpu::kurbo::Cap::Round);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_stroke(outline);

        let mut tail = kurbo::BezPath::new();
        tail.move_to(geometry.tail[0]);
        tail.line_to(geometry.tail[1]);
        tail.line_to(geometry.tail[2]);
        tail.close_path();
        fill_and_outline(ctx, &shape_to_cpu(&tail));

        let body = kurbo::RoundedRect::from_rect(geometry.body, CORNER_RADIUS);
        fill_and_outline(ctx, &shape_to_cpu(&body));

        for (line, origin) in lines.iter().zip(&geometry.line_origins) {
            let layout = self.text.layout_line(line);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
            for layout_line in layout.lines() {
                for item in layout_line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
    }
}

fn surface_size(width: u32, height: u32) -> ChatstripResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ChatstripError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ChatstripError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ChatstripError::render("surface has zero area"));
    }
    Ok((w, h))
}

fn finish(mut ctx: vello_cpu::RenderContext, w: u16, h: u16) -> ChatstripResult<Raster> {
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Raster::new(
        u32::from(w),
        u32::from(h),
        pixmap.data_as_u8_slice().to_vec(),
    )
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    image: &image::RgbaImage,
    origin: Point,
) -> ChatstripResult<()> {
    let (w, h) = image.dimensions();
    let paint = premul_paint(&premultiplied_rgba8(image), w, h)?;
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(w),
        f64::from(h),
    ));
    Ok(())
}

fn fill_and_outline(ctx: &mut vello_cpu::RenderContext, path: &vello_cpu::kurbo::BezPath) {
    ctx.set_paint(color_to_cpu(Rgba8::WHITE));
    ctx.fill_path(path);
    ctx.set_paint(color_to_cpu(Rgba8::BLACK));
    ctx.stroke_path(path);
}

fn premul_paint(rgba8_premul: &[u8], width: u32, height: u32) -> ChatstripResult<vello_cpu::Image> {
    let pixmap = premul_bytes_to_pixmap(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ChatstripResult<vello_cpu::Pixmap> {
    let (w, h) = surface_size(width, height)?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ChatstripError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        out.push(el);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

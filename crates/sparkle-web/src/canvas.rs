#![forbid(unsafe_code)]

//! [`Surface`] over a `CanvasRenderingContext2d`.

use sparkle_core::color::Rgb;
use sparkle_core::particle::Point;
use sparkle_core::sprite::{FRAME_SIZE, SpriteFrame};
use sparkle_core::surface::Surface;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

const FRAME_EDGE: f64 = FRAME_SIZE as f64;

pub(crate) struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(crate) fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn draw_sprite(&mut self, image: &HtmlImageElement, frame: SpriteFrame, at: Point, alpha: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha);
        // Fails only for a broken image; the tint pass still runs.
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                f64::from(frame.offset()),
                0.0,
                FRAME_EDGE,
                FRAME_EDGE,
                at.x,
                at.y,
                FRAME_EDGE,
                FRAME_EDGE,
            );
        self.ctx.restore();
    }

    fn tint(&mut self, at: Point, size: f64, color: Rgb, alpha: f64) {
        self.ctx.save();
        if self
            .ctx
            .set_global_composite_operation("source-atop")
            .is_err()
        {
            self.ctx.restore();
            return;
        }
        self.ctx.set_global_alpha(alpha);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(at.x, at.y, size, size);
        self.ctx.restore();
    }
}

//! Canvas 2D drawing targets

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::fx::{HelixSurface, ParticleSurface};
use crate::platform::layout::backing_size;

/// A canvas and its 2D context, drawn in CSS pixels
pub struct Canvas2d {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    css_size: (f64, f64),
}

impl Canvas2d {
    pub fn from_id(document: &Document, id: &str) -> Option<Self> {
        let canvas: HtmlCanvasElement = document.get_element_by_id(id)?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Self {
            canvas,
            ctx,
            css_size: (0.0, 0.0),
        })
    }

    /// Resize the backing store and keep drawing coordinates in CSS pixels
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) {
        let (width, height) = backing_size(css_width, css_height, dpr);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let scale = f64::from(width) / css_width.max(1.0);
        if let Err(e) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            log::warn!("Canvas transform failed: {e:?}");
        }
        self.css_size = (css_width, css_height);
        log::debug!(
            "Canvas #{} resized to {}x{} ({}x{} css)",
            self.canvas.id(),
            width,
            height,
            css_width,
            css_height
        );
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.css_size.0 as f32 / 2.0, self.css_size.1 as f32 / 2.0)
    }

    fn wipe(&self) {
        self.ctx.clear_rect(0.0, 0.0, self.css_size.0, self.css_size.1);
    }
}

impl ParticleSurface for Canvas2d {
    fn clear(&mut self) {
        self.wipe();
    }

    fn fill_glow_circle(&mut self, center: Vec2, radius: f32, alpha: f32, blur: f32, color: &str) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(f64::from(alpha));
        ctx.set_fill_style_str(color);
        ctx.set_shadow_color(color);
        ctx.set_shadow_blur(f64::from(blur));
        ctx.begin_path();
        let _ = ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            TAU,
        );
        ctx.fill();
        ctx.restore();
    }
}

impl HelixSurface for Canvas2d {
    fn clear(&mut self) {
        self.wipe();
    }

    fn stroke_path(&mut self, points: &[Vec2], color: &str, width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(f64::from(width));
        ctx.stroke();
    }
}

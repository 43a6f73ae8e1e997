//! DOM side of the page: password display, overlay, buttons, background
//! decorations and the short-lived click effects.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::Rect;
use crate::consts::BUTTON_CLICK_MS;
use crate::fx::{HelixFrame, HelixSurface, draw_helix};
use crate::interaction::{DecorationEffect, TrackerFrame};
use crate::password::ComplexityTier;
use crate::platform::canvas::Canvas2d;
use crate::platform::layout::*;
use crate::sequence::{SequencePhase, SequenceView};

const PHASE_CLASSES: [&str; 4] = ["preparing", "generating", "revealing", "complete"];
const COPY_IDLE_LABEL: &str = "Copy";

/// Add or remove a class, ignoring DOM errors
pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn element_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

/// Run `f` once after `ms`
pub fn after_ms(ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
    {
        log::warn!("setTimeout failed: {e:?}");
    }
}

/// Append a styled div to `parent` and drop it after `lifetime_ms`
fn spawn_transient(
    document: &Document,
    parent: &Element,
    class: &str,
    style: &str,
    lifetime_ms: i32,
) -> Option<Element> {
    let el = document.create_element("div").ok()?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    let _ = el.set_attribute("style", style);
    parent.append_child(&el).ok()?;

    let doomed = el.clone();
    after_ms(lifetime_ms, move || doomed.remove());
    Some(el)
}

/// The password display, generation overlay and helix canvas
pub struct DomView {
    document: Document,
    display: Element,
    overlay: Option<Element>,
    quantum: Option<Element>,
    helix: Option<Canvas2d>,
    rng: Pcg32,
}

impl DomView {
    pub fn new(document: &Document, seed: u64) -> Option<Self> {
        let display = document.get_element_by_id("passwordDisplay")?;
        let view = Self {
            document: document.clone(),
            overlay: document.get_element_by_id("generationOverlay"),
            quantum: document.query_selector(".quantum-particles").ok().flatten(),
            helix: Canvas2d::from_id(document, "dnaCanvas"),
            rng: Pcg32::seed_from_u64(seed),
            display,
        };
        if view.helix.is_none() {
            log::warn!("No helix canvas, generation will not be animated");
        }
        Some(view)
    }

    pub fn display_rect(&self) -> Rect {
        element_rect(&self.display)
    }

    /// Match the helix canvas to the display container
    pub fn resize_helix(&mut self, dpr: f64) {
        let container = self
            .display
            .parent_element()
            .unwrap_or_else(|| self.display.clone());
        let rect = element_rect(&container);
        if let Some(canvas) = &mut self.helix {
            canvas.resize(f64::from(rect.width), f64::from(rect.height), dpr);
        }
    }

    fn scatter_quantum(&mut self) {
        let Some(container) = &self.quantum else {
            return;
        };
        container.set_inner_html("");
        for dot in scatter_quantum_dots(&mut self.rng, QUANTUM_DOTS) {
            let Ok(el) = self.document.create_element("div") else {
                continue;
            };
            el.set_class_name("quantum-particle");
            let _ = el.set_attribute(
                "style",
                &format!(
                    "left:{:.2}%;top:{:.2}%;animation-delay:{:.2}s;animation-duration:{:.2}s",
                    dot.left_pct, dot.top_pct, dot.delay_s, dot.duration_s
                ),
            );
            let _ = container.append_child(&el);
        }
    }

    fn clear_quantum(&self) {
        if let Some(container) = &self.quantum {
            container.set_inner_html("");
        }
    }
}

impl SequenceView for DomView {
    fn phase_changed(&mut self, phase: SequencePhase) {
        for class in PHASE_CLASSES {
            set_class(&self.display, class, false);
        }
        if let Some(class) = phase.css_class() {
            set_class(&self.display, class, true);
        }
    }

    fn set_overlay(&mut self, active: bool) {
        if let Some(overlay) = &self.overlay {
            set_class(overlay, "active", active);
        }
        if active {
            self.scatter_quantum();
        } else {
            self.clear_quantum();
        }
    }

    fn set_display(&mut self, text: &str) {
        self.display.set_text_content(Some(text));
    }

    fn draw_helix(&mut self, progress: f32) {
        if let Some(canvas) = &mut self.helix {
            let frame = HelixFrame::at(progress, canvas.center());
            draw_helix(&frame, canvas);
        }
    }

    fn clear_helix(&mut self) {
        if let Some(canvas) = &mut self.helix {
            HelixSurface::clear(canvas);
        }
    }
}

/// Generate, copy and tier buttons
pub struct Controls {
    pub generate: HtmlElement,
    copy: Element,
    copy_text: Option<Element>,
    tiers: Vec<(ComplexityTier, Element)>,
    copy_visible: bool,
    copy_label: &'static str,
}

impl Controls {
    pub fn new(document: &Document) -> Option<Self> {
        let generate = document
            .get_element_by_id("genzButton")?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let copy = document.get_element_by_id("copyButton")?;
        let copy_text = copy.query_selector(".copy-text").ok().flatten();
        let tiers = ComplexityTier::ALL
            .iter()
            .filter_map(|tier| {
                let id = format!("{}Btn", tier.as_str());
                document.get_element_by_id(&id).map(|el| (*tier, el))
            })
            .collect();

        let controls = Self {
            generate,
            copy,
            copy_text,
            tiers,
            copy_visible: false,
            copy_label: COPY_IDLE_LABEL,
        };
        set_class(&controls.copy, "hidden", true);
        Some(controls)
    }

    pub fn copy_button(&self) -> &Element {
        &self.copy
    }

    pub fn tier_buttons(&self) -> impl Iterator<Item = &(ComplexityTier, Element)> {
        self.tiers.iter()
    }

    pub fn generate_center(&self) -> Vec2 {
        element_rect(&self.generate).center()
    }

    pub fn set_busy(&self, busy: bool) {
        if busy {
            let _ = self.generate.set_attribute("disabled", "");
        } else {
            let _ = self.generate.remove_attribute("disabled");
        }
    }

    /// Short "clicked" animation on the generate button
    pub fn pulse_generate(&self) {
        set_class(&self.generate, "clicked", true);
        let button = self.generate.clone();
        after_ms(BUTTON_CLICK_MS as i32, move || {
            set_class(&button, "clicked", false);
        });
    }

    pub fn set_copy_visible(&mut self, visible: bool) {
        if visible != self.copy_visible {
            self.copy_visible = visible;
            set_class(&self.copy, "hidden", !visible);
        }
    }

    /// `None` restores the idle label
    pub fn set_copy_label(&mut self, label: Option<&'static str>) {
        let label = label.unwrap_or(COPY_IDLE_LABEL);
        if label == self.copy_label {
            return;
        }
        self.copy_label = label;
        set_class(&self.copy, "copying", label != COPY_IDLE_LABEL);
        match &self.copy_text {
            Some(el) => el.set_text_content(Some(label)),
            None => self.copy.set_text_content(Some(label)),
        }
    }

    pub fn mark_tier(&self, active: ComplexityTier) {
        for (tier, el) in &self.tiers {
            set_class(el, "active", *tier == active);
        }
    }
}

/// Cursor light, gradient circles and the animated background
pub struct Decorations {
    cursor_light: Option<HtmlElement>,
    circles: Vec<HtmlElement>,
    animated_bg: Option<HtmlElement>,
}

impl Decorations {
    pub fn new(document: &Document) -> Self {
        let mut circles = Vec::new();
        if let Ok(list) = document.query_selector_all(".gradient-circle") {
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                    circles.push(el);
                }
            }
        }
        log::debug!("Found {} background decorations", circles.len());

        let html = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };
        Self {
            cursor_light: html("cursorLight"),
            animated_bg: html("animatedBg"),
            circles,
        }
    }

    /// Current on-screen centre of every circle, in document order
    pub fn centers(&self) -> Vec<Vec2> {
        self.circles.iter().map(|c| element_rect(c).center()).collect()
    }

    pub fn apply(&self, frame: &TrackerFrame) {
        if let Some(light) = &self.cursor_light {
            let style = light.style();
            let _ = style.set_property("left", &format!("{:.1}px", frame.pointer.x));
            let _ = style.set_property("top", &format!("{:.1}px", frame.pointer.y));
            set_class(light, "active", frame.highlight_visible);
        }

        for (circle, effect) in self.circles.iter().zip(&frame.effects) {
            set_class(circle, "attracted", matches!(effect, DecorationEffect::Attracted { .. }));
            set_class(circle, "repelled", *effect == DecorationEffect::Repelled);
            let translate = match effect {
                DecorationEffect::Attracted { offset } => {
                    format!("{:.1}px {:.1}px", offset.x, offset.y)
                }
                _ => "0px 0px".to_string(),
            };
            let _ = circle.style().set_property("translate", &translate);
        }
    }

    /// Parallax from device tilt
    pub fn tilt(&self, offset: Vec2) {
        if let Some(bg) = &self.animated_bg {
            let _ = bg
                .style()
                .set_property("translate", &format!("{:.1}px {:.1}px", offset.x, offset.y));
        }
    }
}

/// Expanding ring at `pos`
pub fn shockwave(document: &Document, pos: Vec2) {
    let Some(body) = document.body() else {
        return;
    };
    let style = format!(
        "position:fixed;width:100px;height:100px;border:3px solid rgba(255,255,255,0.8);\
         border-radius:50%;transform:translate(-50%,-50%) scale(0);\
         animation:shockwaveExpand 0.8s ease-out;pointer-events:none;z-index:9998;\
         left:{:.1}px;top:{:.1}px",
        pos.x, pos.y
    );
    spawn_transient(document, &body, "shockwave", &style, SHOCKWAVE_MS);
}

/// Ring of floating sparkles around `center`
pub fn sparkles(document: &Document, rng: &mut Pcg32, center: Vec2) {
    let Some(body) = document.body() else {
        return;
    };
    for sparkle in sparkle_ring(rng, center, SPARKLES) {
        let style = format!(
            "position:fixed;width:8px;height:8px;\
             background:radial-gradient(circle,#fff 0%,transparent 70%);border-radius:50%;\
             pointer-events:none;z-index:9997;animation:sparkleFloat 1.5s ease-out forwards;\
             left:{:.1}px;top:{:.1}px;animation-delay:{:.2}s",
            sparkle.pos.x, sparkle.pos.y, sparkle.delay_s
        );
        spawn_transient(document, &body, "sparkle", &style, SPARKLE_MS);
    }
}

/// Full-screen flash that fades out
pub fn screen_flash(document: &Document) {
    let Some(body) = document.body() else {
        return;
    };
    let style = "position:fixed;top:0;left:0;width:100vw;height:100vh;\
                 background:radial-gradient(circle,rgba(255,255,255,0.4) 0%,\
                 rgba(0,255,255,0.2) 50%,transparent 80%);pointer-events:none;\
                 z-index:9999;opacity:1;transition:opacity 0.8s ease-out";
    if let Some(flash) =
        spawn_transient(document, &body, "", style, FLASH_HOLD_MS + SHOCKWAVE_MS)
    {
        after_ms(FLASH_HOLD_MS, move || {
            if let Some(flash) = flash.dyn_ref::<HtmlElement>() {
                let _ = flash.style().set_property("opacity", "0");
            }
        });
    }
}

/// Ripple inside the button at `client` (viewport coordinates)
pub fn ripple(document: &Document, button: &Element, client: Vec2) {
    let Some(container) = button.query_selector(".ripple-container").ok().flatten() else {
        return;
    };
    let rect = element_rect(button);
    let style = format!(
        "left:{:.1}px;top:{:.1}px;width:10px;height:10px;margin-left:-5px;margin-top:-5px",
        client.x - rect.left,
        client.y - rect.top
    );
    spawn_transient(document, &container, "ripple", &style, SHOCKWAVE_MS);
}

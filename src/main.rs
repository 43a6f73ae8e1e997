//! GenZ Pass entry point
//!
//! Wires the DOM to the app session and runs the frame loop in the browser.
//! The native binary prints sample passwords.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, Document, Element, MouseEvent, TouchEvent, Window};

    use genz_pass::consts::*;
    use genz_pass::interaction::{InputModality, tilt_offset};
    use genz_pass::platform::canvas::Canvas2d;
    use genz_pass::platform::clipboard::copy_text;
    use genz_pass::platform::dom::{self, Controls, Decorations, DomView};
    use genz_pass::platform::now_ms;
    use genz_pass::timing::{Debounce, Throttle};
    use genz_pass::{PasswordApp, Settings};

    /// Page instance holding all state
    struct Page {
        app: PasswordApp,
        view: DomView,
        particle_canvas: Canvas2d,
        decorations: Decorations,
        controls: Controls,
        document: Document,
        /// Cosmetic randomness (sparkles)
        fx_rng: Pcg32,
        input_throttle: Throttle,
        resize: Debounce,
        frame_handle: Option<i32>,
    }

    impl Page {
        /// Size canvases and tell the app where the display sits
        fn layout(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);

            self.particle_canvas.resize(width, height, dpr);
            self.view.resize_helix(dpr);
            self.app.set_reveal_bounds(self.view.display_rect());
        }

        /// Run one frame of the session and push the result to the DOM
        fn frame(&mut self, time: f64) {
            if self.resize.fire(time) {
                self.layout();
            }

            let centers = self.decorations.centers();
            let output = self
                .app
                .frame(time, &centers, &mut self.view, &mut self.particle_canvas);

            if let Some(tracker) = &output.tracker {
                self.decorations.apply(tracker);
            }
            if output.finished {
                self.controls.set_busy(false);
            }
            self.controls.set_copy_visible(self.app.copy_visible());
            let label = self.app.copy_label(time);
            self.controls.set_copy_label(label);
        }

        /// Generate button pressed at `client`
        fn generate(&mut self, client: Vec2) {
            let now = now_ms();
            let center = self.controls.generate_center();
            if !self.app.trigger(now, center, &mut self.view) {
                return;
            }

            self.controls.set_busy(true);
            self.controls.set_copy_visible(false);
            self.controls.pulse_generate();
            dom::ripple(&self.document, &self.controls.generate, client);
            if self.app.settings().effective_particles() {
                dom::shockwave(&self.document, center);
                dom::sparkles(&self.document, &mut self.fx_rng, center);
                dom::screen_flash(&self.document);
            }
        }

        fn set_visible(&mut self, visible: bool) {
            self.app.set_visible(visible, now_ms(), &mut self.view);
            if !visible {
                self.cancel_frame();
            }
        }

        fn cancel_frame(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
                log::debug!("Frame loop cancelled");
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("GenZ Pass starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(particle_canvas) = Canvas2d::from_id(&document, "particleCanvas") else {
            log::error!("Missing #particleCanvas");
            return;
        };
        let seed = js_sys::Date::now() as u64;
        let Some(view) = DomView::new(&document, seed.rotate_left(17)) else {
            log::error!("Missing #passwordDisplay");
            return;
        };
        let Some(controls) = Controls::new(&document) else {
            log::error!("Missing generate or copy button");
            return;
        };

        let has_touch_events = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart"))
            .unwrap_or(false);
        let modality =
            InputModality::detect(has_touch_events, window.navigator().max_touch_points());
        log::info!("Input modality: {modality:?}");

        let settings = Settings::load();
        let app = PasswordApp::new(settings, seed, modality);
        controls.mark_tier(app.tier());

        log::info!("Session initialized with seed: {}", seed);

        let page = Rc::new(RefCell::new(Page {
            app,
            view,
            particle_canvas,
            decorations: Decorations::new(&document),
            controls,
            document: document.clone(),
            fx_rng: Pcg32::seed_from_u64(seed.rotate_left(31)),
            input_throttle: Throttle::new(INPUT_THROTTLE_MS),
            resize: Debounce::new(RESIZE_DEBOUNCE_MS),
            frame_handle: None,
        }));
        page.borrow_mut().layout();

        setup_input_handlers(&window, &document, page.clone());
        setup_buttons(page.clone());
        setup_visibility(&document, page.clone());

        request_animation_frame(&page);

        log::info!("GenZ Pass running!");
    }

    /// Register a listener and leak the closure for the page lifetime
    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let callback = closure.as_ref().unchecked_ref();
        if let Err(e) = target.add_event_listener_with_callback(event, callback) {
            log::warn!("Could not listen for {event}: {e:?}");
        }
        closure.forget();
    }

    fn first_touch(event: &TouchEvent) -> Option<Vec2> {
        event
            .touches()
            .get(0)
            .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
    }

    fn setup_input_handlers(window: &Window, document: &Document, page: Rc<RefCell<Page>>) {
        // Mouse move feeds the trail and the tracker
        {
            let page = page.clone();
            listen(document, "mousemove", move |event: MouseEvent| {
                let now = now_ms();
                let mut p = page.borrow_mut();
                if p.input_throttle.ready(now) {
                    let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                    p.app.pointer_moved(pos, now);
                }
            });
        }

        {
            let page = page.clone();
            listen(document, "mouseenter", move |_event: MouseEvent| {
                page.borrow_mut().app.pointer_entered();
            });
        }

        {
            let page = page.clone();
            listen(document, "mouseleave", move |_event: MouseEvent| {
                page.borrow_mut().app.pointer_left();
            });
        }

        // Click on empty space bursts; buttons and links handle themselves
        {
            let page = page.clone();
            listen(document, "click", move |event: MouseEvent| {
                let on_control = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("button, a").ok().flatten())
                    .is_some();
                if !on_control {
                    let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                    page.borrow_mut().app.click(pos);
                }
            });
        }

        {
            let page = page.clone();
            listen(document, "touchstart", move |event: TouchEvent| {
                if let Some(pos) = first_touch(&event) {
                    page.borrow_mut().app.touch_started(pos, now_ms());
                }
            });
        }

        {
            let page = page.clone();
            listen(document, "touchmove", move |event: TouchEvent| {
                let now = now_ms();
                let mut p = page.borrow_mut();
                if !p.input_throttle.ready(now) {
                    return;
                }
                if let Some(pos) = first_touch(&event) {
                    p.app.touch_moved(pos, now);
                }
            });
        }

        {
            let page = page.clone();
            listen(document, "touchend", move |_event: TouchEvent| {
                page.borrow_mut().app.touch_ended(now_ms());
            });
        }

        // Device tilt parallax
        {
            let page = page.clone();
            listen(window, "deviceorientation", move |event: DeviceOrientationEvent| {
                let offset = tilt_offset(
                    event.gamma().map(|g| g as f32),
                    event.beta().map(|b| b as f32),
                );
                if let Some(offset) = offset {
                    page.borrow().decorations.tilt(offset);
                }
            });
        }

        {
            let page = page.clone();
            listen(window, "resize", move |_event: web_sys::Event| {
                page.borrow_mut().resize.poke(now_ms());
            });
        }

        listen(document, "contextmenu", |event: web_sys::Event| {
            event.prevent_default();
        });
    }

    fn setup_buttons(page: Rc<RefCell<Page>>) {
        let (generate, copy, tiers) = {
            let p = page.borrow();
            (
                p.controls.generate.clone(),
                p.controls.copy_button().clone(),
                p.controls.tier_buttons().cloned().collect::<Vec<_>>(),
            )
        };

        {
            let page = page.clone();
            listen(&generate, "click", move |event: MouseEvent| {
                event.stop_propagation();
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                page.borrow_mut().generate(client);
            });
        }

        {
            let page = page.clone();
            listen(&copy, "click", move |event: MouseEvent| {
                event.prevent_default();
                event.stop_propagation();
                let Some(password) = page.borrow().app.last_password().map(str::to_owned) else {
                    return;
                };
                let page = page.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = copy_text(&password).await;
                    let mut p = page.borrow_mut();
                    let label = p.app.record_copy(&outcome, now_ms());
                    p.controls.set_copy_label(Some(label));
                });
            });
        }

        for (tier, button) in tiers {
            let page = page.clone();
            listen(&button, "click", move |_event: MouseEvent| {
                let mut p = page.borrow_mut();
                p.app.set_tier(tier);
                p.controls.mark_tier(tier);
            });
        }
    }

    fn setup_visibility(document: &Document, page: Rc<RefCell<Page>>) {
        let document_clone = document.clone();
        listen(document, "visibilitychange", move |_event: web_sys::Event| {
            let visible = document_clone.visibility_state() != web_sys::VisibilityState::Hidden;
            page.borrow_mut().set_visible(visible);
            if visible && page.borrow().frame_handle.is_none() {
                request_animation_frame(&page);
            }
        });
    }

    fn request_animation_frame(page: &Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = page.clone();
        let callback = Closure::once_into_js(move |time: f64| frame_loop(next, time));
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => page.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn frame_loop(page: Rc<RefCell<Page>>, time: f64) {
        {
            let mut p = page.borrow_mut();
            p.frame_handle = None;
            if !p.app.is_visible() {
                return;
            }
            p.frame(time);
        }

        request_animation_frame(&page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use genz_pass::Settings;
    use genz_pass::password::{ComplexityTier, PasswordGenerator, validate_strength};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SAMPLES: usize = 5;

    env_logger::init();
    log::info!("GenZ Pass (native) starting...");

    let tiers = match std::env::args().nth(1) {
        None => ComplexityTier::ALL.to_vec(),
        Some(name) => match ComplexityTier::from_str(&name) {
            Some(tier) => vec![tier],
            None => {
                eprintln!("Unknown tier '{name}', expected chill, lit or fire");
                std::process::exit(2);
            }
        },
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut rng = Pcg32::seed_from_u64(seed);
    let settings = Settings::load();

    for tier in tiers {
        let info = tier.info();
        let mut generator = PasswordGenerator::new(settings.generator_config());
        generator.set_tier(tier);

        println!("\n{} {} - {}", info.icon, info.name, info.description);
        match generator.generate_multiple(&mut rng, SAMPLES) {
            Ok(passwords) => {
                for password in passwords {
                    let report = validate_strength(&password);
                    println!("  {password:<22} {}", report.label.as_str());
                }
            }
            Err(e) => log::error!("Generation failed for {}: {e}", tier.as_str()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

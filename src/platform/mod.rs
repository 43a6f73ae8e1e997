//! Platform abstraction layer
//!
//! Browser glue for:
//! - Canvas 2D surfaces for particles and the helix
//! - DOM effects (display text, overlay, flashes, decorations)
//! - Clipboard writes with a selection-copy fallback
//!
//! Placement math lives in `layout` so it builds and tests natively.

pub mod layout;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod clipboard;
#[cfg(target_arch = "wasm32")]
pub mod dom;

/// Milliseconds on the same clock as animation frame timestamps
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

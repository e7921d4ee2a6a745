#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Canvas animations for a small maths page: a parabola with its tangent,
//! a growing circle and a travelling sine wave, plus the page chrome around
//! them.
//!
//! The curve maths, renderer, frame driver and page state are plain Rust
//! and run anywhere; only the `wasm` module touches the browser.

pub mod curve;
pub mod driver;
pub mod error;
pub mod kind;
pub mod page;
pub mod params;
pub mod render;
pub mod surface;
pub mod telemetry;

pub use crate::driver::{
    BusyToken, ManualScheduler, ManualTimer, Phase, PlayOutcome, Player, PlayerConfig,
    Rejection, ReleaseHook, ReleasePolicy, Scheduler, Session, Timer,
};
pub use crate::error::{PageError, PageResult};
pub use crate::kind::AnimationKind;
pub use crate::page::{Command, Effect, Page, PageLayout};
pub use crate::surface::{DrawCall, Recorder, Surface, TextAlign};

#[cfg(target_arch = "wasm32")]
pub use crate::wasm::{play_from_button, Canvas};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::error::PageError;
    use crate::kind::AnimationKind;

    mod dom;
    mod render;

    pub use self::dom::play_from_button;
    pub use self::render::Canvas;

    thread_local! {
        static APP: RefCell<Option<dom::App>> = const { RefCell::new(None) };
    }

    fn with_app(f: impl FnOnce(&dom::App)) {
        APP.with(|app| match app.borrow().as_ref() {
            Some(app) => f(app),
            None => tracing::warn!("page not initialised"),
        });
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        crate::telemetry::init(tracing::Level::INFO);

        let window = web_sys::window().ok_or(PageError::NoWindow)?;
        let document = window.document().ok_or(PageError::NoDocument)?;

        let app = dom::App::mount(&window, &document)?;
        app.player().preview_all();
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));
        dom::wire(&app)?;
        dom::typeset_math(&window);
        Ok(())
    }

    /// Plays one animation by name: `"derivative"`, `"circle"` or `"sine"`.
    #[wasm_bindgen]
    pub fn play_animation(kind: &str) {
        match kind.parse::<AnimationKind>() {
            Ok(kind) => with_app(|app| app.play(kind, None)),
            Err(err) => tracing::warn!(%err, "play ignored"),
        }
    }

    #[wasm_bindgen]
    pub fn scroll_to_section(section_id: &str) {
        with_app(|app| app.run(crate::page::Command::ScrollTo(section_id.to_owned())));
    }

    /// Redraws the still previews.
    #[wasm_bindgen]
    pub fn initialize_animations() {
        with_app(|app| app.player().preview_all());
    }
}

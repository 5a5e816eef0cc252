//! Browser entry point for the widget.

pub mod dom;

use wasm_bindgen::prelude::*;

use crate::config::WidgetConfig;

/// Runs when the module is instantiated; binds with the default config.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    if let Err(err) = dom::start(WidgetConfig::default()) {
        web_sys::console::error_1(&JsValue::from_str(&format!("shortlist widget: {err}")));
    }
}

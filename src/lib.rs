// ==================== Modules ====================
#[macro_use]
mod browser;
pub mod engine;
pub mod entity;
pub mod game;
pub mod world;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use crate::engine::GameLoop;
use crate::game::GemCrossing;

// ==================== Main Functions ====================
/// Main entry for the Webassembly module
/// - installs the panic hook
/// - kicks off asset loading and starts the game loop once it completes
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // spawns a new asynchronous task on the local thread, for the web
    // assembly environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        GameLoop::start(GemCrossing::new())
            .await
            .expect("Could not start game loop");
    });

    Ok(())
}

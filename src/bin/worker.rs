use launch_countdown::{logging, sw};
use log::error;
use wasm_bindgen::JsCast;
use web_sys::ServiceWorkerGlobalScope;

fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    logging::init();

    let scope: ServiceWorkerGlobalScope = js_sys::global().unchecked_into();
    if let Err(err) = sw::register(scope) {
        error!("Service worker not registered: {:?}", err);
    }
}

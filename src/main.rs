//! Countdown page entry point.
//! Resolves the page elements, then ticks the renderer once per second until
//! the target passes.

use futures::StreamExt;
use gloo_timers::future::IntervalStream;
use launch_countdown::{
    config::{TARGET_INSTANT, TICK_INTERVAL_MS},
    dom::DomDisplay,
    error::BootError,
    logging, Countdown, Renderer, Tick,
};
use log::{error, info};

fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

fn boot() -> Result<Renderer<DomDisplay>, Box<dyn std::error::Error>> {
    let countdown = Countdown::from_rfc3339(TARGET_INSTANT)?;
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(BootError::NoWindow)?;
    let display = DomDisplay::from_document(&document)?;
    Ok(Renderer::new(countdown, display))
}

/// Tick immediately, then on every interval until the countdown finishes.
/// Leaving the loop drops the interval stream, which clears the timer.
async fn run(mut renderer: Renderer<DomDisplay>) {
    let mut rng = rand::rng();
    if renderer.tick(now_ms(), &mut rng) == Tick::Finished {
        return;
    }

    let mut ticks = IntervalStream::new(TICK_INTERVAL_MS);
    while ticks.next().await.is_some() {
        if renderer.tick(now_ms(), &mut rng) == Tick::Finished {
            break;
        }
    }
    info!("Countdown timer stopped");
}

fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    match boot() {
        Ok(renderer) => wasm_bindgen_futures::spawn_local(run(renderer)),
        Err(err) => error!("Countdown not started: {}", err),
    }
}

//! Console logger shared by the page and the worker.

use crate::config::LOG_LEVEL;

/// Route the `log` facade to the browser console. Safe to call more than once.
pub fn init() {
    if console_log::init_with_level(LOG_LEVEL).is_err() {
        log::debug!("Console logger already installed");
    }
}

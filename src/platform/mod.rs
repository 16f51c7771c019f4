//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backend (console on web, env_logger natively)
//! - Storage (LocalStorage on web, `FileStore` natively)

/// Install the platform logger. Safe to call more than once.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::try_init();
    }
}

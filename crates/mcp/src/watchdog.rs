//! Test-mode watchdog: terminates the process after a fixed delay.

use std::io;
use std::process;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::error;

pub const WATCHDOG_EXIT_CODE: i32 = 1;

/// Exit the process with [`WATCHDOG_EXIT_CODE`] once `delay` has elapsed.
pub fn arm(delay: Duration) -> io::Result<JoinHandle<()>> {
    spawn_with(delay, move || {
        error!(delay_secs = delay.as_secs(), "watchdog expired, terminating");
        process::exit(WATCHDOG_EXIT_CODE);
    })
}

/// Run `on_expire` on a background thread after `delay`.
pub fn spawn_with<F>(delay: Duration, on_expire: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name("watchdog".to_string())
        .spawn(move || {
            thread::sleep(delay);
            on_expire();
        })
}

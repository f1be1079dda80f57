use std::sync::Mutex;

use cadgen_core::ProgressSink;
use tracing::{debug, info};

/// Reports job progress through the log.
///
/// A message is logged at `info` the first time it appears and at `debug`
/// while it repeats, so a long poll loop does not flood the terminal.
#[derive(Debug, Default)]
pub struct LogProgress {
    last_message: Mutex<Option<String>>,
}

impl ProgressSink for LogProgress {
    fn report(&self, fraction: f32, message: &str) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as u32;

        let repeated = match self.last_message.lock() {
            Ok(mut last) => {
                let repeated = last.as_deref() == Some(message);
                if !repeated {
                    *last = Some(message.to_string());
                }
                repeated
            }
            Err(_) => false,
        };

        if repeated {
            debug!(progress = percent, "{message}");
        } else {
            info!(progress = percent, "{message}");
        }
    }
}

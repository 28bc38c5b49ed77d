//! Browser console logging
//!
//! Formats `tracing` events with the fmt subscriber and forwards each
//! line to `console.log` / `console.warn` / `console.error`.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String, // filter directive, e.g. "info" or "storefront_common=debug"
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Install the console subscriber and the panic hook
    pub fn init(&self) -> Result<(), Box<dyn std::error::Error>> {
        console_error_panic_hook::set_once();

        let env_filter = EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"));

        // No timestamps: wasm32 has no system clock
        let console_layer = fmt::layer()
            .with_target(self.with_target)
            .with_level(true)
            .with_ansi(false)
            .without_time()
            .with_writer(ConsoleWriter::default);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init()?;

        tracing::info!("Logging initialized - level: {}", self.level);

        Ok(())
    }

    pub fn init_default() -> Result<(), Box<dyn std::error::Error>> {
        Self::default().init()
    }
}

/// Buffers one formatted event, written to the console on drop
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }

        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();

        if line.starts_with("ERROR") {
            web_sys::console::error_1(&line.into());
        } else if line.starts_with(" WARN") || line.starts_with("WARN") {
            web_sys::console::warn_1(&line.into());
        } else {
            web_sys::console::log_1(&line.into());
        }
    }
}

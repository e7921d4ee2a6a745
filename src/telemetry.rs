//! `tracing` subscriber setup.
//!
//! In the browser, formatted lines go to the devtools console at the
//! matching level; on the host they go to stderr.

use tracing::Level;

/// Installs the global subscriber. A second call is a no-op.
pub fn init(max_level: Level) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false);

    #[cfg(target_arch = "wasm32")]
    let result = builder
        .without_time()
        .with_ansi(false)
        .with_writer(console::ConsoleMakeWriter)
        .try_init();

    #[cfg(not(target_arch = "wasm32"))]
    let result = builder.with_writer(std::io::stderr).try_init();

    if result.is_err() {
        tracing::trace!("subscriber already installed");
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    pub struct ConsoleMakeWriter;

    /// Buffers one formatted event and hands it to `console.*` on drop.
    pub struct ConsoleWriter {
        level: Level,
        buf: Vec<u8>,
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter {
                level: Level::INFO,
                buf: Vec::new(),
            }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter {
                level: *meta.level(),
                buf: Vec::new(),
            }
        }
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(bytes);
            Ok(bytes.len())
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
            let line = JsValue::from_str(line.trim_end());
            let level = self.level;
            if level == Level::ERROR {
                web_sys::console::error_1(&line);
            } else if level == Level::WARN {
                web_sys::console::warn_1(&line);
            } else if level == Level::INFO {
                web_sys::console::info_1(&line);
            } else if level == Level::DEBUG {
                web_sys::console::debug_1(&line);
            } else {
                web_sys::console::log_1(&line);
            }
        }
    }
}

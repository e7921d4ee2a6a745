//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` on a local HTTP server.

use std::process::{Command, ExitCode, Stdio};
use std::{thread, time::Duration};

use tracing::Level;

const PORT: &str = "8000";

fn main() -> ExitCode {
    math_anim_wasm::telemetry::init(Level::INFO);

    tracing::info!("building WASM pkg");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            tracing::error!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            tracing::warn!("wasm-pack not found in PATH. Skipping wasm build; the page may serve stale artifacts.");
        }
    }

    tracing::info!("serving static/ at http://127.0.0.1:{PORT}");
    let server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(err) => {
            tracing::error!(%err, "failed to start http server");
            return ExitCode::FAILURE;
        }
    };

    // Keep process alive while the server runs
    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                tracing::warn!(%status, "http server exited");
                return ExitCode::FAILURE;
            }
            Ok(None) => thread::sleep(Duration::from_secs(5)),
            Err(err) => {
                tracing::error!(%err, "lost track of http server");
                return ExitCode::FAILURE;
            }
        }
    }
}

//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` on a local port (`FOLIO_PORT`, default 8000).

use std::process::{Command, ExitCode, Stdio};
use std::{env, thread, time::Duration};

const DEFAULT_PORT: &str = "8000";

fn main() -> ExitCode {
    // Only meaningful on non-wasm targets.
    if cfg!(target_arch = "wasm32") {
        return ExitCode::SUCCESS;
    }

    // 1. Compile wasm via wasm-pack into static/pkg
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .env("FOLIO_WASM_PACK", "1")
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    // 2. Serve `static/`
    let port = env::var("FOLIO_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    println!("Launching local server at http://127.0.0.1:{port} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(e) => {
            eprintln!("failed to start http server: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Keep process alive while the server runs
    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                eprintln!("http server exited: {status}");
                return ExitCode::FAILURE;
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(e) => {
                eprintln!("lost track of http server: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
}

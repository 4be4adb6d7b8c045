// Copies static assets to `dist/`, building the wasm package first when
// targeting wasm32.
use std::process::Command;
use std::{env, path::Path};

use fs_extra::dir::{self, CopyOptions};

/// Set on the nested wasm-pack run so it does not start another one.
const NESTED: &str = "FOLIO_WASM_PACK";

fn main() {
    println!("cargo:rerun-if-changed=static");
    println!("cargo:rerun-if-env-changed={NESTED}");

    let target = env::var("TARGET").unwrap_or_default();
    if target == "wasm32-unknown-unknown" && env::var_os(NESTED).is_none() {
        // wasm-pack is assumed available. If not, emit warning.
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .env(NESTED, "1")
            .status();

        match status {
            Ok(st) if st.success() => {}
            Ok(_) => println!("cargo:warning=wasm-pack build failed"),
            Err(_) => println!("cargo:warning=wasm-pack not installed - skipping"),
        }
    }

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }
    let out_dir = Path::new("dist");
    if out_dir.exists() {
        if let Err(e) = dir::remove(out_dir) {
            println!("cargo:warning=could not clear dist/: {e}");
        }
    }
    let options = CopyOptions { content_only: true, ..CopyOptions::new() };
    if let Err(e) = dir::create_all(out_dir, false).and_then(|_| dir::copy(static_dir, out_dir, &options)) {
        println!("cargo:warning=copying static/ to dist/ failed: {e}");
    }
}

use std::env;

const VERSION_VAR: &str = "SHIP_CLASSIFIER_VERSION";

// Release builds may stamp a version; otherwise the crate version is used.
fn main() {
    println!("cargo:rerun-if-env-changed={VERSION_VAR}");
    let stamped = env::var(VERSION_VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let version = match stamped {
        Some(v) => v,
        None => env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "dev".to_string()),
    };
    println!("cargo:rustc-env={VERSION_VAR}={version}");
}

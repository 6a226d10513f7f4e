//! Exposes the compiler version to the `process` detector.
use std::{env, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUSTC");

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let Some(description) = Command::new(rustc)
        .arg("-V")
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|stdout| stdout.trim().to_string())
        .filter(|stdout| !stdout.is_empty())
    else {
        return;
    };

    println!("cargo:rustc-env=RUSTC_VERSION_DESCRIPTION={description}");

    // "rustc 1.76.0 (07dca489a 2024-02-04)" -> "1.76.0"
    if let Some(version) = description.split_whitespace().nth(1) {
        println!("cargo:rustc-env=RUSTC_VERSION={version}");
    }
}

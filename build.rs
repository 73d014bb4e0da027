//! Build script for the tracker firmware
//!
//! Handles:
//! - Linker scripts for the firmware binary (`memory.x` comes from
//!   embassy-stm32's `memory-x` feature)

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host test builds link nothing special
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

// File: crates/barline-core/build.rs
// Summary: Build script to link required Windows system libraries when the Skia renderer is enabled.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let skia = std::env::var_os("CARGO_FEATURE_SKIA").is_some();
    let windows = std::env::var("CARGO_CFG_TARGET_OS").map(|os| os == "windows").unwrap_or(false);
    if skia && windows {
        // Needed for RegOpenKeyExW, RegQueryInfoKeyW, etc.
        println!("cargo:rustc-link-lib=advapi32");
    }
}

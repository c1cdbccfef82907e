// Build script to link the native Blu-ray library and generate its bindings when requested

#[cfg(feature = "libbluray")]
use std::path::{Path, PathBuf};

/// Emit link directives for libbluray
#[cfg(feature = "libbluray")]
fn link_libbluray() {
    // Allow a non-standard install location, e.g. a Homebrew or MSYS2 prefix
    let lib_dir = std::env::var("LIBBLURAY_LIB_DIR").ok();
    let static_link = std::env::var("LIBBLURAY_STATIC").is_ok();

    match lib_dir {
        Some(dir) if Path::new(&dir).is_dir() => {
            println!("cargo:rustc-link-search=native={}", dir);
        }
        Some(dir) => {
            println!("cargo:warning=LIBBLURAY_LIB_DIR '{}' is not a directory, ignoring", dir);
        }
        None => {}
    }

    if static_link {
        println!("cargo:rustc-link-lib=static=bluray");
    } else {
        println!("cargo:rustc-link-lib=bluray");
    }
}

/// Generate Rust declarations for the bd_* API from bluray.h
#[cfg(feature = "libbluray")]
fn generate_bindings() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let mut builder = bindgen::Builder::default()
        .header("src/native/libbluray_wrapper.h")
        .allowlist_function("bd_.*")
        .allowlist_type("BLURAY_.*")
        .allowlist_var("BLURAY_.*")
        .generate_comments(false)
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()));

    // Headers outside the default search path, e.g. /opt/homebrew/include
    if let Ok(include_dir) = std::env::var("LIBBLURAY_INCLUDE_DIR") {
        builder = builder.clang_arg(format!("-I{}", include_dir));
    }

    builder
        .generate()
        .expect("Unable to generate libbluray bindings")
        .write_to_file(out_dir.join("libbluray_bindings.rs"))
        .expect("Couldn't write libbluray bindings");
}

fn main() {
    println!("cargo:rerun-if-env-changed=LIBBLURAY_LIB_DIR");
    println!("cargo:rerun-if-env-changed=LIBBLURAY_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=LIBBLURAY_STATIC");
    println!("cargo:rerun-if-changed=src/native/libbluray_wrapper.h");

    // Only link when the binding is actually compiled in
    #[cfg(feature = "libbluray")]
    {
        generate_bindings();
        link_libbluray();
    }
}

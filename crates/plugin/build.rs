use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    // Generate C header from Rust exports
    let include_dir = manifest_dir.join("include");
    let output_path = include_dir.join("tracehook.h");
    if let Err(e) = std::fs::create_dir_all(&include_dir) {
        println!("cargo:warning=Failed to create {}: {}", include_dir.display(), e);
        return;
    }

    let config = cbindgen::Config::from_file(manifest_dir.join("cbindgen.toml")).unwrap_or_default();

    match cbindgen::Builder::new()
        .with_crate(&manifest_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&output_path);
        }
        Err(e) => {
            println!("cargo:warning=Failed to generate tracehook.h: {}", e);
        }
    }
}

use std::env;
use std::path::PathBuf;

/// Optional directory to copy the generated header into, e.g. for a C
/// project consuming the library. Unset by default so builds only write
/// under `OUT_DIR`.
const HEADER_DIR_VAR: &str = "TODOLIST_HEADER_DIR";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-env-changed={HEADER_DIR_VAR}");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        println!("cargo:warning=header generation skipped: cargo build environment missing");
        return;
    };
    let crate_dir = PathBuf::from(crate_dir);

    let config = cbindgen::Config::from_root_or_default(&crate_dir);
    let bindings = match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=header generation skipped: {err}");
            return;
        }
    };

    bindings.write_to_file(PathBuf::from(out_dir).join("todolist.h"));

    if let Ok(dir) = env::var(HEADER_DIR_VAR) {
        let dir = PathBuf::from(dir);
        if let Err(err) = std::fs::create_dir_all(&dir) {
            println!("cargo:warning=cannot create {}: {err}", dir.display());
            return;
        }
        bindings.write_to_file(dir.join("todolist.h"));
    }
}

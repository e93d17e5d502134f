use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=RUSTC");
    println!("cargo:rerun-if-env-changed=JVPY_HOST_NAME_OVERRIDE");

    let host_name = env::var("JVPY_HOST_NAME_OVERRIDE")
        .ok()
        .or_else(rustc_version)
        .unwrap_or_else(|| "unknown runtime".to_string());

    println!("cargo:rustc-env=JVPY_BUILD_HOST_NAME={}", host_name);
}

fn rustc_version() -> Option<String> {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let output = Command::new(rustc).arg("--version").output().ok()?;

    if !output.status.success() {
        return None;
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let label = raw.trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

use std::process::Command;

fn main() {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!(
        "cargo:rustc-env=WEBRSS_LONG_VERSION={} (git {}, built {})",
        env!("CARGO_PKG_VERSION"),
        git_hash,
        timestamp
    );
    println!("cargo:rerun-if-changed=build.rs");
}

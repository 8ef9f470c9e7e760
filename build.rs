use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let package = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();

    let version = match git_tag() {
        Some(tag) => tag,
        None => match git_hash() {
            Some(hash) => format!("{}-{}", package, hash),
            None => package,
        },
    };

    println!("cargo:rustc-env=BUILD_VERSION={}", version);
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn git_hash() -> Option<String> {
    git_output(&["rev-parse", "--short", "HEAD"])
}

fn git_tag() -> Option<String> {
    git_output(&["describe", "--tags", "--exact-match"])
}

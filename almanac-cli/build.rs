use std::path::Path;
use std::process::Command;

/// Short commit hash of the checkout this crate sits in.
fn git_sha(repo: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?;
    let sha = sha.trim();
    (!sha.is_empty()).then(|| sha.to_owned())
}

fn main() {
    let manifest = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default();
    let repo = Path::new(&manifest).join("..");

    // Rebuild when the checked-out commit moves.
    println!("cargo:rerun-if-changed={}", repo.join(".git/HEAD").display());
    println!("cargo:rerun-if-changed=build.rs");

    let sha = git_sha(&repo).unwrap_or_else(|| "nogit".to_owned());
    println!("cargo:rustc-env=ALMANAC_BUILD_SHA={sha}");
}

use std::path::Path;
use std::process::Command;

/// `git describe` output for the workspace checkout, if there is one.
fn describe(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    let manifest = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into());
    let workspace = Path::new(&manifest).join("..");

    let revision = describe(&workspace).unwrap_or_else(|| "no-git".to_string());
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());

    println!("cargo:rustc-env=TALLY_GIT_DESCRIBE={revision}");
    println!("cargo:rustc-env=TALLY_BUILD_TARGET={target}");

    let git_dir = workspace.join(".git");
    for watched in ["HEAD", "index"] {
        let path = git_dir.join(watched);
        if path.exists() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}

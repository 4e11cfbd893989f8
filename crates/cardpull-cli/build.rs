use chrono::Utc;
use std::process::Command;

/// Stamp `BUILD_HASH` for `cardpull --version`: the short commit, plus a
/// UTC build time when the tree has local changes.
fn main() {
    let describe = git(&["describe", "--always", "--dirty=-dirty"]);

    let build_hash = match describe {
        Some(desc) if desc.ends_with("-dirty") => {
            format!("{desc}-{}", Utc::now().format("%Y%m%d-%H%M%S"))
        }
        Some(desc) => desc,
        None => "unknown".to_string(),
    };

    println!("cargo:rustc-env=BUILD_HASH={build_hash}");

    // Workspace root is two levels up
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}

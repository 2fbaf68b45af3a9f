use std::{
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=THOMAS_VERSION_OVERRIDE");

    if let Ok(version) = std::env::var("THOMAS_VERSION_OVERRIDE") {
        println!("cargo:rustc-env=THOMAS_VERSION={}", version);
        return;
    }

    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output();

    let version = match output {
        Ok(o) if o.status.success() => {
            let git_output = String::from_utf8(o.stdout)
                .unwrap_or_default()
                .trim()
                .to_string();

            // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
            let version = git_output.strip_prefix('v').unwrap_or(&git_output);

            if version.ends_with("-dirty") || version.is_empty() {
                format!("{}-{}", version, timestamp())
            } else {
                version.to_string()
            }
        }
        // Not a git checkout (e.g. a source tarball)
        _ => format!("{}-unknown", env!("CARGO_PKG_VERSION")),
    };

    println!("cargo:rustc-env=THOMAS_VERSION={}", version);
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

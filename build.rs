use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=RELCHECK_BUILD_VERSION");

    // Packagers can pin the version without a git checkout
    if let Ok(pinned) = std::env::var("RELCHECK_BUILD_VERSION") {
        println!("cargo:rustc-env=RELCHECK_VERSION={}", pinned);
        return;
    }

    let output = Command::new("git")
        .args(["describe", "--tags", "--always"])
        .output();

    let version = match output {
        Ok(o) if o.status.success() => {
            let git_output = String::from_utf8(o.stdout)
                .unwrap_or_default()
                .trim()
                .to_string();

            // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
            let version = git_output.strip_prefix('v').unwrap_or(&git_output);

            if version.is_empty() {
                "0.0.0-unknown".to_string()
            } else {
                version.to_string()
            }
        }
        _ => "0.0.0-unknown".to_string(),
    };

    println!("cargo:rustc-env=RELCHECK_VERSION={}", version);
}

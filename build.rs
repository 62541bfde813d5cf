//! Build script for the Living Map server
//!
//! Embeds git revision, build timestamp, target and compiler version
//! so `living-map version` can report exactly what is running.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let git_hash = git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let git_branch =
        git(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let git_dirty = match git(&["status", "--porcelain"]) {
        Some(out) if !out.is_empty() => "true",
        Some(_) => "false",
        None => "unknown",
    };

    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let rustc_version = command_output("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=LIVING_MAP_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=LIVING_MAP_GIT_BRANCH={}", git_branch);
    println!("cargo:rustc-env=LIVING_MAP_GIT_DIRTY={}", git_dirty);
    println!("cargo:rustc-env=LIVING_MAP_BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=LIVING_MAP_TARGET={}", target);
    println!("cargo:rustc-env=LIVING_MAP_PROFILE={}", profile);
    println!("cargo:rustc-env=LIVING_MAP_RUSTC_VERSION={}", rustc_version);
}

/// Run a git subcommand and return its trimmed stdout
fn git(args: &[&str]) -> Option<String> {
    command_output("git", args)
}

/// Run a command and return its trimmed stdout if it succeeded
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
}

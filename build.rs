use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PARTICIPATION_BUILD_ID");

    // A pinned id makes report builds reproducible; otherwise stamp the build time.
    let build_id = env::var("PARTICIPATION_BUILD_ID")
        .ok()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs().to_string())
                .unwrap_or_else(|_| "dev".to_string())
        });
    println!("cargo:rustc-env=PARTICIPATION_BUILD_ID={}", build_id);
}

use std::path::{Path, PathBuf};
use std::process::Output;

use tokio::process::Command;
use wiremock::MockServer;

/// Credential file used by every CLI invocation under `home`.
pub fn credentials_path(home: &Path) -> PathBuf {
    home.join("credentials.json")
}

/// Seed the credential file as if a previous login had stored it.
pub fn write_credentials(home: &Path, access_token: &str, refresh_token: Option<&str>) {
    let mut stored = serde_json::json!({ "accessToken": access_token });
    if let Some(refresh_token) = refresh_token {
        stored["refreshToken"] = refresh_token.into();
    }
    std::fs::write(credentials_path(home), stored.to_string()).unwrap();
}

pub fn read_credentials(home: &Path) -> Option<serde_json::Value> {
    let raw = std::fs::read_to_string(credentials_path(home)).ok()?;
    Some(serde_json::from_str(&raw).unwrap())
}

/// Base URL for the mock backend, with the `/api` prefix.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Run the CLI with an isolated HOME and credential file.
pub async fn run_cli(args: &[&str], home: &Path, base_url: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_medsafe"))
        .args(args)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env("MEDSAFE_CREDENTIALS_FILE", credentials_path(home))
        .env("API_BASE_URL", base_url)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("RUST_LOG")
        .env_remove("MEDSAFE_PASSWORD")
        .output()
        .await
        .expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_cli_success(args: &[&str], home: &Path, base_url: &str) -> String {
    let output = run_cli(args, home, base_url).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

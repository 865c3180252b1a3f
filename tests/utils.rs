use anyhow::Result;
use assert_cmd::Command;
use std::path::PathBuf;
use uuid::Uuid;

pub fn rand_file_name() -> String {
    "electric-cli-".to_string() + &Uuid::new_v4().to_string() + ".txt"
}

pub fn write_temp_input(contents: &str) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(rand_file_name());
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// The binary with every environment fallback it reads removed.
pub fn electric_cli() -> Command {
    let mut command = Command::cargo_bin("electric-cli").unwrap();
    for var in [
        "ELECTRIC_HOST",
        "ELECTRIC_HTTP_PORT",
        "ELECTRIC_PG_PROXY_PORT",
        "ELECTRIC_PG_PROXY_USER",
        "ELECTRIC_PG_PROXY_PASSWORD",
        "ELECTRIC_DATABASE_NAME",
        "RUST_LOG",
    ] {
        command.env_remove(var);
    }
    command
}

pub fn stdout_of(command: &mut Command) -> String {
    let out = command.assert().success().get_output().stdout.clone();
    String::from_utf8(out).unwrap()
}

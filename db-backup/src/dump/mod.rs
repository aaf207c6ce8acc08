//! Native dump path: invoke `pg_dump` and capture its output verbatim.
//!
//! The utility's availability is probed before any connection attempt; its
//! stdout is redirected straight into the timestamped SQL artifact.

pub mod password;

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::config::Config;
use crate::utils::errors::BackupError;
use password::PasswordSource;

const PG_DUMP: &str = "pg_dump";

/// Verify the dump utility is on PATH.
///
/// Absence is fatal and the message names how to install it.
pub async fn check_pg_dump() -> crate::Result<()> {
    probe_tool(PG_DUMP).await
}

async fn probe_tool(program: &str) -> crate::Result<()> {
    let result = Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match result {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(BackupError::DumpTool(format!(
            "{} --version exited with {}",
            program, status
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BackupError::DumpTool(format!(
                "{} is not available. Install the PostgreSQL client tools:\n  \
                 macOS: brew install postgresql\n  \
                 Ubuntu/Debian: sudo apt-get install postgresql-client\n  \
                 Windows: https://www.postgresql.org/download/",
                program
            )))
        }
        Err(e) => Err(BackupError::Io(e)),
    }
}

/// Run a full structure+data dump into `{dir}/{prefix}_{timestamp}.sql`.
///
/// Drop-and-recreate semantics, ownership and privilege statements stripped.
/// The password comes from configuration or the injected fallback source.
pub async fn run(
    config: &Config,
    prompt: &dyn PasswordSource,
    run_timestamp: &str,
) -> crate::Result<PathBuf> {
    check_pg_dump().await?;

    let db = &config.database;
    let password = password::resolve_password(db, prompt)?;

    let dir = &config.backup.dir;
    tokio::fs::create_dir_all(dir).await?;
    let dump_path = dir.join(format!("{}_{}.sql", config.backup.prefix, run_timestamp));

    tracing::info!(
        "Running {} against {}:{}/{}",
        PG_DUMP,
        db.host,
        db.port,
        db.name
    );

    let outfile = std::fs::File::create(&dump_path)?;

    let mut child = Command::new(PG_DUMP)
        .arg(format!("--host={}", db.host))
        .arg(format!("--port={}", db.port))
        .arg(format!("--username={}", db.user))
        .arg(format!("--dbname={}", db.name))
        .arg("--no-password")
        .arg("--clean")
        .arg("--if-exists")
        .arg("--create")
        .arg("--no-owner")
        .arg("--no-privileges")
        .env("PGPASSWORD", &password)
        .stdout(Stdio::from(outfile))
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        pipe.read_to_string(&mut stderr).await?;
    }
    let status = child.wait().await?;

    if !status.success() {
        return Err(BackupError::DumpTool(format!(
            "{} exited with {}: {}",
            PG_DUMP,
            status,
            stderr.trim()
        )));
    }

    let metadata = tokio::fs::metadata(&dump_path).await?;
    tracing::info!(
        "Wrote {} ({:.2} MB)",
        dump_path.display(),
        metadata.len() as f64 / 1024.0 / 1024.0
    );

    // Basic sanity check on the produced dump
    let content = tokio::fs::read_to_string(&dump_path).await?;
    if content.contains("CREATE TABLE") || content.contains("INSERT INTO") {
        tracing::info!("Dump contains schema and/or data statements");
    } else {
        tracing::warn!("Dump contains no CREATE TABLE or INSERT INTO statements");
    }

    Ok(dump_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_tool_present() {
        // `true` exists on any unix test host and exits 0
        assert!(probe_tool("true").await.is_ok());
    }

    #[tokio::test]
    async fn test_probe_tool_absent_names_install_hint() {
        let err = probe_tool("definitely-not-a-real-dump-tool").await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("not available"));
        assert!(message.contains("Install the PostgreSQL client tools"));
    }
}

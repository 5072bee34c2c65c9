//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use koinfo_server::{ServerConfig, ALLOWED_ORIGINS_ENV};

use super::open_ledger;

pub async fn cmd_serve(
    data_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Koinfo web server...");
    println!("   Data file: {}", data_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let ledger = open_ledger(data_path)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    koinfo_server::serve(ledger, host, port, static_dir_str, config).await?;

    Ok(())
}

use std::path::PathBuf;

use analyzer::runtime::{boot, pipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        return Err("usage: analyzer <file>...".into());
    }

    let (state, config) = boot::boot().await?;
    let bundle = pipeline::run(&state, &paths).await?;
    pipeline::emit(&bundle, &config).await?;
    Ok(())
}

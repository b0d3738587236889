use anyhow::Result;

pub fn cmd_version() -> Result<()> {
    println!("locator-forge {}", env!("CARGO_PKG_VERSION"));
    println!("Build date: {}", env!("BUILD_DATE"));
    println!("Git hash: {}", env!("GIT_HASH"));
    Ok(())
}

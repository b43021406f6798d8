//! Designer Agent - Entry Point

use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let (cli, ignored) = match designer_agent::parse_args(std::env::args()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };
    let code = designer_agent::run(cli, &ignored).await?;
    Ok(ExitCode::from(code))
}

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{level_from_verbosity, LogDestination};

use pdfsqueeze_web::cli::{Args, Command};

fn main() -> Result<()> {
    let args = Args::parse();

    let destination = match &args.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, level_from_verbosity(args.verbose));

    match args.command {
        Command::Serve(serve) => {
            let config = serve.into_config();
            let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            runtime.block_on(pdfsqueeze_web::serve(config))
        }
        Command::Compress(compress) => {
            let written = pdfsqueeze_web::compress_file(&compress)?;
            println!("{}", written.display());
            Ok(())
        }
    }
}

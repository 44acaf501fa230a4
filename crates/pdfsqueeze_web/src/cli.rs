use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use pdfsqueeze_core::Preset;
use pdfsqueeze_engine::{default_program, ToolSettings};

use crate::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "pdfsqueeze")]
#[command(
    author,
    version,
    about = "Upload a PDF, choose a compression level and download the smaller file"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true, env = "PDFSQUEEZE_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web front-end
    Serve(ServeArgs),
    /// Compress a single file from the command line
    Compress(CompressArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ToolArgs {
    /// Ghostscript executable
    #[arg(long = "tool", env = "PDFSQUEEZE_GS", default_value = default_program())]
    pub program: PathBuf,

    /// Directory for temporary input and output files (defaults to the system temp dir)
    #[arg(long, env = "PDFSQUEEZE_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Kill the tool after this many seconds (0 waits forever)
    #[arg(long, env = "PDFSQUEEZE_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Maximum simultaneous tool processes (0 is unlimited)
    #[arg(long, env = "PDFSQUEEZE_MAX_CONCURRENT", default_value_t = 4)]
    pub max_concurrent: usize,
}

impl ToolArgs {
    pub fn to_settings(&self) -> ToolSettings {
        ToolSettings {
            program: self.program.clone(),
            scratch_dir: self
                .scratch_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            max_concurrent: self.max_concurrent,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "PDFSQUEEZE_BIND", default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// Largest accepted upload, in MiB
    #[arg(long, env = "PDFSQUEEZE_MAX_UPLOAD_MB", default_value_t = 64)]
    pub max_upload_mb: usize,

    /// Forget sessions idle for this many seconds
    #[arg(long, env = "PDFSQUEEZE_SESSION_TTL_SECS", default_value_t = 1800)]
    pub session_ttl_secs: u64,

    #[command(flatten)]
    pub tool: ToolArgs,
}

impl ServeArgs {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            max_upload_bytes: self.max_upload_mb.saturating_mul(1024 * 1024),
            session_ttl: Duration::from_secs(self.session_ttl_secs),
            tool: self.tool.to_settings(),
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct CompressArgs {
    /// Input PDF file path
    #[arg(required = true)]
    pub input: PathBuf,

    /// Compression preset: ebook, screen, printer or prepress
    #[arg(short, long, default_value = "ebook", value_parser = parse_preset)]
    pub preset: Preset,

    /// Output file path (defaults to compressed_<input name> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,
}

fn parse_preset(raw: &str) -> Result<Preset, String> {
    raw.parse::<Preset>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let args = Args::try_parse_from(["pdfsqueeze", "serve"]).unwrap();
        let Command::Serve(serve) = args.command else {
            panic!("expected serve");
        };
        let config = serve.into_config();
        assert_eq!(config.bind, "127.0.0.1:8501".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_upload_bytes, 64 * 1024 * 1024);
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
        assert_eq!(config.tool.timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.tool.max_concurrent, 4);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let args =
            Args::try_parse_from(["pdfsqueeze", "serve", "--timeout-secs", "0", "--tool", "/opt/gs"])
                .unwrap();
        let Command::Serve(serve) = args.command else {
            panic!("expected serve");
        };
        let settings = serve.tool.to_settings();
        assert_eq!(settings.timeout, None);
        assert_eq!(settings.program, PathBuf::from("/opt/gs"));
    }

    #[test]
    fn compress_rejects_unknown_preset() {
        let result =
            Args::try_parse_from(["pdfsqueeze", "compress", "in.pdf", "--preset", "tiny"]);
        assert!(result.is_err());

        let args =
            Args::try_parse_from(["pdfsqueeze", "compress", "in.pdf", "-p", "prepress", "-v"])
                .unwrap();
        assert_eq!(args.verbose, 1);
        let Command::Compress(compress) = args.command else {
            panic!("expected compress");
        };
        assert_eq!(compress.preset, Preset::Prepress);
        assert_eq!(compress.output, None);
    }
}

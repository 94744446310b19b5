use std::path::PathBuf;

use clap::Parser;

/// voxhook text-to-speech proxy
#[derive(Debug, Parser)]
#[command(name = "voxhook", about = "Same-origin proxy for a text-to-speech webhook")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "voxhook.toml", env = "VOXHOOK_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "VOXHOOK_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Log filter in `RUST_LOG` syntax
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_filter: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn listen_override() {
        let args = Args::try_parse_from(["voxhook", "--config", "dev.toml", "--listen", "127.0.0.1:4000"]).unwrap();

        assert_eq!(args.config, PathBuf::from("dev.toml"));
        assert_eq!(args.listen, Some("127.0.0.1:4000".parse().unwrap()));
    }
}

mod config;
mod query;
mod shell;
mod view;

use clap::{Args, Parser, Subcommand};
use gremlab_core::GremlabConfig;
use std::path::PathBuf;

pub use view::OutputFormat;

#[derive(Parser)]
#[command(
    name = "gremlab",
    version,
    about = "Query a Gremlin server and look at the results as tables, JSON or charts",
    long_about = "gremlab opens a traversal handle to a remote Gremlin Server over WebSocket, \
                  evaluates Gremlin scripts and presents the results as a text table, \
                  plain JSON, or SVG pie and bar charts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection options shared by every command that talks to a server.
#[derive(Args, Clone, Debug)]
pub struct ConnectionArgs {
    /// Gremlin server host (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,
    /// Gremlin server port (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,
    /// Remote traversal source bound to `g`
    #[arg(long)]
    pub source: Option<String>,
    /// Config file to read instead of ~/.gremlab/config.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Config file values with command line overrides applied.
    pub fn resolve(&self) -> gremlab_core::Result<GremlabConfig> {
        let mut config = gremlab_runtime::load_config(self.config.as_deref())?;
        if let Some(host) = &self.host {
            config.connection.host = host.clone();
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if let Some(source) = &self.source {
            config.connection.traversal_source = source.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a Gremlin script and print the result
    #[command(
        long_about = "Submits SCRIPT to the server, waits for every result frame and prints \
                      the result in the chosen format. Charts need a map-shaped result such \
                      as the one produced by groupCount(); use --first to unwrap it."
    )]
    Query {
        /// Gremlin-Groovy script, e.g. "g.V().groupCount().by(label)"
        #[arg(value_name = "SCRIPT")]
        script: String,
        #[command(flatten)]
        connection: ConnectionArgs,
        /// How to present the result
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Keep only the first result item, like next()
        #[arg(long)]
        first: bool,
    },
    /// Start an interactive shell connected to a Gremlin server
    Shell {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// Print the effective configuration
    Config {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Shell { .. } => "shell",
        _ => "cli",
    };
    let _guard = gremlab_runtime::init_logging(component, false);

    match cli.command {
        Commands::Query {
            script,
            connection,
            format,
            first,
        } => query::run(&script, &connection.resolve()?, format, first),
        Commands::Shell { connection } => shell::run(connection.resolve()?),
        Commands::Config { connection } => config::run(&connection.resolve()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_arguments() {
        let cli = Cli::try_parse_from([
            "gremlab",
            "query",
            "g.V().count()",
            "--host",
            "graph.local",
            "--port",
            "8182",
            "--format",
            "json",
            "--first",
        ])
        .unwrap();

        match cli.command {
            Commands::Query {
                script,
                connection,
                format,
                first,
            } => {
                assert_eq!(script, "g.V().count()");
                assert_eq!(connection.host.as_deref(), Some("graph.local"));
                assert_eq!(connection.port, Some(8182));
                assert_eq!(format, OutputFormat::Json);
                assert!(first);
            }
            _ => panic!("expected the query command"),
        }
    }

    #[test]
    fn test_overrides_apply_on_top_of_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let args = ConnectionArgs {
            host: Some("db".to_string()),
            port: Some(8182),
            source: None,
            config: Some(path),
        };

        let config = args.resolve().unwrap();
        assert_eq!(config.connection.host, "db");
        assert_eq!(config.connection.port, 8182);
        assert_eq!(config.connection.traversal_source, "g");
    }

    #[test]
    fn test_zero_port_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let args = ConnectionArgs {
            host: None,
            port: Some(0),
            source: None,
            config: Some(path),
        };
        assert!(args.resolve().is_err());
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kennel")]
#[command(author, version, about = "Photograph records for a dog breeder registry")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,

    /// Register a dog so photographs can be attached to it
    AddDog {
        /// Name of the dog
        name: String,
    },

    /// List registered dogs
    Dogs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_overrides() {
        let cli = Cli::parse_from(["kennel", "-v", "start", "--port", "9000"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Start { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn parses_add_dog_with_global_config() {
        let cli = Cli::parse_from(["kennel", "add-dog", "Bolacha", "--config", "k.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("k.json")));
        assert!(matches!(cli.command, Commands::AddDog { ref name } if name == "Bolacha"));
    }
}

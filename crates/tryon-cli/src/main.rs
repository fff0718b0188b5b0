mod generate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tryon-cli")]
#[command(about = "Virtual try-on generation command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate one try-on image and wait for the result
    Generate {
        /// URL of the model (person) photo
        #[arg(long)]
        model_image: String,
        /// URL of the garment photo
        #[arg(long)]
        garment_image: String,
        /// Let the backend re-pose the model
        #[arg(long)]
        no_preserve_pose: bool,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a queued generation once by its backend request id
    Status {
        request_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = tryon_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            model_image,
            garment_image,
            no_preserve_pose,
            json,
        } => {
            let request =
                tryon_core::GenerationRequest::new(model_image, garment_image, !no_preserve_pose);
            generate::run_generate(&config, &request, json).await
        }
        Commands::Status { request_id } => generate::run_status(&config, &request_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_defaults_to_preserving_pose() {
        let cli = Cli::try_parse_from([
            "tryon-cli",
            "generate",
            "--model-image",
            "https://x.test/m.png",
            "--garment-image",
            "https://x.test/g.png",
        ])
        .expect("args should parse");
        match cli.command {
            Commands::Generate {
                no_preserve_pose,
                json,
                ..
            } => {
                assert!(!no_preserve_pose);
                assert!(!json);
            }
            Commands::Status { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn generate_requires_both_images() {
        let result = Cli::try_parse_from([
            "tryon-cli",
            "generate",
            "--model-image",
            "https://x.test/m.png",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn status_takes_positional_request_id() {
        let cli = Cli::try_parse_from(["tryon-cli", "status", "abc-123"]).expect("args");
        assert!(matches!(cli.command, Commands::Status { ref request_id } if request_id == "abc-123"));
    }
}

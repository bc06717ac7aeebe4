use crate::app::chat::{self, ChatOptions};
use crate::app::status::render_status;
use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use anyhow::Result;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Chat {
            message,
            model,
            temperature,
        } => {
            chat::run_chat(
                &config,
                ChatOptions {
                    message,
                    model,
                    temperature,
                },
            )
            .await
        }

        Commands::Status => {
            println!("{}", render_status(&config));
            Ok(())
        }

        Commands::Model { set } => {
            let trimmed = set.trim();
            if trimmed.is_empty() {
                anyhow::bail!("model name cannot be empty");
            }
            let mut updated = config;
            updated.default_model = Some(trimmed.to_string());
            updated.save()?;

            println!("Updated model defaults");
            println!(
                "Model: {}",
                updated.default_model.as_deref().unwrap_or("(unset)")
            );
            println!("Config: {}", updated.config_path.display());
            Ok(())
        }
    }
}

//! Resume screener: rank job roles against uploaded resumes

use clap::Parser;
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, ModelAction, RoleAction};
use resume_screener::config::Config;
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::manager::{declared_extension, InputManager};
use resume_screener::output::{ReportGenerator, ScreeningReport};
use resume_screener::processing::catalog::RoleCatalog;
use resume_screener::processing::embedding_manager::EmbeddingModelManager;
use resume_screener::processing::embeddings::ModelContext;
use resume_screener::processing::screening::Screener;
use resume_screener::server;
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Rank {
            resume,
            output,
            top,
            roles,
            save,
            detailed,
        } => {
            if !resume.is_file() {
                return Err(ScreenerError::InvalidInput(format!(
                    "Resume file does not exist: {}",
                    resume.display()
                )));
            }

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ScreenerError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;

            let models = ModelContext::from_config(&config);
            let embedder = models.embedder().await?;

            let roles_file = roles.unwrap_or_else(|| config.catalog.roles_file.clone());
            let catalog = RoleCatalog::load_or_default(&roles_file);
            let screener = Screener::new(embedder, catalog, top.unwrap_or(config.ranking.top_n));

            info!("Screening {}", resume.display());
            let outcome = screener.screen_file(&resume, &declared_extension(&resume)).await;
            let report = ScreeningReport::from_outcome(
                &resume.display().to_string(),
                outcome,
                &screener,
                detailed,
            );

            let generator = ReportGenerator::new(config.output.color_output && save.is_none(), detailed);
            let content = generator.generate(&report, output_format)?;

            match save {
                Some(path) => {
                    generator.save(&content, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Extract { file } => {
            let manager = InputManager::new();
            match manager.extract(&file, &declared_extension(&file)).await {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("warning: {}", e),
            }
        }

        Commands::Roles { action } => match action {
            RoleAction::List { roles } => {
                let roles_file = roles.unwrap_or_else(|| config.catalog.roles_file.clone());
                let catalog = RoleCatalog::load_or_default(&roles_file);

                println!("Job roles ({}):\n", catalog.len());
                for role in catalog.roles() {
                    println!("  • {} [{}]", role.title, role.id);
                    if !role.description.is_empty() {
                        println!("    {}", role.description);
                    }
                }
            }

            RoleAction::Init { path, force } => {
                if path.exists() && !force {
                    return Err(ScreenerError::InvalidInput(format!(
                        "{} already exists, use --force to overwrite",
                        path.display()
                    )));
                }
                std::fs::write(&path, RoleCatalog::default_roles().to_json_pretty()?)?;
                println!("Wrote built-in roles to {}", path.display());
            }
        },

        Commands::Models { action } => {
            config.ensure_models_dir()?;
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("Embedding models:\n");
                    for (id, info) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(id) {
                            "downloaded"
                        } else {
                            "available"
                        };
                        let marker = if manager.resolve_model_id(&config.models.embedding_model).as_deref()
                            == Some(id.as_str())
                        {
                            " (configured)"
                        } else {
                            ""
                        };
                        println!("  • {} ({}) - {} MB, {} dims [{}]{}", id, info.repo_id, info.size_mb, info.dimensions, status, marker);
                        println!("    {}", info.description);
                    }

                    let downloaded = manager.list_downloaded_models();
                    if !downloaded.is_empty() {
                        println!("\nIn {}: {}", config.models_dir().display(), downloaded.join(", "));
                    }
                }

                ModelAction::Download { model, force } => {
                    let model = model.unwrap_or_else(|| config.models.embedding_model.clone());
                    if !force && manager.is_model_downloaded(&model) {
                        println!("Model '{}' is already downloaded (use --force to re-download)", model);
                        return Ok(());
                    }

                    if let Some(info) = manager.get_model_info(&model) {
                        println!("Downloading {} ({}, ~{} MB)", info.name, info.repo_id, info.size_mb);
                    }
                    let path = manager.download_model(&model, force).await?;
                    println!("Model '{}' downloaded to {}", model, path.display());
                }
            }
        }

        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let models = ModelContext::from_config(&config);
            server::serve(&config, &models).await?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Configuration file: {}\n", config_path.display());
                println!("Models Directory: {}", config.models_dir().display());
                println!("Embedding Model: {}", config.models.embedding_model);
                println!("Role Catalog: {}", config.catalog.roles_file.display());
                println!("Top N: {}", config.ranking.top_n);
                println!("Server: {}:{}", config.server.host, config.server.port);
                println!("Upload Directory: {}", config.server.upload_dir.display());
                println!("Max Upload Size: {} bytes", config.server.max_upload_bytes);
                println!("Output Format: {:?}", config.output.format);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }
        },
    }

    Ok(())
}

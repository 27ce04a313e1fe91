//! resume-scorer: resume and job description compatibility scoring

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_scorer::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_scorer::config::Config;
use resume_scorer::input::{FileType, InputManager};
use resume_scorer::output::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_scorer::processing::embedding_manager::EmbeddingModelManager;
use resume_scorer::{AnalysisEngine, Result, ResumeScorerError};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if let Err(e) = run_command(cli.command, &config_path).await {
        error!("Command failed: {}", e);
        if e.is_retryable() {
            info!("This error may be transient; retrying the command can help");
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config_path: &Path) -> Result<()> {
    match command {
        Commands::Config { action } => {
            run_config_command(action.unwrap_or(ConfigAction::Show), config_path)
        }
        Commands::Analyze {
            resume,
            job,
            model,
            output,
            save,
            detailed,
        } => {
            let mut config = Config::load_from(config_path)?;
            if let Some(model) = model {
                config.models.embedding_model = model;
            }
            if let Some(format) = output {
                config.output.format = format;
            }
            config.output.detailed |= detailed;

            run_analysis(&config, &resume, &job, save.as_deref()).await
        }
        Commands::Models { action } => {
            let config = Config::load_from(config_path)?;
            run_model_command(action, &config).await
        }
    }
}

async fn run_analysis(config: &Config, resume: &Path, job: &Path, save: Option<&Path>) -> Result<()> {
    let allowed = FileType::supported_extensions();
    cli::validate_file_extension(resume, allowed)
        .map_err(|e| ResumeScorerError::InvalidInput(format!("Resume file: {}", e)))?;
    cli::validate_file_extension(job, allowed)
        .map_err(|e| ResumeScorerError::InvalidInput(format!("Job description file: {}", e)))?;

    let mut input_manager = InputManager::new();
    let resume_text = input_manager.extract_text(resume).await?;
    let job_text = input_manager.extract_text(job).await?;

    let mut reference_texts = Vec::with_capacity(config.keywords.reference_files.len());
    for path in &config.keywords.reference_files {
        reference_texts.push(input_manager.extract_text(path).await?);
    }

    let spinner = loading_spinner(&format!(
        "Loading embedding model {}",
        config.models.embedding_model
    ));
    let mut model_manager = EmbeddingModelManager::new(config.models_dir().to_path_buf()).await?;
    let encoder = model_manager
        .load_encoder(&config.models.embedding_model, Some(config.processing.max_tokens))
        .await;
    spinner.finish_and_clear();

    let engine =
        AnalysisEngine::new(config, Arc::new(encoder?))?.with_reference_texts(reference_texts);

    let timeout_secs = config.processing.analysis_timeout_secs;
    let task = tokio::task::spawn_blocking(move || engine.analyze_report(&resume_text, &job_text));
    let report = match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(joined) => joined.map_err(|e| {
            ResumeScorerError::ModelUnavailable(format!("Analysis task failed: {}", e))
        })??,
        Err(_) => return Err(ResumeScorerError::Timeout(timeout_secs)),
    };

    if report.metadata.input_truncated {
        warn!(
            "Input exceeded the configured limits and was truncated (max {} characters, {} tokens)",
            config.processing.max_input_chars, config.processing.max_tokens
        );
    }

    let generator = ReportGenerator::from_config(&config.output);
    let rendered = generator.generate_report(&report, config.output.format)?;

    match save {
        Some(path) => {
            // Files never carry terminal color codes.
            let plain = ReportGenerator::with_options(false, config.output.detailed, true, true)
                .generate_report(&report, config.output.format)?;
            let path = resolve_save_path(path, config.output.format, resume);
            save_report_to_file(&plain, &path)?;
            info!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

async fn run_model_command(action: ModelAction, config: &Config) -> Result<()> {
    let mut model_manager = EmbeddingModelManager::new(config.models_dir().to_path_buf()).await?;

    match action {
        ModelAction::List => {
            println!("Embedding models ({}):", model_manager.models_dir().display());
            for (id, info) in model_manager.list_available_models() {
                let status = if model_manager.is_model_downloaded(id) {
                    "downloaded"
                } else {
                    "available"
                };
                let marker = if id == config.models.embedding_model { "*" } else { " " };
                println!(
                    "{} {:<16} {:<28} {:>4} MB  {}",
                    marker, id, info.repo_id, info.size_mb, status
                );
            }
        }
        ModelAction::Download { model, force } => {
            let model_id = model_manager
                .resolve_model_id(&model)
                .ok_or_else(|| ResumeScorerError::ModelNotFound(model.clone()))?;
            let spinner = loading_spinner(&format!("Downloading {}", model_id));
            let result = model_manager.download_model(&model_id, force).await;
            spinner.finish_and_clear();
            println!("Model {} is available at {}", model_id, result?.display());
        }
        ModelAction::Remove { model } => {
            let model_id = model_manager.resolve_model_id(&model).unwrap_or(model);
            model_manager.remove_model(&model_id).await?;
            println!("Removed model {}", model_id);
        }
        ModelAction::Info { model } => {
            let model_id = model_manager
                .resolve_model_id(&model)
                .ok_or_else(|| ResumeScorerError::ModelNotFound(model.clone()))?;
            if let Some(info) = model_manager.get_model_info(&model_id) {
                println!("{}", info.name);
                println!("  Id:          {}", model_id);
                println!("  Repository:  {}", info.repo_id);
                println!("  Size:        {} MB", info.size_mb);
                println!("  Dimensions:  {}", info.dimensions);
                println!("  Description: {}", info.description);
                match model_manager.get_model_path(&model_id) {
                    Some(path) => println!("  Location:    {}", path.display()),
                    None => println!("  Location:    not downloaded"),
                }
            }
        }
    }

    Ok(())
}

fn run_config_command(action: ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(config_path)?;
            let content = toml::to_string_pretty(&config).map_err(|e| {
                ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e))
            })?;
            println!("# {}\n{}", config_path.display(), content);
        }
        ConfigAction::Reset => {
            Config::default().save_to(config_path)?;
            println!("Configuration reset to defaults at {}", config_path.display());
        }
        ConfigAction::Path => println!("{}", config_path.display()),
    }
    Ok(())
}

fn loading_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

//! Resume matcher: score a résumé against a job description

use clap::Parser;
use log::{error, info, warn};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction, SkillsAction};
use resume_matcher::config::Config;
use resume_matcher::error::{Result, ResumeMatcherError};
use resume_matcher::input::job_description::read_job_description;
use resume_matcher::input::{DocumentFormat, InputManager};
use resume_matcher::output::formatter::save_report_to_file;
use resume_matcher::output::records::DEFAULT_JOB_TITLE;
use resume_matcher::output::{AnalysisReport, PersistenceBundle, ReportGenerator};
use resume_matcher::processing::{ResumeAnalyzer, SkillVocabulary};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration; config subcommands may name a file that does not exist yet
    let allow_missing = matches!(cli.command, Commands::Config { .. });
    let config = match &cli.config {
        Some(path) => Config::load_explicit(path, allow_missing),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config) {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            title,
            output,
            detailed,
            save,
            records,
        } => {
            info!("Starting résumé analysis");

            let extension = cli::validate_file_extension(&resume, &DocumentFormat::SUPPORTED_EXTENSIONS)
                .map_err(|e| ResumeMatcherError::UnsupportedFormat(format!("Résumé file: {}", e)))?;
            InputManager::check_size(&resume, config.max_file_size_bytes())?;

            let output_format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(ResumeMatcherError::InvalidInput)?,
                None => config.output.format,
            };

            let job_description = match (job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(&path, &["txt", "md"])
                        .map_err(|e| ResumeMatcherError::InvalidInput(format!("Job description file: {}", e)))?;
                    read_job_description(&path)?
                }
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(ResumeMatcherError::InvalidInput(
                        "A job description is required (--job or --job-text)".to_string(),
                    ))
                }
            };
            if job_description.trim().is_empty() {
                return Err(ResumeMatcherError::InvalidInput("Job description is empty".to_string()));
            }

            let start = Instant::now();
            let analyzer = ResumeAnalyzer::from_config(&config)?;
            let result = analyzer.analyze_resume(&resume, &extension, &job_description)?;
            let elapsed = start.elapsed().as_millis() as u64;

            if result.is_degraded() {
                warn!("Analysis is based on partially extracted text; see warnings in the report");
            }

            let job_title = title.unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());
            let filename = resume.to_string_lossy().to_string();

            if let Some(records_path) = records {
                let bundle = PersistenceBundle::from_analysis(&filename, &job_title, &job_description, &result)?;
                bundle.save(&records_path)?;
                info!("Records written to {}", records_path.display());
            }

            let report = AnalysisReport::new(&filename, &job_title, elapsed, result);
            let generator = ReportGenerator::new(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
            );
            let content = generator.generate_report(&report, output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&content, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Skills { action } => match action {
            SkillsAction::List => {
                let vocabulary = SkillVocabulary::from_config(&config.vocabulary)?;
                println!("Skill vocabulary ({} entries)\n", vocabulary.len());
                for skill in vocabulary.iter() {
                    println!("  {}", skill);
                }
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("{}", toml::to_string_pretty(&config).map_err(|e| {
                    ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                })?);
            }

            Some(ConfigAction::Reset) => {
                let default_config = Config::default();
                match &config_path {
                    Some(path) => default_config.save_to(path)?,
                    None => default_config.save()?,
                }
                println!("Configuration reset to defaults");
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

// src/main.rs
mod cli;

use castaway_tracker::config::Config;
use castaway_tracker::constants::CURRENT_SEASON_NUMBER;
use castaway_tracker::data_fetcher::{FileCacheStore, ResourceFetcher};
use castaway_tracker::error::AppError;
use castaway_tracker::views::SpoilerGate;
use castaway_tracker::views::current_season::CurrentSeasonView;
use castaway_tracker::views::dashboard::OverviewView;
use castaway_tracker::views::season_detail::SeasonDetailView;
use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use cli::{Args, wants_config_update};
use std::path::Path;
use std::sync::Arc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Try to load config to get log file path if specified
    let config_log_path = Config::load()
        .await
        .ok()
        .and_then(|config| config.log_file_path);

    // Set up logging to file (and console in debug mode)
    let custom_log_path = args.log_file.as_ref().or(config_log_path.as_ref());
    let (log_dir, log_file_name) = match custom_log_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path.parent().unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("castaway_tracker.log");
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (
            Config::get_log_dir_path(),
            "castaway_tracker.log".to_string(),
        ),
    };

    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    // Rolling file appender that creates a new log file each day. The
    // guard must stay alive for the duration of the program so logs are
    // flushed properly.
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry();
    if args.debug {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(std::io::stdout)
                    .with_ansi(true)
                    .with_filter(
                        EnvFilter::from_default_env()
                            .add_directive("castaway_tracker=info".parse().unwrap()),
                    ),
            )
            .with(
                fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_filter(
                        EnvFilter::from_default_env()
                            .add_directive("castaway_tracker=info".parse().unwrap()),
                    ),
            )
            .init();
    } else {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_filter(
                        EnvFilter::from_default_env()
                            .add_directive("castaway_tracker=info".parse().unwrap()),
                    ),
            )
            .init();
    }

    tracing::info!("Logs are being written to: {log_dir}/{log_file_name}");

    if args.list_config {
        Config::display().await?;
        return Ok(());
    }

    // Handle configuration updates
    if wants_config_update(&args) {
        let mut config = Config::load().await.unwrap_or_default();

        if let Some(new_base_url) = args.new_data_base_url {
            config.data_base_url = new_base_url;
        }

        if let Some(new_fallback) = args.new_fallback_base_url {
            config.fallback_base_url = Some(new_fallback);
        } else if args.clear_fallback_base_url {
            config.fallback_base_url = None;
            println!("Fallback base URL cleared.");
        }

        if let Some(new_log_path) = args.new_log_file_path {
            config.log_file_path = Some(new_log_path);
        } else if args.clear_log_file_path {
            config.log_file_path = None;
            println!("Custom log file path cleared. Using default location.");
        }

        config.validate()?;
        config.save().await?;
        println!("Config updated successfully!");
        return Ok(());
    }

    let config = Config::load().await?;

    let today = match &args.today {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
            AppError::date_parse_error(format!("Invalid --today value '{raw}': {e}"))
        })?,
        // UTC internally, local date for what "today" means to the viewer
        None => Utc::now().with_timezone(&Local).date_naive(),
    };

    let store = Arc::new(FileCacheStore::at_default_location());
    let fetcher = ResourceFetcher::new(&config, store)?;
    if args.refresh {
        fetcher.invalidate_all();
    }

    let data = match fetcher.fetch_dashboard_data(Utc::now()).await {
        Ok(data) => data,
        Err(e) => {
            // Required resource unreachable with no cache: render the
            // error block and nothing else.
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if args.overview {
        print!("{}", OverviewView::build(&data).render());
        return Ok(());
    }

    if let Some(season_number) = args.season {
        match SeasonDetailView::build(&data, season_number) {
            Some(view) => print!("{}", view.render()),
            None => println!("No season {season_number} found."),
        }
        return Ok(());
    }

    let gate = SpoilerGate::new(args.spoilers);
    match CurrentSeasonView::build(&data, CURRENT_SEASON_NUMBER, today) {
        Some(view) => {
            print!("{}", view.render(&gate));
            if !gate.is_revealed() {
                println!("\n(Names hidden. Re-run with --spoilers to reveal outcomes.)");
            }
        }
        None => println!("No season {CURRENT_SEASON_NUMBER} found."),
    }

    Ok(())
}

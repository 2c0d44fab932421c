use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Reality-TV Castaway Season Tracker
///
/// Prints season and episode statistics pulled from the published data
/// files: the current-season page by default, a season's episode list
/// with --season, or the all-seasons overview with --overview.
///
/// Eliminated names and immunity winners are hidden unless --spoilers is
/// set. Data is refreshed at most once per day; --refresh forces a fresh
/// download.
#[derive(Parser, Debug)]
#[command(author = "Trisha Dey", about, long_about = None, version)]
#[command(styles = get_styles())]
pub struct Args {
    /// Show a specific season's summary and episode list instead of the
    /// current-season page.
    #[arg(short = 's', long = "season", value_name = "NUMBER", help_heading = "Display Options")]
    pub season: Option<u32>,

    /// Show the all-seasons overview with quick stats and a season table.
    #[arg(short = 'o', long = "overview", help_heading = "Display Options")]
    pub overview: bool,

    /// Reveal outcome spoilers (eliminations and immunity winners).
    #[arg(long = "spoilers", help_heading = "Display Options")]
    pub spoilers: bool,

    /// Override the reference date (YYYY-MM-DD) used to classify episodes
    /// as aired or upcoming. Defaults to the local date.
    #[arg(long = "today", value_name = "DATE", help_heading = "Display Options")]
    pub today: Option<String>,

    /// Ignore cached data and download fresh copies of every resource.
    #[arg(long = "refresh", help_heading = "Display Options")]
    pub refresh: bool,

    /// Update the primary data base URL in config.
    #[arg(long = "config", value_name = "BASE_URL", help_heading = "Configuration")]
    pub new_data_base_url: Option<String>,

    /// Update the fallback data base URL in config.
    #[arg(long = "set-fallback", value_name = "BASE_URL", help_heading = "Configuration")]
    pub new_fallback_base_url: Option<String>,

    /// Clear the fallback data base URL from config.
    #[arg(long = "clear-fallback", help_heading = "Configuration")]
    pub clear_fallback_base_url: bool,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Echo logs to stdout in addition to the log file.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

/// Whether any configuration-update flag was given; those run and exit
/// without fetching data.
pub fn wants_config_update(args: &Args) -> bool {
    args.new_data_base_url.is_some()
        || args.new_fallback_base_url.is_some()
        || args.clear_fallback_base_url
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

use clap::{Parser, Subcommand};
use log::debug;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use surveygauge::assets::AssetLinks;
use surveygauge::report::{self, format_thousands};
use surveygauge::{Dashboard, DashboardConfig, Media, SurveyCount};

#[derive(Parser, Debug)]
#[command(name = "surveygauge")]
#[command(author, version, about = "Count completed survey interviews and celebrate the target sample size")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Survey CSV file (optional in GUI mode)
    path: Option<PathBuf>,

    /// Launch GUI file picker (auto-enabled when double-clicked)
    #[arg(long)]
    gui: bool,

    #[command(flatten)]
    overrides: Overrides,

    /// Write the dashboard to a file (.html, .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't prompt to open the written dashboard
    #[arg(long)]
    no_open: bool,

    /// Only print the state line
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Settings that override the config file
#[derive(clap::Args, Debug, Clone)]
struct Overrides {
    /// Dashboard config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target sample size (default: 1500)
    #[arg(long, allow_negative_numbers = true)]
    target: Option<i64>,

    /// Household identifier column (default: hh_num)
    #[arg(long)]
    column: Option<String>,

    /// Celebration media: image, video or none
    #[arg(long)]
    media: Option<Media>,

    /// Directory holding logos and fireworks media
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Dashboard title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the live dashboard over HTTP
    Serve {
        /// Survey CSV file
        path: PathBuf,

        /// Port to listen on (default: 8050)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        #[command(flatten)]
        overrides: Overrides,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    // Handle subcommands first
    if let Some(Command::Serve { path, port, host, overrides, no_open }) = args.command {
        let mut config = load_config(&overrides).unwrap_or_else(|e| fail(e));
        if let Some(port) = port {
            config.port = port;
        }
        if let Some(host) = host {
            config.host = host;
        }
        if let Err(e) = config.validate() {
            fail(e);
        }

        let survey = load_survey(&path, &config);
        let ctx = surveygauge::serve::Context::new(config, survey).unwrap_or_else(|e| fail(e));
        if let Err(e) = surveygauge::serve::start(&ctx, !no_open) {
            fail(format!("Server error: {}", e));
        }
        return;
    }

    // With GUI feature: launch GUI if --gui flag OR no path provided
    #[cfg(feature = "gui")]
    let use_gui = args.gui || args.path.is_none();

    #[cfg(not(feature = "gui"))]
    let use_gui = false;

    #[cfg(feature = "gui")]
    let path = match args.path.clone() {
        Some(p) if !args.gui => p,
        _ => match pick_csv_gui() {
            Some(p) => p,
            None => {
                eprintln!("No survey file selected.");
                std::process::exit(0);
            }
        },
    };

    #[cfg(not(feature = "gui"))]
    let path = if let Some(p) = args.path.clone() {
        p
    } else {
        eprintln!("Usage: surveygauge <PATH>");
        eprintln!("Run 'surveygauge --help' for more options.");
        eprintln!("Note: GUI mode not available in this build.");
        std::process::exit(1);
    };

    let config = load_config(&args.overrides).unwrap_or_else(|e| fail(e));
    let survey = load_survey(&path, &config);
    let presenter = config.presenter().unwrap_or_else(|e| fail(e));
    let links = AssetLinks::for_file(&config.assets_dir);
    let dashboard =
        Dashboard::build(&config, &presenter, &survey, &links).unwrap_or_else(|e| fail(e));

    print_summary(&dashboard, args.quiet);

    if let Some(ref output_path) = args.output {
        if let Err(e) = report::generate(output_path, &dashboard) {
            fail(format!("Failed to write dashboard: {}", e));
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mDashboard saved: {}\x1b[0m", output_path.display());
        }

        if !args.no_open {
            if use_gui {
                // In GUI mode, auto-open the dashboard (no prompt)
                let _ = open::that(output_path);
            } else if !args.quiet {
                prompt_open(output_path);
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn fail<E: Display>(e: E) -> ! {
    eprintln!("\x1b[31mError:\x1b[0m {}", e);
    std::process::exit(1);
}

/// Config file (or defaults) with command-line overrides applied
fn load_config(overrides: &Overrides) -> Result<DashboardConfig, surveygauge::ConfigError> {
    let mut config = match overrides.config {
        Some(ref path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    if let Some(target) = overrides.target {
        config.target = target;
    }
    if let Some(ref column) = overrides.column {
        config.count_column = column.clone();
    }
    if let Some(media) = overrides.media {
        config.media = media;
    }
    if let Some(ref assets) = overrides.assets {
        config.assets_dir = assets.clone();
    }
    if let Some(ref title) = overrides.title {
        config.title = title.clone();
    }

    config.validate()?;
    debug!("Config: {:?}", config);
    Ok(config)
}

fn load_survey(path: &Path, config: &DashboardConfig) -> SurveyCount {
    SurveyCount::from_path(path, &config.count_column).unwrap_or_else(|e| fail(e))
}

fn print_summary(dashboard: &Dashboard, quiet: bool) {
    let (color, label) = if dashboard.state.is_celebrating() {
        ("\x1b[1;32m", "TARGET REACHED")
    } else {
        ("\x1b[33m", "IN PROGRESS")
    };
    let reset = "\x1b[0m";

    if quiet {
        println!(
            "{}[{}]{} {}/{}",
            color,
            label,
            reset,
            dashboard.survey.completed,
            dashboard.target
        );
        return;
    }

    eprintln!("\x1b[1m{}\x1b[0m", dashboard.title);
    eprintln!("{}", "─".repeat(50));
    println!(
        "  Completed:  {} / {} ({:.1}%)",
        dashboard.gauge.formatted,
        format_thousands(dashboard.gauge.max),
        dashboard.progress
    );
    println!("  Remaining:  {}", format_thousands(dashboard.remaining));
    println!(
        "  Rows read:  {} (column '{}')",
        format_thousands(dashboard.survey.rows),
        dashboard.survey.column
    );
    println!("  State:      {}[{}]{}", color, label, reset);

    let regions: Vec<String> = dashboard
        .state
        .regions()
        .map(|(region, visible)| format!("{}={}", region, if visible { "shown" } else { "hidden" }))
        .collect();
    println!("  Regions:    {}", regions.join(" "));

    if dashboard.state.is_celebrating() {
        println!("\n  {}{}{}", color, dashboard.celebration_message, reset);
    }
}

fn prompt_open(output_path: &Path) {
    eprint!("\nOpen dashboard in browser? [Y/n] ");
    io::stderr().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        let input = input.trim().to_lowercase();
        if input.is_empty() || input == "y" || input == "yes" {
            if let Err(e) = open::that(output_path) {
                eprintln!("Failed to open dashboard: {}", e);
            }
        }
    }
}

#[cfg(feature = "gui")]
fn pick_csv_gui() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select survey CSV file")
        .add_filter("CSV files", &["csv", "txt"])
        .pick_file()
}

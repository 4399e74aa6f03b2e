use clap::Parser;
use log::*;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use sports_ticker::{cache, config::Config, fetch, logos, plugin, sim};
use std::{path::PathBuf, time::Duration, time::Instant};

const APP_NAME: &str = "sports_ticker";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, default_value = "ticker-config.toml")]
    /// Path to the config file
    config: PathBuf,

    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long, short)]
    /// Run one update and render a single frame, then exit
    once: bool,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let data_dir = directories::BaseDirs::new()
        .expect("Could not find a directory to store app data")
        .data_local_dir()
        .join("sports-ticker");

    let log_base_path = args
        .log_location
        .unwrap_or_else(|| data_dir.join("logs"));
    let log_path = log_base_path.join("ticker-log.txt");
    let archived_log_path = log_base_path.join("ticker-log-{}.txt.gz");

    // Setup the file log roller
    let roller = FixedWindowRoller::builder()
        .build(
            archived_log_path.as_os_str().to_str().unwrap(),
            args.num_old_logs,
        )
        .unwrap();
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(log_path, Box::new(file_policy))
        .unwrap();

    // The terminal is occupied by the panel simulator, so console logging
    // goes to stderr and stays quiet unless redirected.
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    let root = Root::builder()
        .appender("file_appender")
        .appender("console")
        .build(LevelFilter::Error);

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)))
        .appender(Appender::builder().build("console", Box::new(console)))
        .logger(Logger::builder().build(APP_NAME, log_level))
        .build(root)
        .unwrap();

    log4rs::init_config(log_config).unwrap();
    log_panics::init();

    let config = if args.config.exists() {
        Config::new_from_file(&args.config)?
    } else {
        warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
        Config::default()
    };

    let timeout = Duration::from_secs(config.ticker.refresh.request_timeout_secs);
    let source = fetch::EspnClient::new(timeout)?;
    let payload_cache = cache::FileCache::new(data_dir.join("scoreboards"));
    let logo_cache = logos::LogoCache::new(data_dir.join("logos"), timeout);

    let update_interval = Duration::from_secs(config.ticker.refresh.update_interval_secs.max(30));
    let frame_delay = Duration::from_millis(config.ticker.scrolling.frame_delay_ms.max(1));
    let (panel_width, panel_height) = (config.hardware.panel_width, config.hardware.panel_height);

    let mut plugin = plugin::TickerPlugin::new(
        APP_NAME,
        config.ticker,
        panel_width,
        panel_height,
        source,
        payload_cache,
        logo_cache,
    );
    let mut panel = sim::TerminalPanel::new();

    info!("Starting ticker: {panel_width}x{panel_height} panel");
    plugin.update();
    let mut last_update = Instant::now();

    if args.once {
        plugin.display(&mut panel, false);
        return Ok(());
    }

    loop {
        if last_update.elapsed() >= update_interval {
            plugin.update();
            last_update = Instant::now();
        }
        plugin.display(&mut panel, false);
        std::thread::sleep(frame_delay);
    }
}

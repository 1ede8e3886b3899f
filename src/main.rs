use clap::Parser;
use poly_risk::cli::{Cli, Commands};
use poly_risk::config::{Config, ConfigError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing file means defaults; a present but broken file is fatal
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("Warning: config file {} not found, using defaults", cli.config);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    config.validate()?;

    // Initialize telemetry
    poly_risk::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Extract(args) => args.execute(&config)?,
        Commands::Score(args) => {
            tracing::info!(input = %args.input.display(), "Scoring markets");
            args.execute(&config).await?;
        }
        Commands::Sources(args) => args.execute(&config).await?,
        Commands::Config => {
            println!("Current configuration:");
            println!("  Sources: {}", config.mentions.sources.join(", "));
            println!(
                "  Mentions: budget={}s page_size={} max_pages={} strategy={:?}",
                config.mentions.time_budget_secs,
                config.mentions.page_size,
                config.mentions.max_pages,
                config.mentions.term_strategy
            );
            println!(
                "  Whale: min_actors={} percentile={} window={}d",
                config.whale.min_actors, config.whale.percentile, config.whale.window_days
            );
            println!("  Risk: k={}", config.risk.steepness);
            match &config.baseline {
                Some(b) => println!(
                    "  Baseline: speculation={} whale={}",
                    b.speculation_ratio, b.whale_ratio
                ),
                None => println!("  Baseline: not configured"),
            }
        }
    }

    Ok(())
}

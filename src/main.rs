//! Weathervane - Raspberry Pi Weather Station Binary
//!
//! Samples the weather shield on a fixed interval, serves the latest reading
//! over HTTP and relays every reading to a telemetry collector.

use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use weathervane::{
    run_acquisition, run_renewal, start_web_server, AppState, Reading, Relay, SamplerConfig,
    SimulatedShield, StationState, StaticTokenSource, TokenSource, WeatherShield, WebConfig,
    DEFAULT_CATALOG, DEFAULT_RENEW_INTERVAL_MINS, DEFAULT_SAMPLE_INTERVAL_SECS, DEFAULT_WEB_PORT,
};

#[derive(Parser)]
#[command(name = "weathervane")]
#[command(about = "⛅ Weathervane - Raspberry Pi Weather Station")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Austin Couch")]
#[command(long_about = "A weather station service with web dashboard and cloud telemetry relay")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Sensor sampling interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_INTERVAL_SECS)]
    interval: u64,

    /// Access-credential renewal interval in minutes
    #[arg(long, default_value_t = DEFAULT_RENEW_INTERVAL_MINS)]
    renew_interval: u64,

    /// Telemetry collector endpoint
    #[arg(long, default_value = "http://127.0.0.1:8088/api/messages")]
    collector_url: String,

    /// Pre-shared credential for the collector
    #[arg(long, default_value = "insecure-dev-token")]
    token: String,

    /// Use the simulated shield even when hardware support is compiled in
    #[arg(long)]
    simulate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the station (default)
    Serve(ServeArgs),

    /// Take a single reading and exit
    Snapshot(SnapshotArgs),

    /// List the telemetry channel catalog
    Channels,
}

#[derive(Args)]
struct ServeArgs {
    /// Static dashboard files directory (optional)
    #[arg(long)]
    static_dir: Option<String>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;
    print_banner();

    match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(&cli, args).await?,
        Some(Commands::Channels) => channels_command(),
        None => {
            let serve_args = ServeArgs {
                static_dir: None,
                no_cors: false,
            };
            serve_command(&cli, &serve_args).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn print_banner() {
    println!("⛅ Weathervane - Raspberry Pi Weather Station");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
}

fn build_shield(cli: &Cli) -> anyhow::Result<Arc<dyn WeatherShield>> {
    #[cfg(feature = "hardware")]
    {
        if !cli.simulate {
            let shield = weathervane::shield::SparkfunShield::new()?;
            info!("Using SparkFun weather shield");
            return Ok(Arc::new(shield));
        }
    }

    if !cli.simulate {
        info!("Hardware support not compiled, using simulated shield");
    }
    Ok(Arc::new(SimulatedShield::new()))
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    info!("Starting weathervane...");

    let shield = build_shield(cli)?;
    // A shield that cannot come up means the pipeline can never start.
    shield.initialize().await?;
    info!("Weather shield initialized");

    let source: Arc<dyn TokenSource> = Arc::new(StaticTokenSource::new(cli.token.clone()));
    let state = StationState::new(source.mint()?);
    let relay = Arc::new(Relay::new(
        cli.collector_url.clone(),
        DEFAULT_CATALOG.clone(),
    )?);

    let sampler_config = SamplerConfig {
        sample_interval: Duration::from_secs(cli.interval),
        renew_interval: Duration::from_secs(cli.renew_interval * 60),
        ..SamplerConfig::default()
    };

    info!("Station configuration:");
    info!("  - Bind address: {}:{}", cli.host, cli.port);
    info!("  - Sampling interval: {}s", cli.interval);
    info!("  - Credential renewal: every {}min", cli.renew_interval);
    info!("  - Collector: {}", cli.collector_url);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(run_acquisition(
        state.clone(),
        shield.clone(),
        relay,
        sampler_config,
        shutdown_rx.clone(),
    ));
    tokio::spawn(run_renewal(
        state.clone(),
        source,
        sampler_config,
        shutdown_rx,
    ));

    let web_config = WebConfig::new(&cli.host, cli.port)
        .with_cors(!args.no_cors)
        .with_static_path(args.static_dir.clone());
    let app_state = AppState {
        station: state,
        shield,
    };

    tokio::select! {
        result = start_web_server(web_config, app_state) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested; timers stopped, in-flight sends abandoned");
            shutdown_tx.send(true).ok();
        }
    }

    Ok(())
}

async fn snapshot_command(cli: &Cli, args: &SnapshotArgs) -> anyhow::Result<()> {
    let shield = build_shield(cli)?;
    shield.initialize().await?;

    let measurements = shield.read_measurements().await?;
    let mut reading = Reading::default();
    reading.apply(&measurements, chrono::Local::now());

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&reading)?),
        "pretty" => print_pretty_reading(&reading),
        other => anyhow::bail!("unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

fn channels_command() {
    println!("Telemetry channel catalog:");
    for channel in DEFAULT_CATALOG.iter() {
        println!(
            "  {:<12} [{:>4}]  {}",
            format!("{:?}", channel.measure),
            channel.unit,
            channel.channel_id
        );
    }
}

fn print_pretty_reading(reading: &Reading) {
    println!("⛅ Current Reading");
    println!("==================");

    if let Some(timestamp) = reading.timestamp {
        println!("  Sampled at:  {}", timestamp.format("%Y-%m-%d %H:%M:%S"));
    }
    println!(
        "  Temperature: {:.1} °C / {:.1} °F",
        reading.temperature_c, reading.temperature_f
    );
    println!("  Humidity:    {:.1} %RH", reading.humidity_percent);
    println!("  Pressure:    {:.2} kPa", reading.pressure_kpa);
    println!("  Altitude:    {:.1} m", reading.altitude);
}

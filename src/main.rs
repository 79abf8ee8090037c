use anyhow::{bail, Context};
use clap::Parser;
use ks_window::config::Settings;
use ks_window::decoders::PacketDecoder;
use ks_window::DetectEngine;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "ks-window")]
#[command(author = "KS-Sniff Contributors")]
#[command(version)]
#[command(about = "Evaluate TCP window signatures against captured frames", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Signature option body, e.g. '(msg:"zero window"; window:0; sid:1;)'
    #[arg(short, long = "signature", value_name = "RULE")]
    signatures: Vec<String>,

    /// File with one signature per line
    #[arg(short = 'S', long, value_name = "FILE")]
    signature_file: Option<PathBuf>,

    /// Frames are raw IP datagrams rather than Ethernet frames
    #[arg(long)]
    raw_ip: bool,

    /// Frame files to inspect (one raw frame per file)
    #[arg(value_name = "FRAME")]
    frames: Vec<PathBuf>,

    /// Generate default configuration file
    #[arg(long)]
    generate_config: bool,

    /// Verbose logging (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress most output)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        generate_default_config()?;
        return Ok(());
    }

    let settings = load_config(&cli)?;
    init_logging(&cli, &settings)?;

    info!("Starting ks-window v{}", env!("CARGO_PKG_VERSION"));

    let mut engine = DetectEngine::new(&settings);

    for (idx, text) in cli.signatures.iter().enumerate() {
        engine
            .load_signature(text)
            .with_context(|| format!("Invalid signature #{}: {}", idx + 1, text))?;
    }

    if let Some(path) = &cli.signature_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read signature file {:?}", path))?;
        let report = engine.load_signatures(content.lines());
        for (line, err) in &report.failed {
            eprintln!("{}:{}: {}", path.display(), line, err);
        }
        if !report.failed.is_empty() && settings.detection.strict_options {
            bail!(
                "{} signature(s) in {:?} failed to load",
                report.failed.len(),
                path
            );
        }
    }

    if engine.is_empty() {
        warn!("No signatures loaded, nothing will match");
    }

    let decoder = if cli.raw_ip {
        PacketDecoder::raw_ip()
    } else {
        PacketDecoder::new()
    };

    for frame in &cli.frames {
        inspect_frame(&engine, &decoder, frame)?;
    }

    Ok(())
}

fn inspect_frame(engine: &DetectEngine, decoder: &PacketDecoder, path: &Path) -> anyhow::Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read frame {:?}", path))?;
    let packet = decoder
        .decode(&data)
        .with_context(|| format!("Failed to decode frame {:?}", path))?;

    debug!("{:?}: {:?}", path, packet);

    let window = packet
        .tcp()
        .map(|seg| seg.window.to_string())
        .unwrap_or_else(|| "-".to_string());
    let sids = engine.inspect(&packet);
    let sids: Vec<String> = sids.iter().map(u32::to_string).collect();

    println!(
        "{}\twindow={}\tmatched=[{}]",
        path.display(),
        window,
        sids.join(",")
    );
    Ok(())
}

fn init_logging(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => settings.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    // RUST_LOG overrides the configured level when set
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("ks_window={}", log_level))
            .context("Invalid log level")?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true);

    match settings.logging.format.as_str() {
        "json" => registry.with(layer.json()).try_init(),
        "compact" => registry.with(layer.compact()).try_init(),
        _ => registry.with(layer).try_init(),
    }
    .context("Failed to initialize logging")?;

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Settings> {
    if let Some(config_path) = &cli.config {
        return Settings::from_file(config_path).context("Failed to load configuration file");
    }

    let default_paths = [
        PathBuf::from("ks-window.yaml"),
        PathBuf::from("config/ks-window.yaml"),
        PathBuf::from("/etc/ks-sniff/ks-window.yaml"),
    ];

    for path in default_paths {
        if path.exists() {
            return Settings::from_file(&path)
                .with_context(|| format!("Failed to load configuration from {:?}", path));
        }
    }

    Ok(Settings::default_config())
}

fn generate_default_config() -> anyhow::Result<()> {
    let config = Settings::default_config();
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;

    let output_path = PathBuf::from("ks-window.yaml");
    std::fs::write(&output_path, yaml).context("Failed to write config file")?;

    println!("Generated default configuration at: {:?}", output_path);
    Ok(())
}

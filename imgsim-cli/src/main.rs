use clap::Parser;
use imgsim::io::load_raster;
use imgsim::{Channel, CompareConfig, Comparator, SimError, SimilarityReport, Threshold};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "imgsim CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Override `actual_path` from the config.
    #[arg(long, value_name = "FILE")]
    actual: Option<String>,
    /// Override `expected_path` from the config.
    #[arg(long, value_name = "FILE")]
    expected: Option<String>,
    /// Override `threshold` from the config.
    #[arg(long)]
    threshold: Option<f64>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for per-channel scores and timing.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    actual_path: String,
    expected_path: String,
    threshold: f64,
    parallel: bool,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = CompareConfig::default();
        Self {
            actual_path: String::new(),
            expected_path: String::new(),
            threshold: cfg.threshold,
            parallel: cfg.parallel,
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChannelScores {
    alpha: f64,
    red: f64,
    green: f64,
    blue: f64,
}

impl From<&SimilarityReport> for ChannelScores {
    fn from(value: &SimilarityReport) -> Self {
        Self {
            alpha: value.channel(Channel::Alpha),
            red: value.channel(Channel::Red),
            green: value.channel(Channel::Green),
            blue: value.channel(Channel::Blue),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    similar: bool,
    threshold: f64,
    score: Option<f64>,
    channels: Option<ChannelScores>,
    failure: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli.config.exists() {
        let config_text = fs::read_to_string(&cli.config)?;
        serde_json::from_str(&config_text)?
    } else if cli.actual.is_some() && cli.expected.is_some() {
        Config::default()
    } else {
        return Err(format!("config file not found: {}", cli.config.display()).into());
    };

    if let Some(path) = &cli.actual {
        config.actual_path = path.clone();
    }
    if let Some(path) = &cli.expected {
        config.expected_path = path.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    Ok(config)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("imgsim=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(ExitCode::SUCCESS);
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    if config.actual_path.is_empty() || config.expected_path.is_empty() {
        return Err("actual_path and expected_path must be set".into());
    }
    let threshold = Threshold::new(config.threshold)?;

    let actual = load_raster(&config.actual_path)?;
    let expected = load_raster(&config.expected_path)?;

    let comparator = Comparator::new().with_config(CompareConfig {
        threshold: threshold.value(),
        parallel: config.parallel,
    });

    let output = match comparator.compare(&actual, &expected) {
        Ok(report) => {
            let similar = report.score >= threshold.value();
            let failure = (!similar).then(|| {
                SimError::BelowThreshold {
                    score: report.score,
                    threshold: threshold.value(),
                    channel: report.worst_channel(),
                }
                .to_string()
            });
            Output {
                similar,
                threshold: threshold.value(),
                score: Some(report.score),
                channels: Some(ChannelScores::from(&report)),
                failure,
            }
        }
        Err(err @ SimError::SizeMismatch { .. }) => Output {
            similar: false,
            threshold: threshold.value(),
            score: None,
            channels: None,
            failure: Some(err.to_string()),
        },
        Err(err) => return Err(err.into()),
    };

    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    if output.similar {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

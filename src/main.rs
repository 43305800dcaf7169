//! eth-log-audit CLI - cross-provider eth_getLogs consistency auditor

use clap::Parser;
use eth_log_audit::{
    parse_address, parse_topic, AuditConfig, Auditor, BlockNumber, ConfigError, ConfigFile, Error,
    ProviderConfig, Result,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "eth-log-audit")]
#[command(
    version,
    about = "Compare eth_getLogs results between two RPC providers and commit to each set"
)]
#[command(after_help = r#"EXAMPLES:
    # Audit USDC Transfer events across two providers
    eth-log-audit --rpc-a https://mainnet.infura.io/v3/KEY \
                  --rpc-b https://eth.llamarpc.com \
                  -a 0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48 \
                  --topic0 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef \
                  -f 21000000 -t 21000100

    # All logs in a range, machine-readable output
    eth-log-audit -f 21000000 -t 21000100 --json

    # Split wide ranges for providers with a getLogs limit
    eth-log-audit -f 20000000 -t 20100000 --max-block-range 5000

EXIT CODES:
    0    providers consistent
    1    divergence detected (full diff printed)
    2    configuration error
    3    provider error (network, timeout, RPC failure)

ENVIRONMENT VARIABLES:
    AUDIT_RPC_A    Default URL for provider A
    AUDIT_RPC_B    Default URL for provider B

CONFIG FILE:
    Default: ~/.config/eth-log-audit/config.toml
"#)]
struct Cli {
    /// Provider A URL
    #[arg(long, env = "AUDIT_RPC_A")]
    rpc_a: Option<String>,

    /// Provider B URL
    #[arg(long, env = "AUDIT_RPC_B")]
    rpc_b: Option<String>,

    /// Contract address to filter on (can be repeated; omit for any)
    #[arg(short = 'a', long = "address", action = clap::ArgAction::Append)]
    addresses: Vec<String>,

    /// Event signature hash (topic0) to filter on (omit for any)
    #[arg(long)]
    topic0: Option<String>,

    /// Start block number (inclusive)
    #[arg(short = 'f', long, default_value = "0")]
    from_block: u64,

    /// End block number (inclusive) or "latest"
    #[arg(short = 't', long, default_value = "latest")]
    to_block: String,

    /// Request timeout in seconds [default: 20]
    #[arg(long)]
    timeout: Option<u64>,

    /// Max blocks per getLogs request for both providers (0 = unlimited)
    #[arg(long)]
    max_block_range: Option<u64>,

    /// Emit JSON report instead of human-readable output
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress status output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    match run(&cli).await {
        Ok(consistent) => std::process::exit(if consistent { 0 } else { 1 }),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Run the audit; returns the consistency verdict.
async fn run(cli: &Cli) -> Result<bool> {
    let mut config = build_config(cli)?;
    config.normalize();

    if !cli.quiet {
        eprintln!(
            "Auditing blocks [{}, {}] across 2 providers...",
            config.from_block,
            match config.to_block {
                BlockNumber::Number(n) => n.to_string(),
                BlockNumber::Latest => "latest".to_string(),
            }
        );
    }

    let report = Auditor::new(config)?.run().await?;

    if cli.json {
        println!("{}", report.render_json()?);
    } else {
        print!("{}", report.render_human());
    }

    Ok(report.consistent)
}

/// Merge CLI flags, environment, and config file into an AuditConfig.
///
/// Precedence: CLI/env (clap merges those), then config file, then error.
fn build_config(cli: &Cli) -> Result<AuditConfig> {
    let config_file = ConfigFile::load_default()?.unwrap_or_default();

    let provider = |flag: &Option<String>,
                    file_default: &Option<ProviderConfig>,
                    flag_name: &str,
                    env_name: &str|
     -> Result<ProviderConfig> {
        if let Some(url) = flag {
            Ok(ProviderConfig::new(url.clone())?)
        } else if let Some(p) = file_default {
            Ok(p.clone())
        } else {
            Err(Error::Config(ConfigError::InvalidUrl(format!(
                "provider URL not set; use {} / {} or the config file",
                flag_name, env_name
            ))))
        }
    };

    let mut provider_a = provider(&cli.rpc_a, &config_file.provider_a, "--rpc-a", "AUDIT_RPC_A")?;
    let mut provider_b = provider(&cli.rpc_b, &config_file.provider_b, "--rpc-b", "AUDIT_RPC_B")?;

    if let Some(range) = cli.max_block_range {
        provider_a = provider_a.with_max_block_range(range);
        provider_b = provider_b.with_max_block_range(range);
    }

    let addresses = cli
        .addresses
        .iter()
        .map(|s| parse_address(s))
        .collect::<Result<Vec<_>>>()?;

    let topic0 = cli.topic0.as_deref().map(parse_topic).transpose()?;

    let to_block: BlockNumber = cli.to_block.parse().map_err(Error::Config)?;

    let timeout_secs = effective_timeout(cli.timeout, config_file.settings.timeout_seconds);

    Ok(AuditConfig {
        provider_a,
        provider_b,
        addresses,
        topic0,
        from_block: cli.from_block,
        to_block,
        timeout_secs,
    })
}

/// An explicit --timeout always wins; otherwise the config file value
/// (which itself defaults to 20) applies.
fn effective_timeout(flag: Option<u64>, file_value: u64) -> u64 {
    flag.unwrap_or(file_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_flag_wins_over_config_file() {
        assert_eq!(effective_timeout(Some(20), 45), 20);
        assert_eq!(effective_timeout(Some(5), 45), 5);
    }

    #[test]
    fn test_timeout_falls_back_to_config_file() {
        assert_eq!(effective_timeout(None, 45), 45);
    }
}

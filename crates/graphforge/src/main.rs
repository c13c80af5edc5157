use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use graphforge_cloud_cloudflare::{CloudflareDns, DnsConfig};
use graphforge_cloud_hetzner::HetznerProvider;
use graphforge_config::Settings;
use graphforge_remote::OpenSsh;
use graphforge_workflow::{Orchestrator, WorkflowConfig};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "graphforge")]
#[command(about = "Golden-image and client provisioning for managed graph databases", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the golden snapshot on a disposable builder VM
    Snapshot {
        /// Zone to place the builder in (europe, asia, us)
        #[arg(long)]
        zone: Option<String>,
        /// Explicit region, overriding zone-based selection
        #[arg(long)]
        region: Option<String>,
        /// Try an explicit --region alone (true) or fall back to the rest
        /// of its zone on capacity errors (false)
        #[arg(long)]
        pin_region: Option<bool>,
    },
    /// Provision a client instance from the golden snapshot
    Provision {
        /// Zone to place the instance in (europe, asia, us)
        #[arg(long)]
        zone: Option<String>,
        /// Explicit region, overriding zone-based selection
        #[arg(long)]
        region: Option<String>,
        /// Try an explicit --region alone (true) or fall back to the rest
        /// of its zone on capacity errors (false)
        #[arg(long)]
        pin_region: Option<bool>,
    },
}

impl Commands {
    fn pin_region(&self) -> Option<bool> {
        match self {
            Commands::Snapshot { pin_region, .. } | Commands::Provision { pin_region, .. } => {
                *pin_region
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("loading configuration from environment")?;

    let provider = Arc::new(HetznerProvider::new(settings.hetzner_api_token.clone()));
    let dns = Arc::new(CloudflareDns::new(DnsConfig {
        api_token: settings.cloudflare_api_token.clone(),
        zone_id: settings.cloudflare_zone_id.clone(),
        domain: settings.base_domain.clone(),
    }));
    let runner = Arc::new(OpenSsh::new());

    // the flag overrides the GRAPHFORGE_PIN_REGION environment default
    let mut config = WorkflowConfig::from(&settings);
    if let Some(pin) = cli.command.pin_region() {
        config.pin_explicit_region = pin;
    }
    let orchestrator = Orchestrator::new(provider, runner, dns, config);

    match cli.command {
        Commands::Snapshot { zone, region, .. } => {
            let image = orchestrator
                .build_golden_image(zone.as_deref(), region.as_deref())
                .await?;
            println!();
            println!("{} {}", "Snapshot:".bold(), image.description);
            println!("{} {}", "Image id:".bold(), image.id.green());
        }
        Commands::Provision { zone, region, .. } => {
            let instance = orchestrator
                .provision_client(zone.as_deref(), region.as_deref())
                .await?;
            println!();
            println!("{} {}", "Hostname:".bold(), instance.fqdn.green());
            println!("{} {}", "Browser:".bold(), instance.browser_url);
            println!("{} {}", "Connect:".bold(), instance.connect_uri);
            println!("{} {}", "User:".bold(), instance.user);
            println!("{} {}", "Password:".bold(), instance.password_note.dimmed());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_region_flag_parses_on_both_subcommands() {
        let cli = Cli::try_parse_from([
            "graphforge",
            "provision",
            "--region",
            "nbg1",
            "--pin-region",
            "false",
        ])
        .unwrap();
        assert_eq!(cli.command.pin_region(), Some(false));

        let cli =
            Cli::try_parse_from(["graphforge", "snapshot", "--pin-region", "true"]).unwrap();
        assert_eq!(cli.command.pin_region(), Some(true));
    }

    #[test]
    fn pin_region_defaults_to_the_environment_setting() {
        let cli = Cli::try_parse_from(["graphforge", "snapshot", "--zone", "europe"]).unwrap();
        assert_eq!(cli.command.pin_region(), None);
    }
}

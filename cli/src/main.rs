//! Mintgate CLI - stake-gated registration from the terminal
//!
//! Two registration paths: a pre-issued invite code, or proof of having
//! staked an NFT for at least a week. Endpoints come from a TOML config
//! file or `MINTGATE_*` environment variables.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mintgate_client::{
    ChainReader, HttpVerificationClient, RpcChainReader, RpcWalletProvider, VerificationApi,
    WalletProvider,
};
use mintgate_core::{evaluate, remaining_days, GateConfig};
use mintgate_registration::{CheckOutcome, InviteFlow, NftFlow, StakeStatus};
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "mintgate")]
#[command(about = "Stake-gated registration client", version)]
struct Cli {
    /// Path to a TOML config file; falls back to MINTGATE_* env vars
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the staking status of a token
    StakeStatus {
        /// NFT token ID to query
        #[arg(short, long)]
        token_id: u64,
    },

    /// Register with an invite code
    RegisterInvite,

    /// Register with a staked NFT
    RegisterNft,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GateConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => GateConfig::from_env().context("failed to load config from environment")?,
    };

    match cli.command {
        Commands::StakeStatus { token_id } => stake_status(&config, token_id).await,
        Commands::RegisterInvite => register_invite(&config).await,
        Commands::RegisterNft => register_nft(&config).await,
    }
}

async fn stake_status(config: &GateConfig, token_id: u64) -> Result<()> {
    let reader = RpcChainReader::new(config)?;
    let record = reader.get_stake_record(token_id).await?;
    let eligibility = evaluate(&record, unix_now());

    println!("\n🔒 Staking Status for token {}", token_id);
    println!("═══════════════════════════════════");
    if !record.is_staked {
        println!("NFT is not staked");
    } else if eligibility.is_eligible {
        println!("NFT is staked");
        println!("Staking requirement met!");
    } else {
        println!("NFT is staked");
        println!(
            "Time remaining: {} days",
            remaining_days(eligibility.remaining_wait_secs)
        );
    }

    // The contract exposes its own eligibility view; disagreement usually
    // means local clock skew.
    let contract_view = reader.meets_staking_requirement(token_id).await?;
    if contract_view != eligibility.is_eligible {
        log::warn!(
            "⚠️ Contract eligibility ({}) disagrees with local evaluation ({})",
            contract_view,
            eligibility.is_eligible
        );
    }
    println!();
    Ok(())
}

async fn register_invite(config: &GateConfig) -> Result<()> {
    let api = HttpVerificationClient::new(config)?;
    let mut flow = InviteFlow::new(config);

    println!("\n📨 Invite Registration");
    println!("═══════════════════════════════════");

    // Step 1: verify the code
    loop {
        let code = prompt("Invite code: ")?;
        match flow.submit_code(&code, &api).await {
            Ok(()) => {
                println!("✅ Code verified. Please complete registration.");
                break;
            }
            Err(e) => println!("❌ {}", e),
        }
    }

    // Step 2: details with availability checks
    loop {
        let email = prompt("Email address: ")?;
        match flow.set_email(&email) {
            Some(ticket) => {
                let outcome = match api.check_email_available(&ticket.value).await {
                    Ok(availability) => CheckOutcome::from(availability),
                    Err(e) => CheckOutcome::Errored(e.to_string()),
                };
                flow.apply_email_check(&ticket, outcome.clone());
                match outcome {
                    CheckOutcome::Available => break,
                    CheckOutcome::Conflict(msg) | CheckOutcome::Errored(msg) => {
                        println!("❌ {}", msg)
                    }
                }
            }
            None => println!("❌ Invalid email address"),
        }
    }

    let provider = connect_provider(config)?;
    loop {
        let entered = prompt("Wallet address (blank to connect wallet): ")?;
        let ticket = if entered.is_empty() {
            match flow.connect_wallet(provider.as_ref()).await {
                Ok(ticket) => ticket,
                Err(e) => {
                    println!("❌ {}", e);
                    continue;
                }
            }
        } else {
            flow.set_wallet_address(&entered)
        };

        match ticket {
            Some(ticket) => {
                let outcome = match api.check_wallet_available(&ticket.value).await {
                    Ok(availability) => CheckOutcome::from(availability),
                    Err(e) => CheckOutcome::Errored(e.to_string()),
                };
                flow.apply_wallet_check(&ticket, outcome.clone());
                match outcome {
                    CheckOutcome::Available => break,
                    CheckOutcome::Conflict(msg) | CheckOutcome::Errored(msg) => {
                        println!("❌ {}", msg)
                    }
                }
            }
            None => println!("❌ Invalid wallet address"),
        }
    }

    match flow.submit(provider.as_ref(), &api).await {
        Ok(()) => println!("\n🎉 Registration completed successfully.\n"),
        Err(e) => println!("\n❌ Registration failed: {}\n", e),
    }
    Ok(())
}

async fn register_nft(config: &GateConfig) -> Result<()> {
    let api = HttpVerificationClient::new(config)?;
    let reader = RpcChainReader::new(config)?;
    let mut flow = NftFlow::new();

    println!("\n🖼️ NFT Registration");
    println!("═══════════════════════════════════");

    loop {
        let raw = prompt("Token ID: ")?;
        let ticket = match flow.set_token_id(&raw) {
            Ok(ticket) => ticket,
            Err(e) => {
                println!("❌ {}", e);
                continue;
            }
        };

        println!("Checking staking status...");
        flow.run_stake_check(&ticket, &reader, unix_now()).await;
        println!("{}", flow.stake_status());

        if matches!(flow.stake_status(), StakeStatus::Eligible) {
            break;
        }
    }

    loop {
        let email = prompt("Email address: ")?;
        flow.set_email(&email);
        if mintgate_core::validate_email(&email).is_ok() {
            break;
        }
        println!("❌ Invalid email address");
    }

    let provider = connect_provider(config)?;
    loop {
        let entered = prompt("Wallet address (blank to connect wallet): ")?;
        if entered.is_empty() {
            match flow.connect_wallet(provider.as_ref()).await {
                Ok(()) => break,
                Err(e) => println!("❌ {}", e),
            }
        } else {
            flow.set_wallet_address(&entered);
            if mintgate_core::validate_wallet_address(&entered).is_ok() {
                break;
            }
            println!("❌ Invalid wallet address");
        }
    }

    match flow.submit(provider.as_ref(), &api).await {
        Ok(()) => println!("\n🎉 Registration completed successfully.\n"),
        Err(e) => println!("\n❌ Registration failed: {}\n", e),
    }
    Ok(())
}

/// Builds the wallet provider, surfacing the distinct "provider not found"
/// condition before any flow work starts.
fn connect_provider(config: &GateConfig) -> Result<Box<dyn WalletProvider>> {
    let provider = RpcWalletProvider::from_config(config)?;
    Ok(Box::new(provider))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

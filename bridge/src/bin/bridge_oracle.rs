use std::{path::PathBuf, str::FromStr};

use alloy::primitives::{Address, U256};
use anyhow::{Result, anyhow};
use bridge::{
    cfg::read_config,
    claim::ClaimRequest,
    crypto::{OracleSignature, SecretKey},
    message::Attestation,
    signers::SignerRegistry,
    verifier::ClaimVerifier,
};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Oracle tooling for bridge claims: derive signer addresses, attest to deposits and check signature bundles.
#[derive(Parser, Debug)]
#[clap(about)]
struct Cli {
    #[clap(long, default_value = "false")]
    log_json: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the signer address of a secret key.
    Address {
        #[arg(value_parser = SecretKey::from_hex)]
        secret_key: SecretKey,
    },
    /// Sign a deposit for redemption on the destination bridge and print the attestation as JSON.
    Sign(SignArgs),
    /// Check a signature bundle against the signers and threshold of a bridge configuration.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct SignArgs {
    #[arg(value_parser = SecretKey::from_hex)]
    secret_key: SecretKey,
    /// Address of the destination bridge.
    #[clap(long, value_parser = parse_address)]
    bridge: Address,
    #[clap(long, default_value = "0")]
    app_id: u64,
    #[command(flatten)]
    claim: ClaimArgs,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Configuration of the destination bridge.
    #[clap(long, short, default_value = "config.toml")]
    config_file: PathBuf,
    #[command(flatten)]
    claim: ClaimArgs,
    /// A 65-byte hex signature. May be repeated.
    #[clap(long = "signature", value_parser = OracleSignature::from_hex)]
    signatures: Vec<OracleSignature>,
}

#[derive(Args, Debug)]
struct ClaimArgs {
    #[clap(long, value_parser = parse_address)]
    user: Address,
    /// Net amount recorded by the source bridge.
    #[clap(long, value_parser = parse_amount)]
    amount: U256,
    #[clap(long)]
    from_chain: u64,
    #[clap(long)]
    to_chain: u64,
    #[clap(long)]
    token_id: u64,
    #[clap(long)]
    tx_id: u64,
}

impl From<ClaimArgs> for ClaimRequest {
    fn from(args: ClaimArgs) -> Self {
        ClaimRequest {
            user: args.user,
            amount: args.amount,
            from_chain: args.from_chain,
            to_chain: args.to_chain,
            token_id: args.token_id,
            tx_id: args.tx_id,
        }
    }
}

fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s).map_err(|e| anyhow!("invalid address {s}: {e}"))
}

fn parse_amount(s: &str) -> Result<U256> {
    let digits: String = s.chars().filter(|c| *c != '_').collect();
    U256::from_str(&digits).map_err(|e| anyhow!("invalid amount {s}: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Command::Address { secret_key } => {
            println!("{}", secret_key.address());
        }
        Command::Sign(args) => {
            let request = ClaimRequest::from(args.claim);
            let message = request.message(args.bridge, args.app_id);
            let attestation = Attestation::new(&message, &args.secret_key)?;
            info!(
                signer = %attestation.signer,
                message_hash = %attestation.message_hash,
                "deposit attested"
            );
            println!("{}", serde_json::to_string_pretty(&attestation)?);
        }
        Command::Verify(args) => {
            let config = read_config(&args.config_file)?;
            let request = ClaimRequest::from(args.claim);
            let message = request.message(config.address, config.app_id);
            let registry = SignerRegistry::new(config.signers.iter().copied());
            if registry.is_empty() {
                warn!(config = %args.config_file.display(), "no oracle signers configured");
            }
            let verifier = ClaimVerifier::new(&registry, config.min_required_signatures);

            for signer in verifier.valid_signers(&message, &args.signatures) {
                println!("{signer}");
            }
            verifier.verify(&message, &args.signatures)?;
            info!(message_hash = %message.hash(), "quorum met");
        }
    }

    Ok(())
}

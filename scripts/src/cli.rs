//! Definitions of CLI arguments and commands for deploy scripts

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy_river, print_withdrawal_credentials},
    constants::{
        DEFAULT_DEPLOYMENTS_PATH, DEFAULT_GLOBAL_FEE, DEFAULT_OPERATOR_REWARDS_SHARE,
        WITHDRAW_CONTRACT_NAME,
    },
    errors::ScriptError,
};

/// Scripts for deploying & initializing the River contracts
#[derive(Parser)]
pub struct Cli {
    /// Path to the `deployments.json` file addresses are read from & recorded in
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts that can be run
#[derive(Subcommand)]
pub enum Command {
    /// Deploy or upgrade River
    DeployRiver(DeployRiverArgs),
    /// Print the withdrawal credentials pointing at an address
    WithdrawalCredentials(WithdrawalCredentialsArgs),
}

impl Command {
    /// Run the script
    pub async fn run(self, deployments_path: &Path) -> Result<(), ScriptError> {
        match self {
            Command::DeployRiver(args) => deploy_river(args, deployments_path).await,
            Command::WithdrawalCredentials(args) => {
                print_withdrawal_credentials(args, deployments_path)
            }
        }
    }
}

/// The arguments needed to send transactions
#[derive(Args)]
pub struct RpcArgs {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,
}

/// Deploy River behind a `TUPProxy`, or upgrade the existing proxy.
///
/// River is initialized with withdrawal credentials pointing at the
/// `WithdrawV1` contract recorded in the deployments file.
#[derive(Args)]
pub struct DeployRiverArgs {
    /// The RPC connection & signer
    #[command(flatten)]
    pub rpc: RpcArgs,

    /// Path to the JSON file holding the named accounts
    #[arg(short, long)]
    pub accounts: PathBuf,

    /// Directory holding the `RiverV1` & `TUPProxy` compilation artifacts
    #[arg(long)]
    pub artifacts_dir: PathBuf,

    /// The global fee River is initialized with
    #[arg(long, default_value_t = DEFAULT_GLOBAL_FEE)]
    pub global_fee: u64,

    /// The operator rewards share River is initialized with
    #[arg(long, default_value_t = DEFAULT_OPERATOR_REWARDS_SHARE)]
    pub operator_rewards_share: u64,
}

/// Print the withdrawal credentials pointing at an address
#[derive(Args)]
pub struct WithdrawalCredentialsArgs {
    /// The `0x`-prefixed address the credentials point at.
    /// Takes precedence over `--deployment`.
    #[arg(long)]
    pub address: Option<String>,

    /// The deployed contract whose address the credentials point at
    #[arg(long, default_value = WITHDRAW_CONTRACT_NAME)]
    pub deployment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_river_defaults() {
        let cli = Cli::try_parse_from([
            "river-scripts",
            "deploy-river",
            "--priv-key",
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            "--rpc-url",
            "http://127.0.0.1:8545",
            "--accounts",
            "accounts.json",
            "--artifacts-dir",
            "artifacts",
        ])
        .unwrap();

        assert_eq!(cli.deployments_path, PathBuf::from(DEFAULT_DEPLOYMENTS_PATH));
        let Command::DeployRiver(args) = cli.command else {
            panic!("expected deploy-river");
        };
        assert_eq!(args.rpc.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(args.accounts, PathBuf::from("accounts.json"));
        assert_eq!(args.global_fee, 500);
        assert_eq!(args.operator_rewards_share, 50_000);
    }

    #[test]
    fn test_withdrawal_credentials_defaults() {
        let cli = Cli::try_parse_from([
            "river-scripts",
            "--deployments-path",
            "deployments.devnet.json",
            "withdrawal-credentials",
        ])
        .unwrap();

        assert_eq!(cli.deployments_path, PathBuf::from("deployments.devnet.json"));
        let Command::WithdrawalCredentials(args) = cli.command else {
            panic!("expected withdrawal-credentials");
        };
        assert_eq!(args.address, None);
        assert_eq!(args.deployment, "WithdrawV1");
    }
}

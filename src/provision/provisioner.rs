//! Token provisioning orchestrator
//!
//! The workflow issues a fixed series of privileged calls, each keyed on the
//! address the previous one produced. Once the mint exists nothing is
//! retried or rolled back: a failure stops the run and the result reports
//! what was already created.

use super::execution_log::{ExecutionLog, COMPLETION_MESSAGE};
use super::result::{
    CreationFailure, CreationResult, CreationSuccess, RevocationOutcome, RevocationResults, Step,
};
use crate::core::{Authority, Network};
use crate::storage::{StorageError, Workspace};
use crate::token::{TokenMetadata, TokenRequest, ValidationError};
use crate::tool::ledger::parse_sol_balance;
use crate::tool::{
    AddressExtractor, AddressKind, CommandRunner, ExtractionError, LedgerCli, OutputFormat,
    ToolError, ToolInvocation, ToolOutput, ToolPaths,
};
use std::path::Path;
use thiserror::Error;

/// Minimum wallet balance, in SOL, required before anything is created
pub const MIN_SOL_BALANCE: f64 = 0.01;

/// Provisioning errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Tool(#[from] ToolError),
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    #[error("Insufficient SOL balance for token creation: have {balance} SOL, need {required} SOL")]
    InsufficientFunds { balance: f64, required: f64 },
    #[error("Could not read wallet balance from output: {0:?}")]
    BalanceParse(String),
}

/// Provisioner configuration
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    pub workspace: Workspace,
    pub network: Network,
    pub tools: ToolPaths,
    pub output_format: OutputFormat,
    pub min_balance: f64,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            workspace: Workspace::default(),
            network: Network::default(),
            tools: ToolPaths::default(),
            output_format: OutputFormat::default(),
            min_balance: MIN_SOL_BALANCE,
        }
    }
}

/// Addresses accumulated by one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    /// Step currently executing (or that failed)
    pub step: Option<Step>,
    pub mint: Option<String>,
    pub account: Option<String>,
}

/// Runs token creation workflows
pub struct TokenProvisioner<R: CommandRunner> {
    runner: R,
    cli: LedgerCli,
    extractor: Box<dyn AddressExtractor>,
    workspace: Workspace,
    network: Network,
    min_balance: f64,
}

impl<R: CommandRunner> TokenProvisioner<R> {
    /// Create a provisioner using the extractor matching the configured output format
    pub fn new(config: ProvisionerConfig, runner: R) -> Self {
        let extractor = config.output_format.extractor();
        Self {
            runner,
            cli: LedgerCli::new(config.tools, config.network, config.output_format),
            extractor,
            workspace: config.workspace,
            network: config.network,
            min_balance: config.min_balance,
        }
    }

    /// Swap the extraction strategy, e.g. for a different tool release.
    ///
    /// The tools are asked for whatever output format the extractor reads.
    pub fn with_extractor(mut self, extractor: Box<dyn AddressExtractor>) -> Self {
        self.cli.set_format(extractor.format());
        self.extractor = extractor;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Validate the request and run the workflow.
    ///
    /// `Err` means nothing ran: the request was invalid, another run holds
    /// the directory, or the log could not be created. Every outcome after
    /// that, good or bad, is an `Ok(CreationResult)`.
    pub fn provision(&mut self, request: &TokenRequest) -> Result<CreationResult, ProvisionError> {
        request.validate()?;

        let _lock = self.workspace.lock()?;
        let log = ExecutionLog::create(&self.workspace.log_path(), self.network)
            .map_err(StorageError::from)?;

        let run = WorkflowRun {
            runner: &mut self.runner,
            cli: &self.cli,
            extractor: self.extractor.as_ref(),
            workspace: &self.workspace,
            min_balance: self.min_balance,
            log,
            state: WorkflowState::default(),
        };

        Ok(run.complete(request))
    }
}

/// Run `invocation`, logging the command and its output or failure
pub fn run_logged<R: CommandRunner + ?Sized>(
    runner: &mut R,
    log: &mut ExecutionLog,
    invocation: &ToolInvocation,
) -> Result<ToolOutput, ToolError> {
    log.record(format!("Executing: {}", invocation));

    match runner.run(invocation) {
        Ok(output) => {
            let stdout = output.stdout.trim();
            if !stdout.is_empty() {
                log.record(format!("Output: {}", stdout));
            }
            Ok(output)
        }
        Err(e) => {
            log.warn(e.to_string());
            Err(e)
        }
    }
}

/// Permanently disable one authority on `mint`. Never retried.
pub fn revoke_authority<R: CommandRunner + ?Sized>(
    runner: &mut R,
    cli: &LedgerCli,
    log: &mut ExecutionLog,
    wallet: &Path,
    mint: &str,
    authority: Authority,
) -> RevocationOutcome {
    log.record(format!("Revoking {}...", authority.label().to_lowercase()));

    match run_logged(runner, log, &cli.disable_authority(wallet, mint, authority)) {
        Ok(_) => {
            log.record(format!("{} revoked successfully", authority.label()));
            RevocationOutcome::revoked()
        }
        Err(e) => {
            log.warn(format!(
                "Failed to revoke {}: {}",
                authority.label().to_lowercase(),
                e
            ));
            RevocationOutcome::failed(e.to_string())
        }
    }
}

/// State and collaborators for a single run
struct WorkflowRun<'a, R: CommandRunner> {
    runner: &'a mut R,
    cli: &'a LedgerCli,
    extractor: &'a dyn AddressExtractor,
    workspace: &'a Workspace,
    min_balance: f64,
    log: ExecutionLog,
    state: WorkflowState,
}

impl<'a, R: CommandRunner> WorkflowRun<'a, R> {
    fn complete(mut self, request: &TokenRequest) -> CreationResult {
        self.log.record(format!(
            "Starting token creation process for '{}' ({})",
            request.name, request.symbol
        ));

        match self.execute(request) {
            Ok(success) => {
                self.log.record(COMPLETION_MESSAGE);
                CreationResult::Success(success)
            }
            Err(e) => {
                self.log.warn(format!("Token creation failed: {}", e));
                CreationResult::Failure(CreationFailure {
                    error: e.to_string(),
                    failed_step: self.state.step,
                    mint_address: self.state.mint.take(),
                    token_account: self.state.account.take(),
                    network: self.cli.network(),
                })
            }
        }
    }

    fn execute(&mut self, request: &TokenRequest) -> Result<CreationSuccess, ProvisionError> {
        let wallet = request.wallet_path.as_path();

        self.step(Step::BalanceCheck, |run| run.check_balance(wallet))?;
        let mint = self.step(Step::CreateMint, |run| run.create_mint(wallet, request.decimals))?;
        let account = self.step(Step::CreateAccount, |run| run.create_account(wallet, &mint))?;
        self.step(Step::MintTokens, |run| {
            run.mint_tokens(wallet, &mint, &account, request.supply)
        })?;
        let metadata = self.step(Step::RecordMetadata, |run| run.record_metadata(request, &mint))?;

        self.state.step = Some(Step::Verify);
        let verified = self.verify(&mint, &account);

        self.state.step = Some(Step::RevokeAuthorities);
        let mut authority_revocation = RevocationResults::default();
        for authority in request.revocations() {
            let outcome = revoke_authority(
                &mut *self.runner,
                self.cli,
                &mut self.log,
                wallet,
                &mint,
                authority,
            );
            authority_revocation.set(authority, outcome);
        }

        Ok(CreationSuccess {
            mint_address: mint,
            token_account: account,
            metadata,
            verified,
            authority_revocation,
            network: self.cli.network(),
        })
    }

    /// Enter `step`, run it and log a failure before handing it back
    fn step<T>(
        &mut self,
        step: Step,
        f: impl FnOnce(&mut Self) -> Result<T, ProvisionError>,
    ) -> Result<T, ProvisionError> {
        self.state.step = Some(step);
        f(self).map_err(|e| {
            self.log.warn(format!("Failed at {}: {}", step, e));
            e
        })
    }

    fn exec(&mut self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        run_logged(&mut *self.runner, &mut self.log, invocation)
    }

    fn check_balance(&mut self, wallet: &Path) -> Result<f64, ProvisionError> {
        let output = self.exec(&self.cli.wallet_balance(wallet))?;
        let balance = parse_sol_balance(&output.stdout)
            .ok_or_else(|| ProvisionError::BalanceParse(output.stdout.trim().to_string()))?;

        self.log.record(format!("Wallet balance: {} SOL", balance));

        if balance < self.min_balance {
            return Err(ProvisionError::InsufficientFunds {
                balance,
                required: self.min_balance,
            });
        }

        Ok(balance)
    }

    fn create_mint(&mut self, wallet: &Path, decimals: u8) -> Result<String, ProvisionError> {
        self.log.record("Creating token mint...");

        let output = self.exec(&self.cli.create_token(wallet, decimals))?;
        let mint = self.extractor.extract(AddressKind::Mint, &output.stdout)?;
        self.state.mint = Some(mint.clone());
        self.log.record(format!("Token mint created: {}", mint));

        let path = self.workspace.save_mint_address(&mint)?;
        self.log
            .record(format!("Mint address saved to {}", path.display()));

        Ok(mint)
    }

    fn create_account(&mut self, wallet: &Path, mint: &str) -> Result<String, ProvisionError> {
        self.log.record("Creating token account...");

        let output = self.exec(&self.cli.create_account(wallet, mint))?;
        let account = self.extractor.extract(AddressKind::Account, &output.stdout)?;
        self.state.account = Some(account.clone());
        self.log.record(format!("Token account created: {}", account));

        Ok(account)
    }

    fn mint_tokens(
        &mut self,
        wallet: &Path,
        mint: &str,
        account: &str,
        amount: u64,
    ) -> Result<(), ProvisionError> {
        self.log.record(format!("Minting {} tokens...", amount));
        self.exec(&self.cli.mint_to(wallet, mint, amount, account))?;
        self.log.record(format!("Successfully minted {} tokens", amount));
        Ok(())
    }

    fn record_metadata(
        &mut self,
        request: &TokenRequest,
        mint: &str,
    ) -> Result<TokenMetadata, ProvisionError> {
        self.log.record("Creating token metadata...");

        let metadata = TokenMetadata::from_request(request, mint, self.cli.network());
        let path = self.workspace.save_metadata(&metadata)?;
        self.log
            .record(format!("Metadata created and saved to {}", path.display()));

        Ok(metadata)
    }

    /// Re-query supply and balance. Failures only downgrade the result.
    fn verify(&mut self, mint: &str, account: &str) -> bool {
        self.log.record("Verifying token creation...");

        let supply = match self.exec(&self.cli.supply(mint)) {
            Ok(output) => output.stdout.trim().to_string(),
            Err(e) => {
                self.log.warn(format!("Token verification failed: {}", e));
                return false;
            }
        };
        self.log.record(format!("Token supply: {}", supply));

        match self.exec(&self.cli.account_balance(account)) {
            Ok(output) => {
                self.log
                    .record(format!("Token account balance: {}", output.stdout.trim()));
                true
            }
            Err(e) => {
                self.log.warn(format!("Token verification failed: {}", e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::fake::ScriptedRunner;
    use crate::tool::JsonFieldExtractor;

    const MINT: &str = "So11111111111111111111111111111111111111112";
    const ACCOUNT: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    struct Fixture {
        dir: tempfile::TempDir,
        wallet: std::path::PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let wallet = dir.path().join("id.json");
            std::fs::write(&wallet, "[0,0,0]").unwrap();
            Self { dir, wallet }
        }

        fn provisioner(&self, runner: ScriptedRunner) -> TokenProvisioner<ScriptedRunner> {
            let config = ProvisionerConfig {
                workspace: Workspace::new(self.dir.path().join("work")).unwrap(),
                ..Default::default()
            };
            TokenProvisioner::new(config, runner)
        }

        fn request(&self) -> TokenRequest {
            TokenRequest::new("Test", "TST", &self.wallet)
                .with_supply(500)
                .with_decimals(6)
        }
    }

    fn success(result: CreationResult) -> CreationSuccess {
        match result {
            CreationResult::Success(s) => s,
            CreationResult::Failure(f) => panic!("expected success, got {:?}", f),
        }
    }

    fn failure(result: CreationResult) -> CreationFailure {
        match result {
            CreationResult::Failure(f) => f,
            CreationResult::Success(s) => panic!("expected failure, got {:?}", s),
        }
    }

    #[test]
    fn test_end_to_end_success() {
        let fx = Fixture::new();
        let mut provisioner = fx.provisioner(ScriptedRunner::happy_path());

        let result = success(provisioner.provision(&fx.request()).unwrap());

        assert_eq!(result.mint_address, MINT);
        assert_eq!(result.token_account, ACCOUNT);
        assert!(result.verified);
        assert!(result.authority_revocation.is_empty());

        let stored = provisioner.workspace().load_metadata().unwrap();
        assert_eq!(stored.decimals, 6);
        assert_eq!(stored.name, "Test");
        assert_eq!(stored.mint, MINT);
        assert_eq!(
            provisioner.workspace().load_mint_address().as_deref(),
            Some(MINT)
        );

        assert_eq!(
            provisioner.runner().keys(),
            vec![
                "solana balance",
                "spl-token create-token",
                "spl-token create-account",
                "spl-token mint",
                "spl-token supply",
                "spl-token balance",
            ]
        );

        let log = provisioner.workspace().read_log().unwrap();
        assert!(log.contains("Starting token creation process for 'Test' (TST)"));
        assert!(log.contains(COMPLETION_MESSAGE));
        assert!(provisioner.workspace().lock().is_ok());
    }

    #[test]
    fn test_mint_receives_amount_and_account() {
        let fx = Fixture::new();
        let mut provisioner = fx.provisioner(ScriptedRunner::happy_path());
        provisioner.provision(&fx.request()).unwrap();

        let mint_call = provisioner
            .runner()
            .calls
            .iter()
            .find(|c| c.subcommand() == Some("mint"))
            .unwrap();
        assert_eq!(mint_call.args[1..4], [MINT, "500", ACCOUNT]);

        let create_call = &provisioner.runner().calls[1];
        assert!(create_call.args.windows(2).any(|w| w == ["--decimals", "6"]));
    }

    #[test]
    fn test_invalid_decimals_spawns_nothing() {
        let fx = Fixture::new();
        let mut provisioner = fx.provisioner(ScriptedRunner::happy_path());

        for decimals in [10u8, 42, 255] {
            let result = provisioner.provision(&fx.request().with_decimals(decimals));
            assert!(matches!(
                result,
                Err(ProvisionError::Validation(ValidationError::InvalidDecimals(_)))
            ));
        }
        assert!(provisioner.runner().calls.is_empty());
        assert!(!provisioner.workspace().log_path().exists());
    }

    #[test]
    fn test_zero_supply_spawns_nothing() {
        let fx = Fixture::new();
        let mut provisioner = fx.provisioner(ScriptedRunner::happy_path());

        let result = provisioner.provision(&fx.request().with_supply(0));
        assert!(matches!(
            result,
            Err(ProvisionError::Validation(ValidationError::InvalidSupply))
        ));
        assert!(provisioner.runner().calls.is_empty());
    }

    #[test]
    fn test_insufficient_balance_stops_before_mint() {
        let fx = Fixture::new();
        let runner = ScriptedRunner::happy_path().replace_ok("solana balance", "0.005 SOL");
        let mut provisioner = fx.provisioner(runner);

        let result = failure(provisioner.provision(&fx.request()).unwrap());

        assert_eq!(result.failed_step, Some(Step::BalanceCheck));
        assert!(result.error.contains("Insufficient SOL balance"));
        assert_eq!(provisioner.runner().keys(), vec!["solana balance"]);
        assert!(!provisioner.runner().called("spl-token create-token"));

        let log = provisioner.workspace().read_log().unwrap();
        assert!(log.contains("Token creation failed"));
    }

    #[test]
    fn test_balance_query_failure_aborts() {
        let fx = Fixture::new();
        let runner =
            ScriptedRunner::happy_path().replace_fail("solana balance", "Error: RPC unreachable");
        let mut provisioner = fx.provisioner(runner);

        let result = failure(provisioner.provision(&fx.request()).unwrap());
        assert_eq!(result.failed_step, Some(Step::BalanceCheck));
        assert!(result.error.contains("RPC unreachable"));
        assert_eq!(provisioner.runner().calls.len(), 1);
    }

    #[test]
    fn test_missing_mint_marker_stops_before_account() {
        let fx = Fixture::new();
        let runner =
            ScriptedRunner::happy_path().replace_ok("spl-token create-token", "Signature: 4sig\n");
        let mut provisioner = fx.provisioner(runner);

        let result = failure(provisioner.provision(&fx.request()).unwrap());

        assert_eq!(result.failed_step, Some(Step::CreateMint));
        assert!(result.error.contains("Could not extract token mint address"));
        assert_eq!(result.mint_address, None);
        assert!(!provisioner.runner().called("spl-token create-account"));
        assert!(provisioner.workspace().read_log().is_some());
    }

    #[test]
    fn test_account_failure_reports_existing_mint() {
        let fx = Fixture::new();
        let runner = ScriptedRunner::happy_path()
            .replace_fail("spl-token create-account", "Error: insufficient funds for rent");
        let mut provisioner = fx.provisioner(runner);

        let result = failure(provisioner.provision(&fx.request()).unwrap());

        assert_eq!(result.failed_step, Some(Step::CreateAccount));
        assert_eq!(result.mint_address.as_deref(), Some(MINT));
        assert_eq!(result.token_account, None);
        assert!(!provisioner.runner().called("spl-token mint"));
    }

    #[test]
    fn test_mint_failure_is_not_retried() {
        let fx = Fixture::new();
        let runner = ScriptedRunner::happy_path()
            .replace_fail("spl-token mint", "Error: blockhash expired")
            .ok("spl-token mint", "should never be used");
        let mut provisioner = fx.provisioner(runner);

        let result = failure(provisioner.provision(&fx.request()).unwrap());

        assert_eq!(result.failed_step, Some(Step::MintTokens));
        assert_eq!(result.token_account.as_deref(), Some(ACCOUNT));
        let mint_calls = provisioner
            .runner()
            .keys()
            .iter()
            .filter(|k| k.as_str() == "spl-token mint")
            .count();
        assert_eq!(mint_calls, 1);
        assert!(!provisioner.workspace().metadata_path().exists());
    }

    #[test]
    fn test_verification_failure_is_not_fatal() {
        let fx = Fixture::new();
        let runner = ScriptedRunner::happy_path()
            .replace_fail("spl-token supply", "Error: account not found")
            .revoking_ok();
        let mut provisioner = fx.provisioner(runner);
        let request = fx.request().revoking(Authority::Mint);

        let result = success(provisioner.provision(&request).unwrap());

        assert!(!result.verified);
        assert_eq!(
            result.authority_revocation.get(Authority::Mint),
            Some(&RevocationOutcome::revoked())
        );
        let log = provisioner.workspace().read_log().unwrap();
        assert!(log.contains("Token verification failed"));
    }

    #[test]
    fn test_only_freeze_revocation() {
        let fx = Fixture::new();
        let mut provisioner = fx.provisioner(ScriptedRunner::happy_path().revoking_ok());
        let request = fx.request().revoking(Authority::Freeze);

        let result = success(provisioner.provision(&request).unwrap());

        assert!(result.authority_revocation.freeze_authority.is_some());
        assert!(result.authority_revocation.mint_authority.is_none());

        let value = serde_json::to_value(&result).unwrap();
        let revocation = &value["authority_revocation"];
        assert_eq!(revocation["freeze_authority_revoked"]["revoked"], true);
        assert!(revocation.get("mint_authority_revoked").is_none());

        let authorize = provisioner
            .runner()
            .calls
            .iter()
            .find(|c| c.subcommand() == Some("authorize"))
            .unwrap();
        assert_eq!(authorize.args[2], "freeze");
    }

    #[test]
    fn test_failed_revocation_is_reported_not_fatal() {
        let fx = Fixture::new();
        let runner = ScriptedRunner::happy_path()
            .fail("spl-token authorize", "Error: owner does not match")
            .ok("spl-token authorize", "Updating\n\nSignature: 9sig");
        let mut provisioner = fx.provisioner(runner);
        let request = fx
            .request()
            .revoking(Authority::Mint)
            .revoking(Authority::Freeze);

        let result = success(provisioner.provision(&request).unwrap());

        let mint = result.authority_revocation.get(Authority::Mint).unwrap();
        assert!(!mint.revoked);
        assert!(mint.error.as_deref().unwrap().contains("owner does not match"));
        assert!(result.authority_revocation.get(Authority::Freeze).unwrap().revoked);
        assert_eq!(result.authority_revocation.failed(), vec![Authority::Mint]);
    }

    #[test]
    fn test_json_extractor_requests_json_output() {
        let fx = Fixture::new();
        let runner = ScriptedRunner::happy_path()
            .replace_ok(
                "spl-token create-token",
                &format!(r#"{{"address":"{}","decimals":6}}"#, MINT),
            )
            .replace_ok(
                "spl-token create-account",
                &format!(r#"{{"address":"{}"}}"#, ACCOUNT),
            );
        let mut provisioner = fx
            .provisioner(runner)
            .with_extractor(Box::new(JsonFieldExtractor::default()));

        let result = success(provisioner.provision(&fx.request()).unwrap());
        assert_eq!(result.mint_address, MINT);
        assert!(provisioner.runner().calls[1].has_arg("--output"));
    }

    #[test]
    fn test_marker_from_killed_run_does_not_block() {
        let fx = Fixture::new();
        let mut provisioner = fx.provisioner(ScriptedRunner::happy_path());
        std::fs::write(provisioner.workspace().lock_path(), "4194303\n").unwrap();

        let result = provisioner.provision(&fx.request()).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_concurrent_run_is_rejected() {
        let fx = Fixture::new();
        let mut provisioner = fx.provisioner(ScriptedRunner::happy_path());
        let _held = provisioner.workspace().lock().unwrap();

        let result = provisioner.provision(&fx.request());
        assert!(matches!(
            result,
            Err(ProvisionError::Storage(StorageError::Locked(_)))
        ));
        assert!(provisioner.runner().calls.is_empty());
    }
}

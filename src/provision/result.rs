//! Outcome of a provisioning run

use crate::core::{Authority, Network};
use crate::token::TokenMetadata;
use serde::Serialize;
use std::fmt;

/// Workflow steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    BalanceCheck,
    CreateMint,
    CreateAccount,
    MintTokens,
    RecordMetadata,
    Verify,
    RevokeAuthorities,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::BalanceCheck => "balance check",
            Step::CreateMint => "mint creation",
            Step::CreateAccount => "account creation",
            Step::MintTokens => "minting",
            Step::RecordMetadata => "metadata recording",
            Step::Verify => "verification",
            Step::RevokeAuthorities => "authority revocation",
        };
        f.write_str(name)
    }
}

/// Result of disabling one authority
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevocationOutcome {
    pub revoked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RevocationOutcome {
    pub fn revoked() -> Self {
        Self {
            revoked: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            revoked: false,
            error: Some(error.into()),
        }
    }
}

/// Per-authority outcomes; authorities that were not requested have no entry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevocationResults {
    #[serde(
        rename = "mint_authority_revoked",
        skip_serializing_if = "Option::is_none"
    )]
    pub mint_authority: Option<RevocationOutcome>,
    #[serde(
        rename = "freeze_authority_revoked",
        skip_serializing_if = "Option::is_none"
    )]
    pub freeze_authority: Option<RevocationOutcome>,
}

impl RevocationResults {
    pub fn is_empty(&self) -> bool {
        self.mint_authority.is_none() && self.freeze_authority.is_none()
    }

    pub fn get(&self, authority: Authority) -> Option<&RevocationOutcome> {
        match authority {
            Authority::Mint => self.mint_authority.as_ref(),
            Authority::Freeze => self.freeze_authority.as_ref(),
        }
    }

    pub fn set(&mut self, authority: Authority, outcome: RevocationOutcome) {
        match authority {
            Authority::Mint => self.mint_authority = Some(outcome),
            Authority::Freeze => self.freeze_authority = Some(outcome),
        }
    }

    /// Requested authorities that are still in place
    pub fn failed(&self) -> Vec<Authority> {
        [Authority::Mint, Authority::Freeze]
            .into_iter()
            .filter(|a| matches!(self.get(*a), Some(outcome) if !outcome.revoked))
            .collect()
    }
}

/// A run that completed every irreversible step
#[derive(Debug, Clone, Serialize)]
pub struct CreationSuccess {
    pub mint_address: String,
    pub token_account: String,
    pub metadata: TokenMetadata,
    /// Whether the post-mint supply and balance queries succeeded
    pub verified: bool,
    #[serde(skip_serializing_if = "RevocationResults::is_empty")]
    pub authority_revocation: RevocationResults,
    pub network: Network,
}

/// A run that stopped early. Whatever was already created is reported so
/// the operator can resume by hand.
#[derive(Debug, Clone, Serialize)]
pub struct CreationFailure {
    pub error: String,
    pub failed_step: Option<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_account: Option<String>,
    pub network: Network,
}

/// Terminal outcome of a run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum CreationResult {
    Success(CreationSuccess),
    Failure(CreationFailure),
}

impl CreationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CreationResult::Success(_))
    }

    pub fn network(&self) -> Network {
        match self {
            CreationResult::Success(s) => s.network,
            CreationResult::Failure(f) => f.network,
        }
    }
}

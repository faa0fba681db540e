//! Scripted command runner for tests

use super::runner::{CommandRunner, ExitCode, ToolError, ToolInvocation, ToolOutput};
use std::collections::{HashMap, VecDeque};

pub(crate) const MINT: &str = "So11111111111111111111111111111111111111112";
const ACCOUNT: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

enum Response {
    Ok(String),
    Fail(String),
}

/// Replays canned responses keyed by "program subcommand" and records calls
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: HashMap<String, VecDeque<Response>>,
    pub calls: Vec<ToolInvocation>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful run of a whole creation workflow
    pub fn happy_path() -> Self {
        Self::new()
            .ok("solana balance", "2.5 SOL")
            .ok(
                "spl-token create-token",
                &format!("Creating token {}\n\nSignature: 4sig\n", MINT),
            )
            .ok(
                "spl-token create-account",
                &format!("Creating account {}\n\nSignature: 5sig\n", ACCOUNT),
            )
            .ok("spl-token mint", "Minting 500 tokens\n\nSignature: 6sig\n")
            .ok("spl-token supply", "500")
            .ok("spl-token balance", "500")
    }

    /// Queue successful `authorize` runs for both authorities
    pub fn revoking_ok(self) -> Self {
        self.ok("spl-token authorize", "Updating\n\nSignature: 7sig\n")
            .ok("spl-token authorize", "Updating\n\nSignature: 8sig\n")
    }

    pub fn ok(mut self, key: &str, stdout: &str) -> Self {
        self.responses
            .entry(key.to_string())
            .or_default()
            .push_back(Response::Ok(stdout.to_string()));
        self
    }

    pub fn fail(mut self, key: &str, stderr: &str) -> Self {
        self.responses
            .entry(key.to_string())
            .or_default()
            .push_back(Response::Fail(stderr.to_string()));
        self
    }

    /// Replace every queued response for `key`
    pub fn replace_ok(mut self, key: &str, stdout: &str) -> Self {
        self.responses.remove(key);
        self.ok(key, stdout)
    }

    pub fn replace_fail(mut self, key: &str, stderr: &str) -> Self {
        self.responses.remove(key);
        self.fail(key, stderr)
    }

    /// "program subcommand" of every call, in order
    pub fn keys(&self) -> Vec<String> {
        self.calls.iter().map(key_of).collect()
    }

    pub fn called(&self, key: &str) -> bool {
        self.keys().iter().any(|k| k == key)
    }
}

fn key_of(invocation: &ToolInvocation) -> String {
    format!(
        "{} {}",
        invocation.program,
        invocation.subcommand().unwrap_or_default()
    )
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        self.calls.push(invocation.clone());
        let key = key_of(invocation);

        match self.responses.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(Response::Ok(stdout)) => Ok(ToolOutput {
                stdout,
                stderr: String::new(),
            }),
            Some(Response::Fail(stderr)) => Err(ToolError::Failed {
                command: invocation.to_string(),
                status: ExitCode(Some(1)),
                stderr,
            }),
            None => Err(ToolError::Failed {
                command: invocation.to_string(),
                status: ExitCode(Some(127)),
                stderr: format!("no scripted response for '{}'", key),
            }),
        }
    }
}

//! Common types and data structures

use crate::constants::*;
use crate::error::PollError;
use serde::{Deserialize, Serialize};

/// Endpoints polled on the local wallet server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    BlockHeight,
    Balance,
    BootstrapperProgress,
    ConsensusBuilderProgress,
    Heartbeat,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::BlockHeight => BLOCK_HEIGHT_PATH,
            Endpoint::Balance => BALANCE_PATH,
            Endpoint::BootstrapperProgress => BOOTSTRAPPER_PROGRESS_PATH,
            Endpoint::ConsensusBuilderProgress => CONSENSUS_BUILDER_PROGRESS_PATH,
            Endpoint::Heartbeat => HEARTBEAT_PATH,
        }
    }

    /// Session-scoped endpoints carry the session id when one is configured.
    pub fn session_scoped(self) -> bool {
        matches!(
            self,
            Endpoint::BlockHeight | Endpoint::Balance | Endpoint::Heartbeat
        )
    }
}

/// Raw ordered tuple returned by every endpoint (`["a", "b", ...]`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PollResult(pub Vec<String>);

impl PollResult {
    /// Take the first `N` fields, failing when the server sent fewer.
    fn fields<const N: usize>(self, path: &'static str) -> Result<[String; N], PollError> {
        let got = self.0.len();
        let mut iter = self.0.into_iter();
        let mut out: [String; N] = std::array::from_fn(|_| String::new());
        for slot in out.iter_mut() {
            *slot = iter.next().ok_or_else(|| PollError::Malformed {
                path,
                expected: N,
                got,
            })?;
        }
        Ok(out)
    }
}

impl From<Vec<&str>> for PollResult {
    fn from(fields: Vec<&str>) -> Self {
        Self(fields.into_iter().map(String::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeightReport {
    pub height: String,
    pub status: String,
    pub color: String,
}

impl TryFrom<PollResult> for BlockHeightReport {
    type Error = PollError;

    fn try_from(result: PollResult) -> Result<Self, Self::Error> {
        let [height, status, color] = result.fields::<3>(BLOCK_HEIGHT_PATH)?;
        Ok(Self {
            height,
            status,
            color,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    pub confirmed: String,
    pub unconfirmed: String,
    pub spf_funds: String,
    /// Claim balance; sent by the server but never displayed.
    pub reserved: String,
    pub whale_size: String,
}

impl TryFrom<PollResult> for BalanceReport {
    type Error = PollError;

    fn try_from(result: PollResult) -> Result<Self, Self::Error> {
        let [confirmed, unconfirmed, spf_funds, reserved, whale_size] =
            result.fields::<5>(BALANCE_PATH)?;
        Ok(Self {
            confirmed,
            unconfirmed,
            spf_funds,
            reserved,
            whale_size,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub status: String,
}

impl ProgressReport {
    pub fn decode(result: PollResult, endpoint: Endpoint) -> Result<Self, PollError> {
        let [status] = result.fields::<1>(endpoint.path())?;
        Ok(Self { status })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatReport {
    pub alive: bool,
}

impl TryFrom<PollResult> for HeartbeatReport {
    type Error = PollError;

    fn try_from(result: PollResult) -> Result<Self, Self::Error> {
        let [flag] = result.fields::<1>(HEARTBEAT_PATH)?;
        Ok(Self {
            alive: flag == HEARTBEAT_ALIVE,
        })
    }
}

/// Server-rendered layout currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Bootstrapper,
    ConsensusBuilder,
    Wallet { last_page: bool },
}

/// A form submitted by a poll loop, waiting to be posted by the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form: String,
    pub action: String,
}

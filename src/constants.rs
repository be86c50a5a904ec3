//! Application constants and configuration

use std::time::Duration;

pub const APP_NAME: &str = "Wallet Monitor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4300";

// Endpoints served by the local wallet GUI server
pub const BLOCK_HEIGHT_PATH: &str = "/gui/blockHeight";
pub const BALANCE_PATH: &str = "/gui/balance";
pub const BOOTSTRAPPER_PROGRESS_PATH: &str = "/gui/bootstrapperProgress";
pub const CONSENSUS_BUILDER_PROGRESS_PATH: &str = "/gui/consensusBuilderProgress";
pub const HEARTBEAT_PATH: &str = "/gui/heartbeat";

/// Form field carrying the session id on session-scoped requests
pub const SESSION_ID_FIELD: &str = "session_id";

// Poll cadence
pub const DATA_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(200);
pub const NOT_RENDERED_BACKOFF: Duration = Duration::from_millis(50);

// Status values that trigger a page transition
pub const STATUS_SYNCHRONIZED: &str = "Synchronized";
pub const PROGRESS_COMPLETE: &str = "100%";
pub const HEARTBEAT_ALIVE: &str = "true";
pub const WHALE_SIZE_PREFIX: &str = "Whale Size: ";

// Page selectors (classes)
pub const CLASS_BLOCK_HEIGHT: &str = "block_height";
pub const CLASS_STATUS: &str = "status";
pub const CLASS_CONFIRMED: &str = "confirmed";
pub const CLASS_UNCONFIRMED: &str = "unconfirmed";
pub const CLASS_SPF_FUNDS: &str = "spf_funds";
pub const CLASS_BOOTSTRAPPER_PROGRESS: &str = "bootstrapper-progress";
pub const CLASS_CONSENSUS_BUILDER_PROGRESS: &str = "consensus-builder-progress";

// Page selectors (ids)
pub const ID_BALANCE: &str = "balance";
pub const ID_WHALE_SIZE: &str = "whale_size";
pub const ID_WHALE_SIZE_BUTTON: &str = "whale_size_button";
pub const ID_IS_LAST_PAGE: &str = "is_last_page";

// Forms
pub const FORM_REFRESH: &str = "refreshForm";
pub const FORM_REFRESH_BOOTSTRAPPER: &str = "refreshBootstrapper";
pub const FORM_REFRESH_CONSENSUS_BUILDER: &str = "refreshConsensusBuilder";
pub const FORM_REFRESH_TRANSACTIONS: &str = "refresh_transactions";

pub const SHUTDOWN_TITLE: &str = "Shutdown Notice";
pub const SHUTDOWN_MESSAGE: &str = "Wallet was shutdown.";

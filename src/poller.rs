//! Poll loops - one repeating task per page concern
//!
//! Every loop has the same shape: check the page still shows what it feeds,
//! fetch, decode, patch the page, then tell the runner how long to wait. Only
//! the heartbeat loop ever stops on its own.

use crate::constants::*;
use crate::page::{self, SharedPage};
use crate::transport::Transport;
use crate::types::*;
use eframe::egui;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What a loop wants after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    After(Duration),
    Stop,
}

pub trait PollLoop: Send {
    fn name(&self) -> &'static str;

    fn tick(&mut self) -> BoxFuture<'_, Next>;
}

/// Everything a loop touches besides its own memory
#[derive(Clone)]
pub struct PollContext {
    pub page: SharedPage,
    pub transport: Arc<dyn Transport>,
    pub ctx: egui::Context,
}

impl PollContext {
    /// Run `f` against the page, stamp it and schedule a repaint.
    fn patch<R>(&self, f: impl FnOnce(&mut crate::page::Page) -> R) -> R {
        let out = {
            let mut page = page::lock(&self.page);
            let out = f(&mut page);
            page.touch();
            out
        };
        self.ctx.request_repaint();
        out
    }
}

/// Drive a loop until it stops or the token is cancelled.
pub async fn run(mut poll_loop: impl PollLoop, token: CancellationToken) {
    let name = poll_loop.name();
    debug!(poll_loop = name, "Poll loop started");
    loop {
        let next = tokio::select! {
            _ = token.cancelled() => break,
            next = poll_loop.tick() => next,
        };
        match next {
            Next::After(delay) => {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Next::Stop => break,
        }
    }
    debug!(poll_loop = name, "Poll loop ended");
}

// ============================================================================
// BLOCK HEIGHT
// ============================================================================

pub struct BlockHeightLoop {
    poll: PollContext,
    last_status: Option<String>,
}

impl BlockHeightLoop {
    pub fn new(poll: PollContext) -> Self {
        Self {
            poll,
            last_status: None,
        }
    }

    fn apply(&mut self, report: BlockHeightReport) {
        let entered_sync =
            report.status == STATUS_SYNCHRONIZED && self.last_status.as_deref() != Some(STATUS_SYNCHRONIZED);
        self.poll.patch(|page| {
            if entered_sync && page.submit_form(FORM_REFRESH) {
                info!(height = %report.height, "Wallet synchronized, refreshing page");
            }
            page.set_text_by_class(CLASS_BLOCK_HEIGHT, &report.height);
            page.set_text_by_class(CLASS_STATUS, &report.status);
            page.set_class_name_by_class(CLASS_STATUS, &format!("{} {}", CLASS_STATUS, report.color));
        });
        self.last_status = Some(report.status);
    }
}

impl PollLoop for BlockHeightLoop {
    fn name(&self) -> &'static str {
        "block_height"
    }

    fn tick(&mut self) -> BoxFuture<'_, Next> {
        Box::pin(async move {
            let rendered = page::lock(&self.poll.page).has_class(CLASS_BLOCK_HEIGHT);
            if !rendered {
                return Next::After(NOT_RENDERED_BACKOFF);
            }
            let result = self.poll.transport.fetch(Endpoint::BlockHeight).await;
            match result.and_then(BlockHeightReport::try_from) {
                Ok(report) => self.apply(report),
                Err(e) => warn!(endpoint = BLOCK_HEIGHT_PATH, error = %e, "Block height poll failed"),
            }
            Next::After(DATA_POLL_INTERVAL)
        })
    }
}

// ============================================================================
// BALANCE
// ============================================================================

pub struct BalanceLoop {
    poll: PollContext,
}

impl BalanceLoop {
    pub fn new(poll: PollContext) -> Self {
        Self { poll }
    }

    fn apply(&self, report: BalanceReport) {
        self.poll.patch(|page| {
            page.set_text_by_class(CLASS_CONFIRMED, &report.confirmed);

            // Elements never filled have nothing to compare against
            let changed = page.elements_by_class(CLASS_UNCONFIRMED).any(|e| {
                !e.text.trim().is_empty() && e.text.trim() != report.unconfirmed.trim()
            });
            if changed && page.is_last_page() && page.submit_form(FORM_REFRESH_TRANSACTIONS) {
                info!(unconfirmed = %report.unconfirmed.trim(), "Unconfirmed balance changed, refreshing transactions");
            }
            page.set_text_by_class(CLASS_UNCONFIRMED, &report.unconfirmed);

            page.set_text_by_class(CLASS_SPF_FUNDS, &report.spf_funds);
            let whale = format!("{}{}", WHALE_SIZE_PREFIX, report.whale_size);
            page.set_text_by_id(ID_WHALE_SIZE, &whale);
            page.set_value_by_id(ID_WHALE_SIZE_BUTTON, &whale);
        });
    }
}

impl PollLoop for BalanceLoop {
    fn name(&self) -> &'static str {
        "balance"
    }

    fn tick(&mut self) -> BoxFuture<'_, Next> {
        Box::pin(async move {
            let rendered = page::lock(&self.poll.page).element_by_id(ID_BALANCE).is_some();
            if !rendered {
                return Next::After(NOT_RENDERED_BACKOFF);
            }
            let result = self.poll.transport.fetch(Endpoint::Balance).await;
            match result.and_then(BalanceReport::try_from) {
                Ok(report) => self.apply(report),
                Err(e) => warn!(endpoint = BALANCE_PATH, error = %e, "Balance poll failed"),
            }
            Next::After(DATA_POLL_INTERVAL)
        })
    }
}

// ============================================================================
// BOOTSTRAPPER / CONSENSUS BUILDER PROGRESS
// ============================================================================

/// Shared by the bootstrapper and consensus builder loops; they differ only in
/// endpoint, target class and the form submitted at completion.
pub struct ProgressLoop {
    poll: PollContext,
    endpoint: Endpoint,
    class: &'static str,
    form: &'static str,
    last_status: Option<String>,
}

impl ProgressLoop {
    pub fn bootstrapper(poll: PollContext) -> Self {
        Self::new(
            poll,
            Endpoint::BootstrapperProgress,
            CLASS_BOOTSTRAPPER_PROGRESS,
            FORM_REFRESH_BOOTSTRAPPER,
        )
    }

    pub fn consensus_builder(poll: PollContext) -> Self {
        Self::new(
            poll,
            Endpoint::ConsensusBuilderProgress,
            CLASS_CONSENSUS_BUILDER_PROGRESS,
            FORM_REFRESH_CONSENSUS_BUILDER,
        )
    }

    fn new(poll: PollContext, endpoint: Endpoint, class: &'static str, form: &'static str) -> Self {
        Self {
            poll,
            endpoint,
            class,
            form,
            last_status: None,
        }
    }

    fn apply(&mut self, report: ProgressReport) {
        let completed =
            report.status == PROGRESS_COMPLETE && self.last_status.as_deref() != Some(PROGRESS_COMPLETE);
        self.poll.patch(|page| {
            if completed && page.submit_form(self.form) {
                info!(endpoint = self.endpoint.path(), "Progress complete, refreshing page");
            }
            page.set_text_by_class(self.class, &report.status);
        });
        self.last_status = Some(report.status);
    }
}

impl PollLoop for ProgressLoop {
    fn name(&self) -> &'static str {
        self.class
    }

    fn tick(&mut self) -> BoxFuture<'_, Next> {
        Box::pin(async move {
            let rendered = page::lock(&self.poll.page).has_class(self.class);
            if !rendered {
                return Next::After(NOT_RENDERED_BACKOFF);
            }
            let result = self.poll.transport.fetch(self.endpoint).await;
            match result.and_then(|r| ProgressReport::decode(r, self.endpoint)) {
                Ok(report) => self.apply(report),
                Err(e) => warn!(endpoint = self.endpoint.path(), error = %e, "Progress poll failed"),
            }
            Next::After(DATA_POLL_INTERVAL)
        })
    }
}

// ============================================================================
// HEARTBEAT
// ============================================================================

pub struct HeartbeatLoop {
    poll: PollContext,
}

impl HeartbeatLoop {
    pub fn new(poll: PollContext) -> Self {
        Self { poll }
    }

    fn shut_down(&self) {
        self.poll.patch(|page| page.render_shutdown_notice());
    }
}

impl PollLoop for HeartbeatLoop {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    fn tick(&mut self) -> BoxFuture<'_, Next> {
        Box::pin(async move {
            let result = self.poll.transport.fetch(Endpoint::Heartbeat).await;
            match result.and_then(HeartbeatReport::try_from) {
                Ok(HeartbeatReport { alive: true }) => Next::After(HEARTBEAT_INTERVAL),
                Ok(HeartbeatReport { alive: false }) => {
                    error!("Wallet server reported shutdown");
                    self.shut_down();
                    Next::Stop
                }
                Err(e) => {
                    error!(error = %e, "Heartbeat lost");
                    self.shut_down();
                    Next::Stop
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PollError;
    use crate::page::Page;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Scripted transport: answers each endpoint from a queue and records
    /// every request made.
    #[derive(Default)]
    struct FakeTransport {
        replies: Mutex<HashMap<Endpoint, VecDeque<Option<Vec<&'static str>>>>>,
        calls: Mutex<Vec<Endpoint>>,
    }

    impl FakeTransport {
        /// `None` scripts a request failure.
        fn script(&self, endpoint: Endpoint, reply: Option<Vec<&'static str>>) {
            self.replies
                .lock()
                .unwrap()
                .entry(endpoint)
                .or_default()
                .push_back(reply);
        }

        fn calls(&self) -> Vec<Endpoint> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn fetch(&self, endpoint: Endpoint) -> BoxFuture<'_, Result<PollResult, PollError>> {
            self.calls.lock().unwrap().push(endpoint);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .get_mut(&endpoint)
                .and_then(|q| q.pop_front())
                .flatten();
            Box::pin(async move {
                reply.map(PollResult::from).ok_or(PollError::Status {
                    path: endpoint.path(),
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                })
            })
        }

        fn submit(&self, _submission: FormSubmission) -> BoxFuture<'_, Result<(), PollError>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn setup(screen: Screen) -> (PollContext, Arc<FakeTransport>) {
        let transport = Arc::new(FakeTransport::default());
        let poll = PollContext {
            page: Arc::new(Mutex::new(Page::for_screen(screen))),
            transport: transport.clone(),
            ctx: egui::Context::default(),
        };
        (poll, transport)
    }

    fn wallet() -> Screen {
        Screen::Wallet { last_page: true }
    }

    fn texts(poll: &PollContext, class: &str) -> Vec<String> {
        page::lock(&poll.page)
            .elements_by_class(class)
            .map(|e| e.text.clone())
            .collect()
    }

    fn submitted(poll: &PollContext) -> Vec<String> {
        page::lock(&poll.page)
            .take_submissions()
            .into_iter()
            .map(|s| s.form)
            .collect()
    }

    #[tokio::test]
    async fn data_loops_skip_requests_until_rendered() {
        let (poll, transport) = setup(Screen::Bootstrapper);
        assert_eq!(
            BlockHeightLoop::new(poll.clone()).tick().await,
            Next::After(NOT_RENDERED_BACKOFF)
        );
        assert_eq!(
            BalanceLoop::new(poll.clone()).tick().await,
            Next::After(NOT_RENDERED_BACKOFF)
        );
        assert_eq!(
            ProgressLoop::consensus_builder(poll.clone()).tick().await,
            Next::After(NOT_RENDERED_BACKOFF)
        );

        let (wallet_poll, wallet_transport) = setup(wallet());
        assert_eq!(
            ProgressLoop::bootstrapper(wallet_poll).tick().await,
            Next::After(NOT_RENDERED_BACKOFF)
        );

        assert!(transport.calls().is_empty());
        assert!(wallet_transport.calls().is_empty());
    }

    #[tokio::test]
    async fn block_height_patches_text_and_color() {
        let (poll, transport) = setup(wallet());
        transport.script(Endpoint::BlockHeight, Some(vec!["1200", "Synchronizing", "yellow"]));
        transport.script(Endpoint::BlockHeight, Some(vec!["1200", "Synchronizing", "yellow"]));
        let mut block_height = BlockHeightLoop::new(poll.clone());

        assert_eq!(block_height.tick().await, Next::After(DATA_POLL_INTERVAL));
        assert_eq!(texts(&poll, CLASS_BLOCK_HEIGHT), vec!["1200"]);
        assert_eq!(texts(&poll, CLASS_STATUS), vec!["Synchronizing"]);

        let snapshot = page::lock(&poll.page).elements.clone();
        block_height.tick().await;
        let page = page::lock(&poll.page);
        assert_eq!(page.elements, snapshot);
        let status = page.elements_by_class(CLASS_STATUS).next().unwrap();
        assert_eq!(status.class_name, "status yellow");
    }

    #[tokio::test]
    async fn synchronized_submits_refresh_once_per_transition() {
        let (poll, transport) = setup(wallet());
        for status in ["Synchronizing", "Synchronized", "Synchronized", "Rescanning", "Synchronized"] {
            transport.script(Endpoint::BlockHeight, Some(vec!["10", status, "blue"]));
        }
        let mut block_height = BlockHeightLoop::new(poll.clone());

        block_height.tick().await;
        assert!(submitted(&poll).is_empty());
        block_height.tick().await;
        assert_eq!(submitted(&poll), vec![FORM_REFRESH]);
        block_height.tick().await;
        assert!(submitted(&poll).is_empty());
        block_height.tick().await;
        block_height.tick().await;
        assert_eq!(submitted(&poll), vec![FORM_REFRESH]);
    }

    #[tokio::test]
    async fn failed_poll_keeps_cadence_and_page() {
        let (poll, transport) = setup(wallet());
        transport.script(Endpoint::Balance, None);
        transport.script(Endpoint::BlockHeight, Some(vec!["10"]));

        assert_eq!(
            BalanceLoop::new(poll.clone()).tick().await,
            Next::After(DATA_POLL_INTERVAL)
        );
        assert_eq!(
            BlockHeightLoop::new(poll.clone()).tick().await,
            Next::After(DATA_POLL_INTERVAL)
        );
        assert_eq!(texts(&poll, CLASS_CONFIRMED), vec![""]);
        assert_eq!(texts(&poll, CLASS_BLOCK_HEIGHT), vec![""]);
        assert_eq!(transport.calls(), vec![Endpoint::Balance, Endpoint::BlockHeight]);
    }

    #[tokio::test]
    async fn balance_fills_every_target() {
        let (poll, transport) = setup(wallet());
        transport.script(
            Endpoint::Balance,
            Some(vec!["  100.00", "   5.00", "2", "  0.00", "Shrimp"]),
        );
        BalanceLoop::new(poll.clone()).tick().await;

        assert_eq!(texts(&poll, CLASS_CONFIRMED), vec!["  100.00"]);
        assert_eq!(texts(&poll, CLASS_UNCONFIRMED), vec!["   5.00"]);
        assert_eq!(texts(&poll, CLASS_SPF_FUNDS), vec!["2"]);
        let page = page::lock(&poll.page);
        assert_eq!(page.element_by_id(ID_WHALE_SIZE).unwrap().text, "Whale Size: Shrimp");
        assert_eq!(
            page.element_by_id(ID_WHALE_SIZE_BUTTON).unwrap().value,
            "Whale Size: Shrimp"
        );
        // the reserved field is never displayed
        assert!(page.elements.iter().all(|e| e.text != "  0.00"));
    }

    #[tokio::test]
    async fn unconfirmed_change_on_last_page_refreshes_transactions() {
        let (poll, transport) = setup(wallet());
        for unconfirmed in ["5.00", " 5.00 ", "7.50"] {
            transport.script(Endpoint::Balance, Some(vec!["1", unconfirmed, "0", "0", "Shrimp"]));
        }
        let mut balance = BalanceLoop::new(poll.clone());

        balance.tick().await;
        assert!(submitted(&poll).is_empty());
        balance.tick().await;
        assert!(submitted(&poll).is_empty());
        balance.tick().await;
        assert_eq!(submitted(&poll), vec![FORM_REFRESH_TRANSACTIONS]);
    }

    #[tokio::test]
    async fn unconfirmed_change_elsewhere_never_refreshes() {
        let (poll, transport) = setup(Screen::Wallet { last_page: false });
        for unconfirmed in ["5.00", "7.50"] {
            transport.script(Endpoint::Balance, Some(vec!["1", unconfirmed, "0", "0", "Shrimp"]));
        }
        let mut balance = BalanceLoop::new(poll.clone());
        balance.tick().await;
        balance.tick().await;
        assert!(submitted(&poll).is_empty());
        assert_eq!(texts(&poll, CLASS_UNCONFIRMED), vec!["7.50"]);
    }

    #[tokio::test]
    async fn progress_complete_submits_matching_form_once() {
        let (poll, transport) = setup(Screen::ConsensusBuilder);
        for status in ["87%", "100%", "100%"] {
            transport.script(Endpoint::ConsensusBuilderProgress, Some(vec![status]));
        }
        let mut progress = ProgressLoop::consensus_builder(poll.clone());

        progress.tick().await;
        assert_eq!(texts(&poll, CLASS_CONSENSUS_BUILDER_PROGRESS), vec!["87%"]);
        progress.tick().await;
        assert_eq!(submitted(&poll), vec![FORM_REFRESH_CONSENSUS_BUILDER]);
        progress.tick().await;
        assert!(submitted(&poll).is_empty());
        assert_eq!(
            transport.calls(),
            vec![Endpoint::ConsensusBuilderProgress; 3]
        );
    }

    #[tokio::test]
    async fn bootstrapper_complete_submits_bootstrapper_form() {
        let (poll, transport) = setup(Screen::Bootstrapper);
        transport.script(Endpoint::BootstrapperProgress, Some(vec!["100%"]));
        ProgressLoop::bootstrapper(poll.clone()).tick().await;
        assert_eq!(submitted(&poll), vec![FORM_REFRESH_BOOTSTRAPPER]);
        assert_eq!(texts(&poll, CLASS_BOOTSTRAPPER_PROGRESS), vec!["100%"]);
    }

    #[tokio::test]
    async fn heartbeat_alive_keeps_polling() {
        let (poll, transport) = setup(wallet());
        transport.script(Endpoint::Heartbeat, Some(vec!["true"]));
        assert_eq!(
            HeartbeatLoop::new(poll.clone()).tick().await,
            Next::After(HEARTBEAT_INTERVAL)
        );
        assert!(!page::lock(&poll.page).shutdown);
    }

    #[tokio::test]
    async fn heartbeat_falsy_value_shuts_the_page_down() {
        let (poll, transport) = setup(wallet());
        transport.script(Endpoint::Heartbeat, Some(vec!["false"]));
        assert_eq!(HeartbeatLoop::new(poll.clone()).tick().await, Next::Stop);
        let page = page::lock(&poll.page);
        assert!(page.shutdown);
        assert!(page.elements.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn lost_heartbeat_ends_the_loop_after_one_notice() {
        let (poll, transport) = setup(wallet());
        transport.script(Endpoint::Heartbeat, Some(vec!["true"]));
        transport.script(Endpoint::Heartbeat, Some(vec!["true"]));
        transport.script(Endpoint::Heartbeat, None);

        run(HeartbeatLoop::new(poll.clone()), CancellationToken::new()).await;

        assert_eq!(transport.calls(), vec![Endpoint::Heartbeat; 3]);
        assert!(page::lock(&poll.page).shutdown);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_runner_stops_polling() {
        let (poll, transport) = setup(Screen::Bootstrapper);
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(ProgressLoop::bootstrapper(poll), token.clone()));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        token.cancel();
        handle.await.unwrap();

        let made = transport.calls().len();
        assert!((2..=4).contains(&made), "unexpected request count {made}");
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(transport.calls().len(), made);
    }
}

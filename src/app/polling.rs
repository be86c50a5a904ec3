//! Poll loop startup

use super::App;
use crate::poller::{self, BalanceLoop, BlockHeightLoop, HeartbeatLoop, PollContext, ProgressLoop};
use eframe::egui;
use tracing::info;

impl App {
    /// Spawn the five independent poll loops. They share nothing but the page.
    pub fn start_polling(&mut self, ctx: &egui::Context) {
        if self.polling_started {
            return;
        }
        self.polling_started = true;

        let poll = PollContext {
            page: self.page.clone(),
            transport: self.transport.clone(),
            ctx: ctx.clone(),
        };
        let token = &self.cancel_token;

        self.runtime.spawn(poller::run(
            ProgressLoop::bootstrapper(poll.clone()),
            token.clone(),
        ));
        self.runtime.spawn(poller::run(
            ProgressLoop::consensus_builder(poll.clone()),
            token.clone(),
        ));
        self.runtime
            .spawn(poller::run(BlockHeightLoop::new(poll.clone()), token.clone()));
        self.runtime
            .spawn(poller::run(BalanceLoop::new(poll.clone()), token.clone()));
        self.runtime
            .spawn(poller::run(HeartbeatLoop::new(poll), token.clone()));

        info!("Poll loops started");
    }
}

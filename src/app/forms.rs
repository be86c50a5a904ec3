//! Form submissions queued by the poll loops

use super::App;
use crate::page;
use tracing::{info, warn};

impl App {
    /// Post queued forms to the server and move the page to the screen the
    /// server renders next. Runs once per frame.
    pub fn process_submissions(&mut self) {
        let (submissions, current) = {
            let mut page = page::lock(&self.page);
            (page.take_submissions(), page.screen)
        };
        let Some(last) = submissions.last() else {
            return;
        };

        let next = self.settings.screen_after(&last.form, current);
        info!(form = %last.form, from = ?current, to = ?next, "Reloading page");

        for submission in submissions {
            let transport = self.transport.clone();
            self.runtime.spawn(async move {
                let form = submission.form.clone();
                if let Err(e) = transport.submit(submission).await {
                    warn!(form = %form, error = %e, "Form submission failed");
                }
            });
        }

        page::lock(&self.page).load(next);
    }
}

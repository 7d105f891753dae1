//! Interactive Directory Session
//!
//! A single task owns the `Directory` and handles every UI event in order,
//! which is what serializes filter passes. Search input is coalesced by a
//! debounce timer; category and clear events filter immediately.

use super::listing::Directory;
use super::types::{QueryState, View};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The search box changed. Debounced.
    SearchInput(String),
    /// A category tab was clicked.
    SelectCategory(String),
    /// The clear button was clicked.
    ClearSearch,
}

/// Published after every filter pass.
#[derive(Debug, Clone)]
pub struct FilterReport {
    pub query: QueryState,
    pub visible_count: Option<usize>,
    pub result_label: Option<String>,
    pub load_error: Option<String>,
    pub views: Vec<View>,
    /// Number of filter passes run so far, including the initial one.
    pub passes: u64,
}

impl FilterReport {
    fn from_directory(directory: &Directory, passes: u64) -> Self {
        Self {
            query: directory.query().clone(),
            visible_count: directory.visible_count(),
            result_label: directory.result_label(),
            load_error: directory.load_error().map(str::to_string),
            views: directory.views().to_vec(),
            passes,
        }
    }
}

pub struct DirectorySession {
    events: mpsc::Sender<UiEvent>,
    reports: watch::Receiver<FilterReport>,
    handle: JoinHandle<()>,
}

impl DirectorySession {
    /// Runs the initial filter pass and starts the event loop.
    pub fn spawn(mut directory: Directory, debounce: Duration) -> Self {
        directory.apply_filters();
        let (report_tx, report_rx) = watch::channel(FilterReport::from_directory(&directory, 1));
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

        let handle = tokio::spawn(run_session(directory, debounce, event_rx, report_tx));

        Self {
            events: event_tx,
            reports: report_rx,
            handle,
        }
    }

    pub async fn send(&self, event: UiEvent) -> Result<(), mpsc::error::SendError<UiEvent>> {
        self.events.send(event).await
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterReport> {
        self.reports.clone()
    }

    pub fn latest(&self) -> FilterReport {
        self.reports.borrow().clone()
    }

    /// Closes the event channel and waits for the loop to drain.
    pub async fn shutdown(self) {
        drop(self.events);
        if let Err(e) = self.handle.await {
            tracing::error!("Directory session task failed: {}", e);
        }
    }
}

async fn run_session(
    mut directory: Directory,
    debounce: Duration,
    mut events: mpsc::Receiver<UiEvent>,
    reports: watch::Sender<FilterReport>,
) {
    let mut passes: u64 = 1;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    // The last keystroke's pass still runs when input ends early.
                    if deadline.take().is_some() {
                        directory.apply_filters();
                        passes += 1;
                        let report = FilterReport::from_directory(&directory, passes);
                        if reports.send(report).is_err() {
                            tracing::debug!("No report subscribers left for the final pass");
                        }
                    }
                    break;
                };
                match event {
                    UiEvent::SearchInput(text) => {
                        directory.set_free_text(&text);
                        deadline = Some(Instant::now() + debounce);
                        continue;
                    }
                    UiEvent::SelectCategory(category) => {
                        directory.set_active_category(&category);
                    }
                    UiEvent::ClearSearch => {
                        directory.clear_search();
                    }
                }
                // The immediate pass already reflects the latest text.
                deadline = None;
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                directory.apply_filters();
            }
        }

        passes += 1;
        if reports
            .send(FilterReport::from_directory(&directory, passes))
            .is_err()
        {
            tracing::debug!("No report subscribers left, stopping session");
            break;
        }
    }
}

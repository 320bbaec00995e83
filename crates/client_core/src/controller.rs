//! Analyze/revise state machine behind the documentation form.
//!
//! Each lifecycle is a single enum so that, for example, "loading" and
//! "failed" can never be shown together. Every request carries a [`Ticket`];
//! a response is only committed while its ticket is still the current one,
//! so a superseded analysis can never overwrite the result of a newer one.

use std::time::{Duration, Instant};

use serde_json::Value;
use shared::protocol::{AnalyzeRequest, AnalyzeResponse, ReviseRequest, ReviseResponse};
use tracing::{debug, info, warn};

use crate::{
    clipboard::ClipboardSink,
    error::{ControllerError, ServiceError},
    service::DocService,
};

pub const COPIED_INDICATOR_DURATION: Duration = Duration::from_secs(2);
pub const COLLAPSED_PREVIEW_CHARS: usize = 1000;
pub const ANALYZE_FAILURE_FALLBACK: &str = "Something went wrong";
pub const REVISE_FAILURE_FALLBACK: &str = "Revision failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub url: String,
    pub text: String,
    pub content: Value,
}

impl Analysis {
    /// Revision needs both a non-empty analysis and some document content.
    pub fn is_revisable(&self) -> bool {
        let has_content = match &self.content {
            Value::Null => false,
            Value::String(text) => !text.is_empty(),
            _ => true,
        };
        has_content && !self.text.is_empty()
    }

    pub fn stats(&self) -> ResultStats {
        ResultStats::of(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeState {
    Idle,
    Loading { ticket: Ticket, url: String },
    Failed(String),
    Ready(Analysis),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviseState {
    Idle,
    Revising { ticket: Ticket },
    Revised(String),
    Failed(String),
}

/// Whether a finished request changed controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeCall {
    pub ticket: Ticket,
    pub request: AnalyzeRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviseCall {
    pub ticket: Ticket,
    pub request: ReviseRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultStats {
    pub chars: usize,
    pub lines: usize,
}

impl ResultStats {
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            lines: text.split('\n').count(),
        }
    }

    pub fn exceeds_preview(&self) -> bool {
        self.chars > COLLAPSED_PREVIEW_CHARS
    }
}

#[derive(Debug)]
pub struct Controller {
    url_input: String,
    analyze: AnalyzeState,
    revise: ReviseState,
    expanded: bool,
    copied_until: Option<Instant>,
    last_ticket: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            url_input: String::new(),
            analyze: AnalyzeState::Idle,
            revise: ReviseState::Idle,
            expanded: false,
            copied_until: None,
            last_ticket: 0,
        }
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn url_input_mut(&mut self) -> &mut String {
        &mut self.url_input
    }

    pub fn set_url_input(&mut self, url: impl Into<String>) {
        self.url_input = url.into();
    }

    pub fn analyze_state(&self) -> &AnalyzeState {
        &self.analyze
    }

    pub fn revise_state(&self) -> &ReviseState {
        &self.revise
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.analyze, AnalyzeState::Loading { .. })
    }

    pub fn is_revising(&self) -> bool {
        matches!(self.revise, ReviseState::Revising { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.analyze {
            AnalyzeState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match &self.analyze {
            AnalyzeState::Ready(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&str> {
        self.analysis().map(|analysis| analysis.text.as_str())
    }

    pub fn content(&self) -> Option<&Value> {
        self.analysis().map(|analysis| &analysis.content)
    }

    pub fn revised(&self) -> Option<&str> {
        match &self.revise {
            ReviseState::Revised(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn revise_error(&self) -> Option<&str> {
        match &self.revise {
            ReviseState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Mirrors the submit button: enabled with a non-blank URL and no
    /// analysis in flight.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.url_input.trim().is_empty()
    }

    pub fn can_revise(&self) -> bool {
        !self.is_revising() && self.analysis().is_some_and(Analysis::is_revisable)
    }

    /// Starts an analysis of the current URL input.
    ///
    /// Clears any previous result, error and revision. An analysis that is
    /// still in flight is superseded; its response will come back as
    /// [`Applied::Stale`].
    pub fn begin_analyze(&mut self) -> Result<AnalyzeCall, ControllerError> {
        let url = self.url_input.trim();
        if url.is_empty() {
            return Err(ControllerError::EmptyUrl);
        }
        let url = url.to_string();

        if let AnalyzeState::Loading { ticket, .. } = &self.analyze {
            debug!(superseded = ticket.0, "superseding in-flight analysis");
        }
        let ticket = self.next_ticket();
        self.analyze = AnalyzeState::Loading {
            ticket,
            url: url.clone(),
        };
        self.revise = ReviseState::Idle;
        self.copied_until = None;
        info!(%url, ticket = ticket.0, "analysis requested");

        Ok(AnalyzeCall {
            ticket,
            request: AnalyzeRequest { url },
        })
    }

    pub fn finish_analyze(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalyzeResponse, ServiceError>,
    ) -> Applied {
        let url = match &self.analyze {
            AnalyzeState::Loading {
                ticket: current,
                url,
            } if *current == ticket => url.clone(),
            _ => {
                debug!(ticket = ticket.0, "discarding stale analysis response");
                return Applied::Stale;
            }
        };

        self.analyze = match outcome {
            Ok(response) => {
                info!(%url, chars = response.analysis.len(), "analysis ready");
                AnalyzeState::Ready(Analysis {
                    url,
                    text: response.analysis,
                    content: response.content,
                })
            }
            Err(error) => {
                warn!(%url, %error, "analysis failed");
                AnalyzeState::Failed(error.user_message(ANALYZE_FAILURE_FALLBACK))
            }
        };
        Applied::Committed
    }

    /// Starts a revision of the analyzed document. Returns `None`, and
    /// changes nothing, unless a revisable analysis is on screen.
    pub fn begin_revise(&mut self) -> Option<ReviseCall> {
        let AnalyzeState::Ready(analysis) = &self.analyze else {
            return None;
        };
        if !analysis.is_revisable() {
            return None;
        }
        let request = ReviseRequest {
            content: analysis.content.clone(),
            suggestions: analysis.text.clone(),
        };

        let ticket = self.next_ticket();
        self.revise = ReviseState::Revising { ticket };
        info!(ticket = ticket.0, "revision requested");
        Some(ReviseCall { ticket, request })
    }

    pub fn finish_revise(
        &mut self,
        ticket: Ticket,
        outcome: Result<ReviseResponse, ServiceError>,
    ) -> Applied {
        if self.revise != (ReviseState::Revising { ticket }) {
            debug!(ticket = ticket.0, "discarding stale revision response");
            return Applied::Stale;
        }

        self.revise = match outcome {
            Ok(response) => {
                info!(chars = response.revised.len(), "revision ready");
                ReviseState::Revised(response.revised)
            }
            Err(error) => {
                warn!(%error, "revision failed");
                ReviseState::Failed(error.user_message(REVISE_FAILURE_FALLBACK))
            }
        };
        Applied::Committed
    }

    pub async fn submit<S>(&mut self, service: &S) -> Result<Applied, ControllerError>
    where
        S: DocService + ?Sized,
    {
        let call = self.begin_analyze()?;
        let outcome = service.analyze(&call.request).await;
        Ok(self.finish_analyze(call.ticket, outcome))
    }

    pub async fn revise<S>(&mut self, service: &S) -> Option<Applied>
    where
        S: DocService + ?Sized,
    {
        let call = self.begin_revise()?;
        let outcome = service.revise(&call.request).await;
        Some(self.finish_revise(call.ticket, outcome))
    }

    /// Copies the analysis text and lights the "copied" indicator for
    /// [`COPIED_INDICATOR_DURATION`] from `now`. Copying again restarts it.
    pub fn copy_result(
        &mut self,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> Result<(), ControllerError> {
        let text = self
            .result()
            .filter(|text| !text.is_empty())
            .ok_or(ControllerError::NothingToCopy)?;
        clipboard.set_text(text).map_err(|error| {
            warn!(%error, "failed to copy analysis");
            ControllerError::Clipboard(error)
        })?;
        self.copied_until = Some(now + COPIED_INDICATOR_DURATION);
        Ok(())
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    pub fn copied_until(&self) -> Option<Instant> {
        self.copied_until
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Label for the "show everything" affordance under a collapsed result
    /// that is longer than the preview.
    pub fn full_view_hint(&self) -> Option<String> {
        if self.expanded {
            return None;
        }
        let stats = self.analysis()?.stats();
        stats.exceeds_preview().then(|| {
            format!(
                "Show full analysis ({}k+ characters)",
                stats.chars.div_ceil(1000)
            )
        })
    }

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

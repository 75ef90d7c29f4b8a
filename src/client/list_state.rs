//! Pure state machine behind the hotel table.
//!
//! Every user or network event goes through [`ListState::apply`], which
//! updates the state and returns the commands the caller has to carry out
//! (arm the search timer, issue a fetch). Nothing in here sleeps or does I/O.

use super::api::ListParams;
use crate::models::hotel::{Hotel, HotelPage};
use crate::query::total_pages;

#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// The search box changed. Takes effect once the quiet period elapses.
    SearchChanged(String),
    /// The quiet period for the search identified by the token elapsed.
    SearchSettled(u64),
    PageChanged(u32),
    NextPage,
    PreviousPage,
    Refresh,
    /// Result of the fetch issued with sequence number `seq`.
    FetchResolved {
        seq: u64,
        outcome: Result<HotelPage, String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    /// Wait out the quiet period, then feed back `SearchSettled(token)`.
    ScheduleSearch { token: u64 },
    Fetch { seq: u64, params: ListParams },
}

/// Snapshot handed to whatever renders the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    pub records: Vec<Hotel>,
    pub total_count: i64,
    pub page: u32,
    pub total_pages: u32,
    pub search_text: String,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListState {
    input_text: String,
    pending_search: Option<(u64, String)>,
    next_token: u64,
    last_fetch: u64,
    params: ListParams,
    last_result: HotelPage,
    loading: bool,
    error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            pending_search: None,
            next_token: 0,
            last_fetch: 0,
            params: ListParams::new("", 1),
            last_result: HotelPage::default(),
            loading: false,
            error: None,
        }
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn page(&self) -> u32 {
        self.params.page
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.last_result.total_count)
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending_search.is_some()
    }

    pub fn view(&self) -> ListView {
        ListView {
            records: self.last_result.hotels.clone(),
            total_count: self.last_result.total_count,
            page: self.params.page,
            total_pages: self.total_pages(),
            search_text: self.input_text.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    pub fn apply(&mut self, event: ListEvent) -> Vec<ListCommand> {
        match event {
            ListEvent::SearchChanged(text) => {
                self.next_token += 1;
                self.input_text = text.clone();
                self.pending_search = Some((self.next_token, text));
                vec![ListCommand::ScheduleSearch {
                    token: self.next_token,
                }]
            }
            ListEvent::SearchSettled(token) => match self.pending_search.take() {
                Some((pending, text)) if pending == token => {
                    self.params = ListParams::new(text, 1);
                    vec![self.fetch()]
                }
                other => {
                    // A newer keystroke superseded this timer.
                    self.pending_search = other;
                    Vec::new()
                }
            },
            ListEvent::PageChanged(page) => self.go_to(page),
            ListEvent::NextPage => {
                let next = self.params.page.saturating_add(1).min(self.total_pages());
                self.go_to(next)
            }
            ListEvent::PreviousPage => self.go_to(self.params.page.saturating_sub(1)),
            ListEvent::Refresh => vec![self.fetch()],
            ListEvent::FetchResolved { seq, outcome } => self.resolve(seq, outcome),
        }
    }

    fn go_to(&mut self, page: u32) -> Vec<ListCommand> {
        let page = page.max(1);
        if page == self.params.page {
            return Vec::new();
        }
        self.params.page = page;
        vec![self.fetch()]
    }

    fn fetch(&mut self) -> ListCommand {
        self.loading = true;
        self.last_fetch += 1;
        ListCommand::Fetch {
            seq: self.last_fetch,
            params: self.params.clone(),
        }
    }

    /// Only the most recently issued fetch may change what is shown, even
    /// when an older one asked for the same parameters.
    fn resolve(&mut self, seq: u64, outcome: Result<HotelPage, String>) -> Vec<ListCommand> {
        if seq != self.last_fetch {
            log::debug!("discarding stale hotel page from fetch {seq}");
            return Vec::new();
        }

        match outcome {
            Ok(page) => {
                self.last_result = page;
                self.error = None;
                let last_page = self.total_pages();
                if self.params.page > last_page {
                    self.params.page = last_page;
                    return vec![self.fetch()];
                }
                self.loading = false;
            }
            Err(message) => {
                // Keep showing the last good page.
                self.loading = false;
                self.error = Some(message);
            }
        }
        Vec::new()
    }
}

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

use super::api::HotelApi;
use super::debounce::Debouncer;
use super::list_state::{ListCommand, ListEvent, ListState, ListView};

/// Drives a [`ListState`] against a [`HotelApi`]: runs the search timer,
/// issues fetches and publishes a fresh [`ListView`] after every change.
///
/// Must be used from inside a tokio runtime.
pub struct ListController<A: HotelApi> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    api: Arc<A>,
    state: Mutex<ListState>,
    debouncer: Debouncer,
    quiet_period: Duration,
    views: watch::Sender<ListView>,
}

impl<A: HotelApi> Clone for ListController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: HotelApi> ListController<A> {
    pub fn new(api: Arc<A>, quiet_period: Duration) -> Self {
        let state = ListState::new();
        let (views, _) = watch::channel(state.view());
        Self {
            inner: Arc::new(Inner {
                api,
                state: Mutex::new(state),
                debouncer: Debouncer::new(),
                quiet_period,
                views,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListView> {
        self.inner.views.subscribe()
    }

    pub fn view(&self) -> ListView {
        self.lock().view()
    }

    pub fn page(&self) -> u32 {
        self.lock().page()
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        self.dispatch(ListEvent::SearchChanged(text.into()));
    }

    pub fn set_page(&self, page: u32) {
        self.dispatch(ListEvent::PageChanged(page));
    }

    pub fn next_page(&self) {
        self.dispatch(ListEvent::NextPage);
    }

    pub fn previous_page(&self) {
        self.dispatch(ListEvent::PreviousPage);
    }

    /// Re-fetches with the current search text and page.
    pub fn refresh(&self) {
        self.dispatch(ListEvent::Refresh);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ListState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: ListEvent) {
        let commands = {
            let mut state = self.lock();
            let commands = state.apply(event);
            self.inner.views.send_replace(state.view());
            commands
        };
        for command in commands {
            self.run(command);
        }
    }

    fn run(&self, command: ListCommand) {
        match command {
            ListCommand::ScheduleSearch { token } => {
                let this = self.clone();
                self.inner
                    .debouncer
                    .schedule(self.inner.quiet_period, async move {
                        this.dispatch(ListEvent::SearchSettled(token));
                    });
            }
            ListCommand::Fetch { seq, params } => {
                let this = self.clone();
                tokio::spawn(async move {
                    let outcome = this.inner.api.list(&params).await.map_err(|err| {
                        log::warn!("hotel list fetch failed for {params:?}: {err}");
                        err.to_string()
                    });
                    this.dispatch(ListEvent::FetchResolved { seq, outcome });
                });
            }
        }
    }
}

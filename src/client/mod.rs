//! Browser-side half of the directory: the hotel table's list state, the
//! search debounce, and the create/edit dialogs.

pub mod api;
pub mod controller;
pub mod debounce;
pub mod dialog;
pub mod form;
pub mod list_state;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, HotelApi, HttpHotelApi, ListParams};
pub use controller::ListController;
pub use dialog::{DialogError, DialogOrchestrator, DialogState};
pub use form::HotelForm;
pub use list_state::{ListCommand, ListEvent, ListState, ListView};

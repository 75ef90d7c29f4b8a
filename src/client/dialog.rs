//! Create/Edit dialog lifecycle and how a successful mutation feeds back into
//! the hotel list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use super::api::{ApiError, HotelApi};
use super::controller::ListController;
use super::form::HotelForm;
use crate::models::hotel::{Hotel, HotelPayload};

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("no dialog is open")]
    NotOpen,
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("invalid form: {0}")]
    Invalid(ValidationErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Per-dialog form state. `submitting` doubles as the disabled flag of the
/// submit control. `id` is unique per opened dialog, so a result can be
/// matched to the dialog that submitted it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSession {
    pub id: u64,
    pub form: HotelForm,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DialogState {
    #[default]
    Closed,
    CreateOpen(FormSession),
    EditOpen {
        record: Hotel,
        session: FormSession,
    },
}

/// A validated request taken from an open dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub session: u64,
    pub kind: MutationKind,
    pub payload: HotelPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFollowUp {
    Refresh,
    ResetToFirstPage,
}

/// What the list has to do after a successful mutation. New records sort
/// first, so a create has to land on page 1; an edit keeps its position.
pub fn follow_up(kind: MutationKind, current_page: u32) -> ListFollowUp {
    match kind {
        MutationKind::Created if current_page != 1 => ListFollowUp::ResetToFirstPage,
        MutationKind::Created | MutationKind::Updated => ListFollowUp::Refresh,
    }
}

impl FormSession {
    fn open(form: HotelForm) -> Self {
        Self {
            id: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            form,
            ..Self::default()
        }
    }
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::Closed)
    }

    /// Opens the create dialog. Ignored while another dialog is open.
    pub fn open_create(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        *self = DialogState::CreateOpen(FormSession::open(HotelForm::default()));
        true
    }

    pub fn open_edit(&mut self, record: Hotel) -> bool {
        if self.is_open() {
            return false;
        }
        let session = FormSession::open(HotelForm::from_hotel(&record));
        *self = DialogState::EditOpen { record, session };
        true
    }

    pub fn close(&mut self) {
        *self = DialogState::Closed;
    }

    pub fn session(&self) -> Option<&FormSession> {
        match self {
            DialogState::Closed => None,
            DialogState::CreateOpen(session) | DialogState::EditOpen { session, .. } => {
                Some(session)
            }
        }
    }

    fn session_mut(&mut self) -> Option<&mut FormSession> {
        match self {
            DialogState::Closed => None,
            DialogState::CreateOpen(session) | DialogState::EditOpen { session, .. } => {
                Some(session)
            }
        }
    }

    fn session_mut_for(&mut self, id: u64) -> Option<&mut FormSession> {
        self.session_mut().filter(|session| session.id == id)
    }

    pub fn form_mut(&mut self) -> Option<&mut HotelForm> {
        self.session_mut().map(|session| &mut session.form)
    }

    /// Checks the form and marks the dialog as submitting. Rejects a second
    /// submission while one is in flight.
    pub fn begin_submit(&mut self) -> Result<Submission, DialogError> {
        let submission = match self {
            DialogState::Closed => return Err(DialogError::NotOpen),
            DialogState::CreateOpen(session) => {
                check(session)?;
                Submission {
                    session: session.id,
                    kind: MutationKind::Created,
                    payload: session.form.to_payload(None, Vec::new()),
                }
            }
            DialogState::EditOpen { record, session } => {
                check(session)?;
                Submission {
                    session: session.id,
                    kind: MutationKind::Updated,
                    payload: session
                        .form
                        .to_payload(Some(record.id.clone()), record.photos.0.clone()),
                }
            }
        };

        if let Some(session) = self.session_mut() {
            session.submitting = true;
            session.error = None;
        }
        Ok(submission)
    }

    /// Leaves dialog `session` open with the submit control enabled again.
    /// Returns `false` when that dialog is no longer the open one.
    pub fn submit_failed(&mut self, session: u64, message: impl Into<String>) -> bool {
        match self.session_mut_for(session) {
            Some(open) => {
                open.submitting = false;
                open.error = Some(message.into());
                true
            }
            None => false,
        }
    }

    /// Closes dialog `session` if it is still the open one.
    pub fn submit_succeeded(&mut self, session: u64) -> bool {
        if self.session_mut_for(session).is_none() {
            return false;
        }
        self.close();
        true
    }
}

fn check(session: &mut FormSession) -> Result<(), DialogError> {
    if session.submitting {
        return Err(DialogError::AlreadySubmitting);
    }
    session.form.validate().map_err(|errors| {
        session.error = Some(errors.to_string());
        DialogError::Invalid(errors)
    })
}

/// Owns the dialog state and talks to the API and the list on its behalf.
pub struct DialogOrchestrator<A: HotelApi> {
    api: Arc<A>,
    list: ListController<A>,
    state: Mutex<DialogState>,
}

impl<A: HotelApi> DialogOrchestrator<A> {
    pub fn new(api: Arc<A>, list: ListController<A>) -> Self {
        Self {
            api,
            list,
            state: Mutex::new(DialogState::Closed),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> DialogState {
        self.lock().clone()
    }

    pub fn open_create(&self) -> bool {
        self.lock().open_create()
    }

    pub fn open_edit(&self, record: Hotel) -> bool {
        self.lock().open_edit(record)
    }

    pub fn cancel(&self) {
        self.lock().close();
    }

    pub fn edit_form(&self, edit: impl FnOnce(&mut HotelForm)) {
        if let Some(form) = self.lock().form_mut() {
            edit(form);
        }
    }

    /// Submits the open dialog. On success the dialog closes and the list is
    /// refreshed exactly once; on failure the dialog stays open for a retry.
    /// A result that arrives after its dialog was cancelled leaves whatever
    /// dialog is open now untouched.
    pub async fn submit(&self) -> Result<Hotel, DialogError> {
        let Submission {
            session,
            kind,
            payload,
        } = self.lock().begin_submit()?;

        let result = match kind {
            MutationKind::Created => self.api.create(&payload).await,
            MutationKind::Updated => self.api.update(&payload).await,
        };

        match result {
            Ok(hotel) => {
                if !self.lock().submit_succeeded(session) {
                    log::debug!("dialog {session} closed before its {kind:?} completed");
                }
                match follow_up(kind, self.list.page()) {
                    ListFollowUp::Refresh => self.list.refresh(),
                    ListFollowUp::ResetToFirstPage => self.list.set_page(1),
                }
                Ok(hotel)
            }
            Err(err) => {
                log::warn!("hotel {kind:?} submission failed: {err}");
                self.lock().submit_failed(session, err.to_string());
                Err(err.into())
            }
        }
    }
}

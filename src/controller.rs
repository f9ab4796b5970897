//! Navigation controller
//!
//! Every navigation cause (start, hash change, manual mailbox entry)
//! enters through [`NavigationController::handle`]. A navigation runs
//! as a sequence of fetches:
//!
//! ```text
//!   Idle
//!     -> ResolvingMailbox   GET /api/mailboxes/list, render label
//!                           GET /api/messages/list
//!     -> MailboxReady       (or MailboxFailed)
//!     -> ResolvingMessage   GET /api/messages/details
//!     -> MessageReady       (or MessageFailed, detail pane reset)
//! ```
//!
//! Each fetch is an await point, and a newer navigation may start while
//! an older one is still waiting. Every navigation takes a fresh epoch;
//! after each await it compares its epoch with the current one and
//! drops its result if a newer navigation has started since. Nothing
//! is cancelled, stale results are only discarded.
//!
//! The controller runs on a single thread. State lives in `RefCell`s
//! and no borrow is held across an await.

use crate::client::MailApi;
use crate::error::{Error, Result};
use crate::mailbox::Mailbox;
use crate::router::{self, HOME, NavigationTarget, ROUTE_PREFIX};
use crate::view::{self, RenderOp, ViewState};
use std::cell::RefCell;
use tracing::{debug, info, warn};

/// Something that asks the controller to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Initial load with the hash present at that moment.
    Start(String),
    /// The location hash changed to this value.
    HashChanged(String),
    /// The user typed a mailbox name and pressed Enter.
    MailboxSubmitted(String),
}

/// Where the most recent navigation currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    ResolvingMailbox,
    MailboxReady,
    MailboxFailed,
    ResolvingMessage,
    MessageReady,
    MessageFailed,
}

/// How one call to [`NavigationController::handle`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The navigation ran to the end and left the view in this phase.
    Completed(Phase),
    /// A newer navigation started first; this one's results were dropped.
    Superseded,
    /// The event did not change the location, so nothing was fetched.
    Unchanged,
}

/// Session state owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub epoch: u64,
    pub phase: Phase,
    pub location: String,
    pub selected_mailbox: Option<Mailbox>,
    pub selected_message_id: Option<String>,
}

/// Drives a [`MailApi`] and a [`ViewState`] from navigation events.
pub struct NavigationController<A> {
    api: A,
    state: RefCell<NavigationState>,
    view: RefCell<ViewState>,
}

// Navigation futures borrow the `RefCell`s and stay on one thread.
#[allow(clippy::future_not_send)]
impl<A: MailApi> NavigationController<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RefCell::new(NavigationState {
                location: HOME.to_string(),
                ..NavigationState::default()
            }),
            view: RefCell::new(ViewState::new()),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Snapshot of the session state.
    #[must_use]
    pub fn state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn location(&self) -> String {
        self.state.borrow().location.clone()
    }

    /// Single entry point for every navigation cause.
    pub async fn handle(&self, event: NavigationEvent) -> NavigationOutcome {
        match event {
            NavigationEvent::Start(hash)
            | NavigationEvent::HashChanged(hash) => self.navigate(&hash).await,
            NavigationEvent::MailboxSubmitted(value) => {
                let hash = router::format(Some(value.trim()), None);
                if self.location() == hash {
                    debug!("Location already at {}, no hash change", hash);
                    return NavigationOutcome::Unchanged;
                }
                self.navigate(&hash).await
            }
        }
    }

    /// Delete the selected message, then reload its mailbox.
    ///
    /// If another navigation starts while the delete request is in
    /// flight, the reload is skipped and the result is
    /// [`NavigationOutcome::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no message is selected, or the
    /// error of the delete request. The view is left untouched on
    /// error.
    pub async fn delete_selected_message(&self) -> Result<NavigationOutcome> {
        let (epoch, message_id, location) = {
            let state = self.state.borrow();
            (
                state.epoch,
                state.selected_message_id.clone(),
                state.location.clone(),
            )
        };

        let message_id = message_id
            .ok_or_else(|| Error::NotFound("no message selected".into()))?;
        self.api.delete_message(&message_id).await?;
        if !self.is_current(epoch) {
            return Ok(self.superseded(epoch));
        }

        let target = router::parse(&location).decoded();
        let hash = router::format(target.mailbox_name(), None);

        Ok(self.navigate(&hash).await)
    }

    async fn navigate(&self, hash: &str) -> NavigationOutcome {
        let target = router::parse(hash);

        let location = if target.is_empty() && hash.starts_with(ROUTE_PREFIX) {
            debug!("Invalid route {}, redirecting home", hash);
            HOME
        } else {
            hash
        };

        let target = target.decoded();
        let epoch = self.begin(location);
        info!("Navigation #{} to {:?}", epoch, target);

        self.run(epoch, &target).await
    }

    async fn run(
        &self,
        epoch: u64,
        target: &NavigationTarget,
    ) -> NavigationOutcome {
        let mailbox_name = target.mailbox_name().unwrap_or_default();
        let message_id = target.message_id();

        let mailboxes = self.api.list_mailboxes().await;
        if !self.is_current(epoch) {
            return self.superseded(epoch);
        }

        let mailboxes = match mailboxes {
            Ok(mailboxes) => mailboxes,
            Err(e) => {
                warn!("Cannot list mailboxes: {}", e);
                let ops = [
                    view::show_mailbox_label(&Mailbox::stand_in(mailbox_name)),
                    view::show_mailbox_failure(&e.to_string()),
                ]
                .concat();
                return self.fail_mailbox(epoch, ops);
            }
        };

        let mailbox = Mailbox::resolve(&mailboxes, mailbox_name);
        debug!("Resolved '{}' to mailbox id '{}'", mailbox_name, mailbox.id);

        let ops = [
            view::show_mailbox_label(&mailbox),
            view::show_message_list_loading(),
        ]
        .concat();
        self.commit(epoch, ops, |state| {
            state.selected_mailbox = Some(mailbox.clone());
            state.selected_message_id = message_id.map(str::to_string);
        });

        let messages = self.api.list_messages(&mailbox.id).await;
        if !self.is_current(epoch) {
            return self.superseded(epoch);
        }

        let messages = match messages {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Cannot list messages of '{}': {}", mailbox.id, e);
                let ops = view::show_mailbox_failure(&e.to_string());
                return self.fail_mailbox(epoch, ops);
            }
        };

        let ops = view::show_message_list(
            &messages,
            mailbox.display_name(),
            message_id,
        );
        self.commit(epoch, ops, |state| state.phase = Phase::MailboxReady);

        let Some(message_id) = message_id else {
            self.commit(epoch, view::show_no_message_selected(), |_| {});
            return NavigationOutcome::Completed(Phase::MailboxReady);
        };

        let ops = view::set_selected_message_highlight(Some(message_id));
        self.commit(epoch, ops, |state| state.phase = Phase::ResolvingMessage);

        let detail = self.api.get_message_detail(message_id).await;
        if !self.is_current(epoch) {
            return self.superseded(epoch);
        }

        match detail {
            Ok(message) => {
                let ops = view::show_message_detail(&message);
                self.commit(epoch, ops, |state| {
                    state.phase = Phase::MessageReady;
                });
                NavigationOutcome::Completed(Phase::MessageReady)
            }
            Err(e) => {
                warn!("Cannot load message '{}': {}", message_id, e);
                let ops = view::show_no_message_selected();
                self.commit(epoch, ops, |state| {
                    state.phase = Phase::MessageFailed;
                });
                NavigationOutcome::Completed(Phase::MessageFailed)
            }
        }
    }

    // -- state helpers --

    fn begin(&self, location: &str) -> u64 {
        let mut state = self.state.borrow_mut();
        state.epoch += 1;
        state.phase = Phase::ResolvingMailbox;
        location.clone_into(&mut state.location);
        state.epoch
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.state.borrow().epoch == epoch
    }

    fn superseded(&self, epoch: u64) -> NavigationOutcome {
        debug!(
            "Dropping result of navigation #{}, now at #{}",
            epoch,
            self.state.borrow().epoch
        );
        NavigationOutcome::Superseded
    }

    /// Apply `ops` and `update` only if `epoch` is still the latest
    /// navigation.
    fn commit(
        &self,
        epoch: u64,
        ops: Vec<RenderOp>,
        update: impl FnOnce(&mut NavigationState),
    ) {
        {
            let mut state = self.state.borrow_mut();
            if state.epoch != epoch {
                return;
            }
            update(&mut state);
        }
        self.view.borrow_mut().apply(ops);
    }

    fn fail_mailbox(
        &self,
        epoch: u64,
        ops: Vec<RenderOp>,
    ) -> NavigationOutcome {
        self.commit(epoch, ops, |state| {
            state.phase = Phase::MailboxFailed;
            state.selected_message_id = None;
        });
        NavigationOutcome::Completed(Phase::MailboxFailed)
    }
}

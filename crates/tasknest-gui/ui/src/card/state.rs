pub const TASK_COMPLETED_MESSAGE: &str =
  "Task completed!";
pub const TASK_REOPENED_MESSAGE: &str =
  "Task marked as incomplete";
pub const TOGGLE_FAILED_NOTICE: &str =
  "Failed to update task. Please try \
   again.";
pub const DELETE_FAILED_NOTICE: &str =
  "Failed to delete task. Please try \
   again.";

/// What the card is doing right now. Only one mutation can be pending at a
/// time, and editing excludes both.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum CardPhase {
  #[default]
  Viewing,
  Editing,
  ConfirmingDelete,
  Deleting,
  TogglingCompletion
}

impl CardPhase {
  pub fn is_editing(self) -> bool {
    self == CardPhase::Editing
  }

  pub fn shows_delete_dialog(
    self
  ) -> bool {
    matches!(
      self,
      CardPhase::ConfirmingDelete
        | CardPhase::Deleting
    )
  }

  pub fn is_deleting(self) -> bool {
    self == CardPhase::Deleting
  }

  pub fn is_toggling(self) -> bool {
    self
      == CardPhase::TogglingCompletion
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum ToastKind {
  Success,
  Error
}

impl ToastKind {
  pub fn class(self) -> &'static str {
    match self {
      | ToastKind::Success => {
        "toast success"
      }
      | ToastKind::Error => {
        "toast error"
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub struct ToastMessage {
  pub kind:    ToastKind,
  pub message: String,
  /// Bumped for every toast shown so a repeated message restarts its
  /// dismiss timer.
  pub seq:     u64
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Default,
)]
pub struct CardState {
  pub phase:    CardPhase,
  pub toast:    Option<ToastMessage>,
  toasts_shown: u64
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum CardEvent {
  EditRequested,
  EditSaved,
  EditCancelled,
  DeleteRequested,
  DeleteCancelled,
  DeleteConfirmed,
  DeleteSucceeded,
  DeleteFailed,
  ToggleRequested,
  ToggleSucceeded {
    was_completed: bool
  },
  ToggleFailed,
  ToggleSettled,
  ToastDismissed
}

/// Follow-up work the caller has to perform after an event was applied.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum CardEffect {
  IssueDelete,
  IssueToggle,
  RefreshParent,
  Alert(&'static str)
}

impl CardState {
  pub fn apply(
    &mut self,
    event: CardEvent
  ) -> Option<CardEffect> {
    use CardEvent as E;
    use CardPhase as P;

    match (self.phase, event) {
      | (P::Viewing, E::EditRequested) => {
        self.phase = P::Editing;
        None
      }
      | (P::Editing, E::EditSaved) => {
        self.phase = P::Viewing;
        Some(CardEffect::RefreshParent)
      }
      | (
        P::Editing,
        E::EditCancelled
      ) => {
        self.phase = P::Viewing;
        None
      }
      | (
        P::Viewing,
        E::DeleteRequested
      ) => {
        self.phase =
          P::ConfirmingDelete;
        None
      }
      | (
        P::ConfirmingDelete,
        E::DeleteCancelled
      ) => {
        self.phase = P::Viewing;
        None
      }
      | (
        P::ConfirmingDelete,
        E::DeleteConfirmed
      ) => {
        self.phase = P::Deleting;
        Some(CardEffect::IssueDelete)
      }
      // The parent unmounts the card once the task is gone.
      | (
        P::Deleting,
        E::DeleteSucceeded
      ) => {
        Some(CardEffect::RefreshParent)
      }
      | (P::Deleting, E::DeleteFailed) => {
        self.phase = P::Viewing;
        Some(CardEffect::Alert(
          DELETE_FAILED_NOTICE
        ))
      }
      | (
        P::Viewing,
        E::ToggleRequested
      ) => {
        self.phase =
          P::TogglingCompletion;
        Some(CardEffect::IssueToggle)
      }
      | (
        P::TogglingCompletion,
        E::ToggleSucceeded {
          was_completed
        }
      ) => {
        let message = if was_completed
        {
          TASK_REOPENED_MESSAGE
        } else {
          TASK_COMPLETED_MESSAGE
        };
        self.toasts_shown += 1;
        self.toast =
          Some(ToastMessage {
            kind:    ToastKind::Success,
            message: message
              .to_string(),
            seq:     self.toasts_shown
          });
        Some(CardEffect::RefreshParent)
      }
      | (
        P::TogglingCompletion,
        E::ToggleFailed
      ) => {
        Some(CardEffect::Alert(
          TOGGLE_FAILED_NOTICE
        ))
      }
      | (
        P::TogglingCompletion,
        E::ToggleSettled
      ) => {
        self.phase = P::Viewing;
        None
      }
      | (_, E::ToastDismissed) => {
        self.toast = None;
        None
      }
      | (phase, event) => {
        tracing::debug!(
          ?phase,
          ?event,
          "ignored card event"
        );
        None
      }
    }
  }
}

/// Performs the parent refresh or the alert an applied event asked for and
/// hands back the effects that still need an API call.
pub fn route_effect<R, A>(
  effect: Option<CardEffect>,
  refresh: R,
  alert: A
) -> Option<CardEffect>
where
  R: FnOnce(),
  A: FnOnce(&'static str)
{
  match effect {
    | Some(CardEffect::RefreshParent) => {
      refresh();
      None
    }
    | Some(CardEffect::Alert(notice)) => {
      alert(notice);
      None
    }
    | other => other
  }
}

/// Runs `release` exactly once when dropped, whichever way the owning
/// future ends.
pub struct InFlightGuard<F>
where
  F: FnOnce()
{
  release: Option<F>
}

impl<F> InFlightGuard<F>
where
  F: FnOnce()
{
  pub fn new(release: F) -> Self {
    Self {
      release: Some(release)
    }
  }
}

impl<F> Drop for InFlightGuard<F>
where
  F: FnOnce()
{
  fn drop(&mut self) {
    if let Some(release) =
      self.release.take()
    {
      release();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::{
    Cell,
    RefCell
  };
  use std::rc::Rc;

  use super::*;

  /// Stand-in backend that records calls and flips completion.
  #[derive(Default)]
  struct FakeBackend {
    completed:     bool,
    toggle_calls:  usize,
    delete_calls:  usize,
    fail_next:     bool
  }

  impl FakeBackend {
    fn toggle(
      &mut self
    ) -> Result<bool, ()> {
      self.toggle_calls += 1;
      if std::mem::take(
        &mut self.fail_next
      ) {
        return Err(());
      }
      self.completed = !self.completed;
      Ok(self.completed)
    }

    fn delete(
      &mut self
    ) -> Result<(), ()> {
      self.delete_calls += 1;
      if std::mem::take(
        &mut self.fail_next
      ) {
        return Err(());
      }
      Ok(())
    }
  }

  /// Toggles the way the card does, with the settle event sent by the
  /// guard. Returns the effects seen after the request.
  fn run_toggle(
    card: &mut CardState,
    backend: &mut FakeBackend
  ) -> Vec<CardEffect> {
    let was_completed =
      backend.completed;
    let mut effects = Vec::new();
    if card.apply(
      CardEvent::ToggleRequested
    ) != Some(CardEffect::IssueToggle)
    {
      return effects;
    }

    let outcome = backend.toggle();
    let event = match outcome {
      | Ok(_) => {
        CardEvent::ToggleSucceeded {
          was_completed
        }
      }
      | Err(()) => {
        CardEvent::ToggleFailed
      }
    };
    effects.extend(card.apply(event));
    effects.extend(
      card.apply(CardEvent::ToggleSettled)
    );
    effects
  }

  #[test]
  fn starts_viewing_without_toast() {
    let card = CardState::default();
    assert_eq!(
      card.phase,
      CardPhase::Viewing
    );
    assert!(card.toast.is_none());
  }

  #[test]
  fn toggle_success_toasts_and_refreshes(
  ) {
    let mut card = CardState::default();
    let mut backend =
      FakeBackend::default();

    let effects =
      run_toggle(&mut card, &mut backend);

    assert_eq!(effects, vec![
      CardEffect::RefreshParent
    ]);
    assert_eq!(
      card.phase,
      CardPhase::Viewing
    );
    assert_eq!(
      card
        .toast
        .as_ref()
        .map(|toast| toast
          .message
          .as_str()),
      Some(TASK_COMPLETED_MESSAGE)
    );
  }

  #[test]
  fn toggling_twice_gives_complementary_toasts(
  ) {
    let mut card = CardState::default();
    let mut backend =
      FakeBackend::default();
    let original = backend.completed;

    run_toggle(&mut card, &mut backend);
    let first = card.toast.clone();
    run_toggle(&mut card, &mut backend);
    let second = card.toast.clone();

    assert_eq!(
      backend.completed,
      original
    );
    assert_eq!(backend.toggle_calls, 2);
    assert_eq!(
      first.map(|toast| toast.message),
      Some(
        TASK_COMPLETED_MESSAGE
          .to_string()
      )
    );
    assert_eq!(
      second.map(|toast| toast.message),
      Some(
        TASK_REOPENED_MESSAGE
          .to_string()
      )
    );
  }

  #[test]
  fn second_toggle_while_in_flight_is_dropped(
  ) {
    let mut card = CardState::default();

    assert_eq!(
      card.apply(
        CardEvent::ToggleRequested
      ),
      Some(CardEffect::IssueToggle)
    );
    assert_eq!(
      card.apply(
        CardEvent::ToggleRequested
      ),
      None
    );
    assert!(card.phase.is_toggling());

    card.apply(
      CardEvent::ToggleSettled
    );
    assert_eq!(
      card.apply(
        CardEvent::ToggleRequested
      ),
      Some(CardEffect::IssueToggle)
    );
  }

  #[test]
  fn toggle_failure_alerts_without_toast(
  ) {
    let mut card = CardState::default();
    let mut backend = FakeBackend {
      fail_next: true,
      ..FakeBackend::default()
    };

    let effects =
      run_toggle(&mut card, &mut backend);

    assert_eq!(effects, vec![
      CardEffect::Alert(
        TOGGLE_FAILED_NOTICE
      )
    ]);
    assert!(card.toast.is_none());
    assert_eq!(
      card.phase,
      CardPhase::Viewing
    );
    assert!(!backend.completed);
  }

  #[test]
  fn delete_waits_for_confirmation() {
    let mut card = CardState::default();
    let mut backend =
      FakeBackend::default();

    let requested = card.apply(
      CardEvent::DeleteRequested
    );
    assert_eq!(requested, None);
    assert!(
      card.phase.shows_delete_dialog()
    );
    assert_eq!(backend.delete_calls, 0);

    assert_eq!(
      card.apply(
        CardEvent::DeleteConfirmed
      ),
      Some(CardEffect::IssueDelete)
    );
    backend
      .delete()
      .expect("delete succeeds");
    assert_eq!(
      card.apply(
        CardEvent::DeleteSucceeded
      ),
      Some(CardEffect::RefreshParent)
    );
    assert_eq!(backend.delete_calls, 1);
    assert!(card.phase.is_deleting());
  }

  #[test]
  fn cancelled_delete_never_calls() {
    let mut card = CardState::default();

    card.apply(
      CardEvent::DeleteRequested
    );
    assert_eq!(
      card.apply(
        CardEvent::DeleteCancelled
      ),
      None
    );
    assert_eq!(
      card.phase,
      CardPhase::Viewing
    );
    assert!(
      !card.phase.shows_delete_dialog()
    );
  }

  #[test]
  fn cancel_is_ignored_while_deleting() {
    let mut card = CardState::default();
    card.apply(
      CardEvent::DeleteRequested
    );
    card.apply(
      CardEvent::DeleteConfirmed
    );

    assert_eq!(
      card.apply(
        CardEvent::DeleteCancelled
      ),
      None
    );
    assert_eq!(
      card.apply(
        CardEvent::DeleteConfirmed
      ),
      None
    );
    assert!(card.phase.is_deleting());
  }

  #[test]
  fn failed_delete_closes_dialog() {
    let mut card = CardState::default();
    let mut backend = FakeBackend {
      fail_next: true,
      ..FakeBackend::default()
    };

    card.apply(
      CardEvent::DeleteRequested
    );
    card.apply(
      CardEvent::DeleteConfirmed
    );
    assert!(backend.delete().is_err());

    assert_eq!(
      card.apply(
        CardEvent::DeleteFailed
      ),
      Some(CardEffect::Alert(
        DELETE_FAILED_NOTICE
      ))
    );
    assert_eq!(
      card.phase,
      CardPhase::Viewing
    );
    assert!(
      !card.phase.shows_delete_dialog()
    );
    assert!(!card.phase.is_deleting());
  }

  #[test]
  fn edit_round_trips_to_viewing() {
    let mut card = CardState::default();

    card.apply(CardEvent::EditRequested);
    assert!(card.phase.is_editing());
    assert_eq!(
      card.apply(
        CardEvent::EditCancelled
      ),
      None
    );
    assert_eq!(
      card.phase,
      CardPhase::Viewing
    );

    card.apply(CardEvent::EditRequested);
    assert_eq!(
      card.apply(CardEvent::EditSaved),
      Some(CardEffect::RefreshParent)
    );
    assert_eq!(
      card.phase,
      CardPhase::Viewing
    );
  }

  #[test]
  fn editing_excludes_mutations() {
    let mut card = CardState::default();
    card.apply(CardEvent::EditRequested);

    assert_eq!(
      card.apply(
        CardEvent::ToggleRequested
      ),
      None
    );
    assert_eq!(
      card.apply(
        CardEvent::DeleteRequested
      ),
      None
    );
    assert!(card.phase.is_editing());
  }

  #[test]
  fn toast_dismissal_clears_message() {
    let mut card = CardState {
      toast: Some(ToastMessage {
        kind:    ToastKind::Success,
        message: "done".to_string(),
        seq:     1
      }),
      ..CardState::default()
    };

    card.apply(
      CardEvent::ToastDismissed
    );
    assert!(card.toast.is_none());
  }

  #[test]
  fn guard_releases_once_on_every_exit() {
    let releases = Rc::new(Cell::new(0));

    {
      let releases = releases.clone();
      let _guard =
        InFlightGuard::new(move || {
          releases
            .set(releases.get() + 1)
        });
    }
    assert_eq!(releases.get(), 1);

    let card = Rc::new(RefCell::new(
      CardState::default()
    ));
    card.borrow_mut().apply(
      CardEvent::ToggleRequested
    );
    let outcome =
      std::panic::catch_unwind(
        std::panic::AssertUnwindSafe(
          || {
            let card = card.clone();
            let _guard =
              InFlightGuard::new(
                move || {
                  card.borrow_mut().apply(
                    CardEvent::ToggleSettled
                  );
                }
              );
            panic!("request blew up");
          }
        )
      );

    assert!(outcome.is_err());
    assert_eq!(
      card.borrow().phase,
      CardPhase::Viewing
    );
  }

  #[test]
  fn repeated_toast_gets_fresh_sequence() {
    let mut card = CardState::default();
    let mut seqs = Vec::new();
    for _ in 0..2 {
      card.apply(
        CardEvent::ToggleRequested
      );
      card.apply(
        CardEvent::ToggleSucceeded {
          was_completed: false
        }
      );
      card.apply(
        CardEvent::ToggleSettled
      );
      let toast = card
        .toast
        .clone()
        .expect("toast shown");
      assert_eq!(
        toast.message,
        TASK_COMPLETED_MESSAGE
      );
      seqs.push(toast.seq);
    }

    assert_eq!(seqs, vec![1, 2]);
  }

  fn routed(
    card: &mut CardState,
    event: CardEvent
  ) -> (
    Option<CardEffect>,
    usize,
    Vec<&'static str>
  ) {
    let refreshes = Cell::new(0);
    let alerts = RefCell::new(Vec::new());
    let rest = route_effect(
      card.apply(event),
      || refreshes.set(refreshes.get() + 1),
      |notice| alerts.borrow_mut().push(notice)
    );
    (rest, refreshes.get(), alerts.into_inner())
  }

  #[test]
  fn failures_alert_without_refreshing() {
    let mut card = CardState::default();
    routed(&mut card, CardEvent::ToggleRequested);

    let (rest, refreshes, alerts) =
      routed(&mut card, CardEvent::ToggleFailed);
    assert_eq!(rest, None);
    assert_eq!(refreshes, 0);
    assert_eq!(alerts, vec![TOGGLE_FAILED_NOTICE]);

    routed(&mut card, CardEvent::ToggleSettled);
    routed(&mut card, CardEvent::DeleteRequested);
    routed(&mut card, CardEvent::DeleteConfirmed);
    let (_, refreshes, alerts) =
      routed(&mut card, CardEvent::DeleteFailed);
    assert_eq!(refreshes, 0);
    assert_eq!(alerts, vec![DELETE_FAILED_NOTICE]);
  }

  #[test]
  fn successes_refresh_parent_exactly_once() {
    let mut card = CardState::default();

    let (rest, refreshes, _) =
      routed(&mut card, CardEvent::ToggleRequested);
    assert_eq!(rest, Some(CardEffect::IssueToggle));
    assert_eq!(refreshes, 0);

    let (rest, refreshes, alerts) = routed(
      &mut card,
      CardEvent::ToggleSucceeded {
        was_completed: true
      }
    );
    assert_eq!(rest, None);
    assert_eq!(refreshes, 1);
    assert!(alerts.is_empty());

    routed(&mut card, CardEvent::ToggleSettled);
    routed(&mut card, CardEvent::DeleteRequested);
    let (rest, _, _) =
      routed(&mut card, CardEvent::DeleteConfirmed);
    assert_eq!(rest, Some(CardEffect::IssueDelete));
    let (_, refreshes, _) =
      routed(&mut card, CardEvent::DeleteSucceeded);
    assert_eq!(refreshes, 1);
  }
}

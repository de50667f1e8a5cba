use std::sync::Arc;

use tokio::sync::watch;

use crate::entities::{Action, SelectionState};
use crate::error::Error;

/// Holds the session's selection state. Every change goes through
/// [`SelectionState::reduce`]; subscribers are woken only when the state
/// actually changes.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<SelectionState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SelectionState::default());

        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> SelectionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.tx.subscribe()
    }

    #[tracing::instrument(skip(self))]
    pub fn dispatch(&self, action: Action) -> Result<SelectionState, Error> {
        let mut outcome = Ok(SelectionState::default());

        self.tx.send_if_modified(|state| match state.reduce(&action) {
            Ok(next) if next == *state => {
                outcome = Ok(next);
                false
            }
            Ok(next) => {
                tracing::debug!(status = %next.status().name(), "state changed");
                *state = next.clone();
                outcome = Ok(next);
                true
            }
            Err(err) => {
                outcome = Err(err);
                false
            }
        });

        outcome
    }
}

#[test]
fn subscribers_see_changes() {
    use crate::entities::{Coordinates, Endpoint};

    let store = Store::new();
    let mut rx = store.subscribe();

    store
        .dispatch(Action::PlaceSelected {
            endpoint: Endpoint::Origin,
            coordinates: Coordinates::new(6.50, 3.38),
        })
        .unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().origin, Some(Coordinates::new(6.50, 3.38)));
}

#[test]
fn repeated_selection_does_not_notify() {
    use crate::entities::{Coordinates, Endpoint};

    let store = Store::new();
    let action = Action::PlaceSelected {
        endpoint: Endpoint::Origin,
        coordinates: Coordinates::new(6.50, 3.38),
    };
    store.dispatch(action.clone()).unwrap();

    let mut rx = store.subscribe();
    rx.borrow_and_update();
    let state = store.dispatch(action).unwrap();

    assert!(!rx.has_changed().unwrap());
    assert_eq!(state, store.state());
}

#[test]
fn rejected_action_keeps_state() {
    use uuid::Uuid;

    let store = Store::new();
    let err = store
        .dispatch(Action::TrackRequested {
            request_id: Uuid::new_v4(),
        })
        .unwrap_err();

    assert_eq!(err.code, 100);
    assert_eq!(store.state(), SelectionState::default());
}

#[test]
fn dispatch_returns_the_state_it_produced() {
    use crate::entities::{Coordinates, Endpoint};

    let store = Store::new();
    let origin = store
        .dispatch(Action::PlaceSelected {
            endpoint: Endpoint::Origin,
            coordinates: Coordinates::new(6.50, 3.38),
        })
        .unwrap();

    store
        .dispatch(Action::PlaceSelected {
            endpoint: Endpoint::Destination,
            coordinates: Coordinates::new(6.45, 3.40),
        })
        .unwrap();

    assert_eq!(origin.origin, Some(Coordinates::new(6.50, 3.38)));
    assert!(origin.destination.is_none());
    assert_ne!(origin, store.state());
}

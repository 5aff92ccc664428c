//! Bounded, lossy queues carrying input from collaborators to the simulation.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use labyrinth_core::{ClickEvent, NewGameSignal, CLICK_QUEUE_CAPACITY, NEW_GAME_QUEUE_CAPACITY};
use tracing::debug;

/// Producer side of the click and new-game queues.
///
/// Sends never block: when a queue is full the value is dropped. Dropping
/// every clone stops the simulation loop.
#[derive(Clone, Debug)]
pub struct InputQueues {
    clicks: SyncSender<ClickEvent>,
    new_game: SyncSender<NewGameSignal>,
}

impl InputQueues {
    /// Offers a click to the simulation, returning whether it was queued.
    pub fn submit_click(&self, click: ClickEvent) -> bool {
        match self.clicks.try_send(click) {
            Ok(()) => true,
            Err(TrySendError::Full(click)) => {
                debug!(?click, "click queue full, dropping click");
                false
            }
            Err(TrySendError::Disconnected(click)) => {
                debug!(?click, "simulation stopped, dropping click");
                false
            }
        }
    }

    /// Requests a fresh game, returning whether the request was queued.
    ///
    /// A request made while another is pending collapses into it.
    pub fn request_new_game(&self) -> bool {
        match self.new_game.try_send(NewGameSignal) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("new game already pending");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("simulation stopped, dropping new game request");
                false
            }
        }
    }
}

/// Consumer side owned by the simulation.
#[derive(Debug)]
pub(crate) struct InputReceivers {
    pub(crate) clicks: Receiver<ClickEvent>,
    pub(crate) new_game: Receiver<NewGameSignal>,
}

pub(crate) fn input_queues() -> (InputQueues, InputReceivers) {
    let (clicks, click_receiver) = mpsc::sync_channel(CLICK_QUEUE_CAPACITY);
    let (new_game, new_game_receiver) = mpsc::sync_channel(NEW_GAME_QUEUE_CAPACITY);
    (
        InputQueues { clicks, new_game },
        InputReceivers {
            clicks: click_receiver,
            new_game: new_game_receiver,
        },
    )
}

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use crate::catalog::selector::LoadTicket;
use crate::catalog::source::{CatalogError, CatalogSource};
use crate::store::schema::Verb;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
    CatalogLoaded {
        ticket: LoadTicket,
        result: Result<Vec<Verb>, CatalogError>,
    },
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    /// Forward terminal input to the channel from a background thread.
    pub fn new(poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || forward_input(&input_tx, || read_input(poll_interval)));

        Self { rx, tx }
    }

    /// A channel with no input thread, for driving the app without a terminal.
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { rx, tx }
    }

    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<AppEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Wait up to `poll_interval` for terminal input. Timeouts and input other
/// than keys and resizes come back as `Tick`.
fn read_input(poll_interval: Duration) -> AppEvent {
    if !event::poll(poll_interval).unwrap_or(false) {
        return AppEvent::Tick;
    }
    match event::read() {
        Ok(Event::Key(key)) => AppEvent::Key(key),
        Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
        _ => AppEvent::Tick,
    }
}

/// Send input to `tx` until the receiving side is gone. Idle polls still
/// send `Tick`, so a dropped receiver is noticed without user input.
fn forward_input(tx: &mpsc::Sender<AppEvent>, mut next_input: impl FnMut() -> AppEvent) {
    while tx.send(next_input()).is_ok() {}
}

/// Fetch a catalog on a worker thread and post the result back.
pub fn spawn_catalog_load(
    source: Arc<dyn CatalogSource>,
    ticket: LoadTicket,
    tx: mpsc::Sender<AppEvent>,
) {
    thread::spawn(move || {
        let result = source.fetch(ticket.code());
        // The receiver is gone only when the app is shutting down.
        let _ = tx.send(AppEvent::CatalogLoaded { ticket, result });
    });
}

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, KeyEvent, KeyEventKind, MouseEvent};

pub enum Event {
    Tick,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16),
}

impl Event {
    /// Map a terminal event onto a dashboard event. Key releases and focus
    /// changes become ticks so a burst of them cannot starve redraws.
    fn from_terminal(event: event::Event) -> Event {
        match event {
            event::Event::Key(key) if key.kind != KeyEventKind::Release => Event::Key(key),
            event::Event::Mouse(mouse) => Event::Mouse(mouse),
            event::Event::Resize(w, _) => Event::Resize(w),
            _ => Event::Tick,
        }
    }
}

/// Reads terminal input on a background thread and forwards it over a channel,
/// emitting a tick whenever nothing arrives within `tick_rate`.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            let next = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(ev) => Event::from_terminal(ev),
                    Err(_) => Event::Tick,
                },
                _ => Event::Tick,
            };
            if tx.send(next).is_err() {
                break;
            }
        });

        Self { rx }
    }

    pub fn next(&mut self) -> Result<Event> {
        Ok(self.rx.recv()?)
    }
}

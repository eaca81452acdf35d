//! Terminal input polling on a background task

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Input the host loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

const MAX_EVENTS_PER_BATCH: usize = 20;

/// Poll crossterm for input until `cancel` fires or the receiver goes away
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<InputEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut processed = 0;
                    while processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        processed += 1;
                        let Ok(evt) = event::read() else { continue };
                        let input = match evt {
                            // Windows reports releases too
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                Some(InputEvent::Key(key))
                            }
                            Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(input) = input {
                            if tx.send(input).is_err() {
                                tracing::debug!("Input channel closed, stopping poller");
                                return;
                            }
                        }
                    }
                }
            }
        }
    })
}

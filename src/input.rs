//! Host input events
//!
//! Window callbacks may fire on another thread than the one ticking the
//! simulation, so events go through a channel and are folded into a single
//! [`TickInput`] when the driver next drains the queue.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::DVec2;

use crate::sim::{Bounds, TickInput};

/// One event from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Relative pointer motion
    PointerMoved { dx: f64, dy: f64 },
    /// Stop every free-roaming ball (space)
    Freeze,
    /// Close the simulation (escape)
    Exit,
    /// Window size changed
    Resized { width: f64, height: f64 },
}

impl InputEvent {
    fn into_tick_input(self) -> TickInput {
        match self {
            InputEvent::PointerMoved { dx, dy } => TickInput {
                pointer_delta: Some(DVec2::new(dx, dy)),
                ..Default::default()
            },
            InputEvent::Freeze => TickInput {
                freeze: true,
                ..Default::default()
            },
            InputEvent::Exit => TickInput {
                exit: true,
                ..Default::default()
            },
            InputEvent::Resized { width, height } => TickInput {
                resize: Some(Bounds::new(width, height)),
                ..Default::default()
            },
        }
    }
}

/// Cloneable producer handle for window callbacks
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event; returns false once the simulation side is gone
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Consumer side, owned by the tick driver
#[derive(Debug)]
pub struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    /// Fold everything queued so far into one tick's worth of input
    pub fn drain(&self) -> TickInput {
        let mut input = TickInput::default();
        for event in self.rx.try_iter() {
            input.merge(event.into_tick_input());
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_drain_empty() {
        let queue = InputQueue::new();
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_last_pointer_wins() {
        let queue = InputQueue::new();
        let tx = queue.sender();
        tx.send(InputEvent::PointerMoved { dx: 1.0, dy: 2.0 });
        tx.send(InputEvent::Freeze);
        tx.send(InputEvent::PointerMoved { dx: -3.0, dy: 4.0 });

        let input = queue.drain();
        assert_eq!(input.pointer_delta, Some(DVec2::new(-3.0, 4.0)));
        assert!(input.freeze);
        assert!(!input.exit);

        // Consumed
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_resize_and_exit() {
        let queue = InputQueue::new();
        let tx = queue.sender();
        tx.send(InputEvent::Resized {
            width: 640.0,
            height: 480.0,
        });
        tx.send(InputEvent::Exit);

        let input = queue.drain();
        assert_eq!(input.resize, Some(Bounds::new(640.0, 480.0)));
        assert!(input.exit);
    }

    #[test]
    fn test_send_from_other_thread() {
        let queue = InputQueue::new();
        let tx = queue.sender();
        thread::spawn(move || {
            for i in 0..100 {
                tx.send(InputEvent::PointerMoved {
                    dx: i as f64,
                    dy: 0.0,
                });
            }
        })
        .join()
        .unwrap();

        assert_eq!(queue.drain().pointer_delta, Some(DVec2::new(99.0, 0.0)));
    }

    #[test]
    fn test_send_after_queue_dropped() {
        let queue = InputQueue::new();
        let tx = queue.sender();
        drop(queue);
        assert!(!tx.send(InputEvent::Freeze));
    }
}

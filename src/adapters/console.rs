//! Serial console command source.
//!
//! A reader thread pulls bytes from stdin (the UART console on the board,
//! the terminal on the host) and forwards every non-whitespace character
//! through a channel.  [`CommandPort::poll_symbol`] drains it without
//! blocking the polling loop.

use std::io::Read;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::app::ports::CommandPort;

const READER_STACK_BYTES: usize = 4 * 1024;

pub struct SerialConsole {
    rx: Receiver<char>,
    closed: bool,
}

impl SerialConsole {
    /// Spawn the stdin reader thread.
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("console".into())
            .stack_size(READER_STACK_BYTES)
            .spawn(move || {
                let mut byte = [0u8; 1];
                let mut stdin = std::io::stdin().lock();
                loop {
                    match stdin.read(&mut byte) {
                        Ok(0) => break,
                        Ok(_) => {
                            let c = char::from(byte[0]);
                            if c.is_ascii_whitespace() {
                                continue;
                            }
                            if tx.send(c).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("console: read failed: {}", e);
                            break;
                        }
                    }
                }
                debug!("console: reader exiting");
            })
            .context("spawning console reader thread")?;
        Ok(Self::from_receiver(rx))
    }

    /// Wrap an existing symbol channel (also used by tests).
    pub fn from_receiver(rx: Receiver<char>) -> Self {
        Self { rx, closed: false }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl CommandPort for SerialConsole {
    fn poll_symbol(&mut self) -> Option<char> {
        match self.rx.try_recv() {
            Ok(c) => Some(c),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    debug!("console: input closed");
                    self.closed = true;
                }
                None
            }
        }
    }
}

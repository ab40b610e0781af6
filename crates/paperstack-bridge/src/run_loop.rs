// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Waiting on a modal native session from the UI thread.
//
// The thread that presents a native controller is the thread its delegate
// callbacks are delivered on. Blocking it on a channel would deadlock, so
// the wait polls the channel and lets the platform event loop run between
// polls.

#![cfg_attr(not(target_os = "ios"), allow(dead_code))]

use std::sync::mpsc::{Receiver, TryRecvError};

use paperstack_core::error::{PaperstackError, Result};

/// Wait for a value on `rx`, calling `pump` whenever none is ready yet.
///
/// `pump` should run one bounded slice of the event loop. Fails if every
/// sender is dropped before a value arrives.
pub(crate) fn recv_while_pumping<T>(rx: &Receiver<T>, mut pump: impl FnMut()) -> Result<T> {
    loop {
        match rx.try_recv() {
            Ok(value) => return Ok(value),
            Err(TryRecvError::Empty) => pump(),
            Err(TryRecvError::Disconnected) => {
                return Err(PaperstackError::Bridge(
                    "native session ended without a result".into(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn event_loop_runs_until_callback_delivers() {
        let (tx, rx) = mpsc::channel();
        let mut sender = Some(tx);
        let mut pumps = 0;

        let value = recv_while_pumping(&rx, || {
            pumps += 1;
            if pumps == 3 {
                if let Some(tx) = sender.take() {
                    tx.send("scanned").expect("send");
                }
            }
        })
        .expect("value");

        assert_eq!(value, "scanned");
        assert_eq!(pumps, 3);
    }

    #[test]
    fn ready_value_skips_the_event_loop() {
        let (tx, rx) = mpsc::channel();
        tx.send(7).expect("send");

        let mut pumps = 0;
        let value = recv_while_pumping(&rx, || pumps += 1).expect("value");

        assert_eq!(value, 7);
        assert_eq!(pumps, 0);
    }

    #[test]
    fn dropped_sender_is_an_error() {
        let (tx, rx) = mpsc::channel::<u8>();
        let mut sender = Some(tx);

        let err = recv_while_pumping(&rx, || drop(sender.take())).expect_err("disconnected");

        assert!(matches!(err, PaperstackError::Bridge(_)));
    }
}

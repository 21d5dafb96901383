// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional observer of the coordinator's update and reset sequences.

use crate::policy::{Behavior, PolicyInput};
use crate::transition::OverlayTransition;

/// Receives notifications as the overlay shows, changes, and hides.
///
/// Every method has an empty default, so implement only what you need.
/// The coordinator holds delegates weakly and skips calls once the delegate is
/// gone. Methods take `&self`; use `Cell`/`RefCell` for any state you track.
///
/// Notifications come in matched pairs, in event order:
/// `will_update` is always followed by `did_update` for the same transition
/// before any other notification, and likewise for `will_reset`/`did_reset`.
pub trait KeyboardAvoidanceDelegate {
    /// The offset is about to follow an overlay show or frame change.
    fn will_update(&self, transition: &OverlayTransition) {
        let _ = transition;
    }

    /// The update for `transition` has finished.
    ///
    /// Also sent when the geometry change was skipped or superseded.
    fn did_update(&self, transition: &OverlayTransition) {
        let _ = transition;
    }

    /// The offset is about to return to zero because the overlay is hiding.
    fn will_reset(&self, transition: &OverlayTransition) {
        let _ = transition;
    }

    /// The reset for `transition` has finished.
    fn did_reset(&self, transition: &OverlayTransition) {
        let _ = transition;
    }

    /// Overrides the coordinator's fallback policy for `transition`.
    ///
    /// Return `None` to use the fallback.
    fn behavior_for(&self, transition: &OverlayTransition, input: &PolicyInput) -> Option<Behavior> {
        let _ = (transition, input);
        None
    }
}

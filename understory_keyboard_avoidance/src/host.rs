// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seams: everything the coordinator needs from the UI toolkit.
//!
//! The crate never touches a real view hierarchy or animation system. A host
//! adapter implements two traits:
//!
//! - [`LayoutHost`]: geometry and size-class queries, plus applying the offset.
//! - [`OverlayEvents`]: overlay event subscription and animation-completed continuations.
//!
//! The host then feeds [`OverlayEvent`]s into
//! [`KeyboardAvoidance::handle`](crate::KeyboardAvoidance::handle) on its UI thread.

use core::time::Duration;

use kurbo::Rect;

use crate::policy::SizeClass;
use crate::transition::{AnimationCurve, TransitionPayload};

/// Timing for an animated offset change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OffsetAnimation {
    /// How long the change should take.
    pub duration: Duration,
    /// Easing curve, passed through from the overlay.
    pub curve: AnimationCurve,
}

/// Identifies one subscription to overlay events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Names a deferred offset application.
///
/// The host hands the token back through [`OverlayEvent::AnimationCompleted`]
/// once the overlay animation it was scheduled against has finished. Tokens
/// from one coordinator are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompletionToken(pub u64);

/// An overlay lifecycle signal delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OverlayEvent {
    /// The overlay is about to appear or change its frame.
    WillShowOrChange(TransitionPayload),
    /// The overlay is about to disappear.
    WillHide(TransitionPayload),
    /// The overlay animation a continuation was scheduled against has finished.
    AnimationCompleted(CompletionToken),
}

/// View geometry and layout mutation provided by the host toolkit.
pub trait LayoutHost {
    /// Handle for the target view.
    type View;
    /// Handle for the adjustable bottom constraint.
    type Constraint;

    /// Frame of `view` in the overlay's coordinate space, or `None` if it has been released.
    fn view_frame(&self, view: &Self::View) -> Option<Rect>;

    /// Whether `constraint` still belongs to the hierarchy `view` lives in.
    fn is_attached(&self, view: &Self::View, constraint: &Self::Constraint) -> bool;

    /// Size class of `view`.
    fn view_size_class(&self, view: &Self::View) -> SizeClass;

    /// Size class of the window containing `view`.
    fn window_size_class(&self, view: &Self::View) -> SizeClass;

    /// Sets `constraint` to `offset`, animated when `animation` is given.
    fn apply_offset(
        &mut self,
        view: &Self::View,
        constraint: &Self::Constraint,
        offset: f64,
        animation: Option<OffsetAnimation>,
    );
}

/// Overlay event plumbing provided by the host toolkit.
pub trait OverlayEvents {
    /// Starts delivering overlay events for a new coordinator.
    fn subscribe(&mut self) -> SubscriptionId;

    /// Stops delivering overlay events for `subscription`.
    fn unsubscribe(&mut self, subscription: SubscriptionId);

    /// Arranges for [`OverlayEvent::AnimationCompleted`] with `token` to be
    /// delivered once the current overlay animation finishes.
    ///
    /// `duration` is the overlay's own animation length, for hosts that have no
    /// completion signal and fall back to a timer.
    fn schedule_completion(&mut self, token: CompletionToken, duration: Duration);

    /// Drops a scheduled completion. Delivering it anyway is harmless.
    fn cancel_completion(&mut self, token: CompletionToken) {
        let _ = token;
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The coordinator: keeps one bottom offset in sync with the overlay.
//!
//! ## Sequence
//!
//! Show or frame change:
//! 1) Parse the payload into an [`OverlayTransition`].
//! 2) Pick a [`Behavior`]: the delegate's [`behavior_for`](KeyboardAvoidanceDelegate::behavior_for)
//!    if it answers, otherwise the fallback [`BehaviorPolicy`].
//! 3) `will_update`, then set the offset to the final overlap height.
//!    - [`Behavior::UpdateWithChange`]: apply now, animated like the overlay, then `did_update`.
//!    - [`Behavior::UpdateAfterChange`]: schedule a [`CompletionToken`]; when the host delivers
//!      it, recompute against the settled view frame, apply without animation, then `did_update`.
//!
//! Hide: `will_reset`, animate the offset to zero, `did_reset`.
//!
//! At most one deferred application is pending. A newer show, change, or hide
//! supersedes it: the pending application is cancelled, its `did_update` is
//! sent without touching the layout, and the new event proceeds. Dropping the
//! coordinator does the same before it unsubscribes.

use alloc::rc::{Rc, Weak};
use core::fmt;

use kurbo::Rect;

use crate::delegate::KeyboardAvoidanceDelegate;
use crate::host::{
    CompletionToken, LayoutHost, OffsetAnimation, OverlayEvent, OverlayEvents, SubscriptionId,
};
use crate::policy::{Behavior, BehaviorPolicy, DefaultPolicy, PolicyInput};
use crate::transition::{OverlayTransition, TransitionPayload};

/// Where the coordinator is in its update/reset cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No event is being processed.
    #[default]
    Idle,
    /// Following a show or frame change. Only observable between events while
    /// a deferred application is pending.
    Updating(Behavior),
    /// Returning the offset to zero for a hide.
    Resetting,
}

#[derive(Copy, Clone, Debug)]
struct Pending {
    token: CompletionToken,
    transition: OverlayTransition,
}

/// Keeps a bottom offset clear of an overlay such as a software keyboard.
///
/// Binds one view and one constraint of a [`LayoutHost`], subscribes to
/// overlay events on construction, and unsubscribes on drop. The host feeds
/// events in through [`handle`](Self::handle).
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use kurbo::Rect;
/// use understory_keyboard_avoidance::host::{
///     CompletionToken, LayoutHost, OffsetAnimation, OverlayEvent, OverlayEvents, SubscriptionId,
/// };
/// use understory_keyboard_avoidance::policy::SizeClass;
/// use understory_keyboard_avoidance::transition::TransitionPayload;
/// use understory_keyboard_avoidance::KeyboardAvoidance;
///
/// #[derive(Default)]
/// struct Screen {
///     bottom: f64,
/// }
///
/// impl LayoutHost for Screen {
///     type View = ();
///     type Constraint = ();
///     fn view_frame(&self, _: &()) -> Option<Rect> {
///         Some(Rect::new(0.0, 0.0, 400.0, 1000.0))
///     }
///     fn is_attached(&self, _: &(), _: &()) -> bool {
///         true
///     }
///     fn view_size_class(&self, _: &()) -> SizeClass {
///         SizeClass::Compact
///     }
///     fn window_size_class(&self, _: &()) -> SizeClass {
///         SizeClass::Compact
///     }
///     fn apply_offset(&mut self, _: &(), _: &(), offset: f64, _: Option<OffsetAnimation>) {
///         self.bottom = offset;
///     }
/// }
///
/// impl OverlayEvents for Screen {
///     fn subscribe(&mut self) -> SubscriptionId {
///         SubscriptionId(1)
///     }
///     fn unsubscribe(&mut self, _: SubscriptionId) {}
///     fn schedule_completion(&mut self, _: CompletionToken, _: Duration) {}
/// }
///
/// let mut avoidance = KeyboardAvoidance::new(Screen::default(), (), ());
/// avoidance.handle(OverlayEvent::WillShowOrChange(TransitionPayload {
///     begin_frame: Some(Rect::new(0.0, 1000.0, 400.0, 1300.0)),
///     end_frame: Some(Rect::new(0.0, 700.0, 400.0, 1000.0)),
///     duration: Some(0.25),
///     curve: Some(7),
/// }));
/// assert_eq!(avoidance.host().bottom, 300.0);
///
/// avoidance.handle(OverlayEvent::WillHide(TransitionPayload {
///     begin_frame: Some(Rect::new(0.0, 700.0, 400.0, 1000.0)),
///     end_frame: Some(Rect::new(0.0, 1000.0, 400.0, 1300.0)),
///     duration: Some(0.25),
///     curve: Some(7),
/// }));
/// assert_eq!(avoidance.host().bottom, 0.0);
/// ```
pub struct KeyboardAvoidance<H, P = DefaultPolicy>
where
    H: LayoutHost + OverlayEvents,
{
    host: H,
    view: H::View,
    constraint: H::Constraint,
    policy: P,
    delegate: Option<Weak<dyn KeyboardAvoidanceDelegate>>,
    subscription: SubscriptionId,
    phase: Phase,
    pending: Option<Pending>,
    next_token: u64,
    offset: f64,
}

impl<H> KeyboardAvoidance<H, DefaultPolicy>
where
    H: LayoutHost + OverlayEvents,
{
    /// Creates a coordinator for `view`/`constraint` using [`DefaultPolicy`] as the fallback.
    #[must_use]
    pub fn new(host: H, view: H::View, constraint: H::Constraint) -> Self {
        Self::new_with_policy(host, view, constraint, DefaultPolicy)
    }
}

impl<H, P> KeyboardAvoidance<H, P>
where
    H: LayoutHost + OverlayEvents,
{
    /// Creates a coordinator with a custom fallback policy.
    ///
    /// The policy is consulted whenever no delegate answers
    /// [`behavior_for`](KeyboardAvoidanceDelegate::behavior_for).
    #[must_use]
    pub fn new_with_policy(mut host: H, view: H::View, constraint: H::Constraint, policy: P) -> Self {
        let subscription = host.subscribe();
        Self {
            host,
            view,
            constraint,
            policy,
            delegate: None,
            subscription,
            phase: Phase::Idle,
            pending: None,
            next_token: 0,
            offset: 0.0,
        }
    }

    /// Sets the delegate and returns `self`, for construction chains.
    #[must_use]
    pub fn with_delegate<D>(mut self, delegate: &Rc<D>) -> Self
    where
        D: KeyboardAvoidanceDelegate + 'static,
    {
        self.set_delegate(delegate);
        self
    }

    /// Sets the delegate. Only a weak reference is kept.
    pub fn set_delegate<D>(&mut self, delegate: &Rc<D>)
    where
        D: KeyboardAvoidanceDelegate + 'static,
    {
        let weak: Weak<D> = Rc::downgrade(delegate);
        self.delegate = Some(weak);
    }

    /// Removes the delegate.
    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// Returns the delegate if it is still alive.
    #[must_use]
    pub fn delegate(&self) -> Option<Rc<dyn KeyboardAvoidanceDelegate>> {
        self.delegate.as_ref().and_then(|d| d.upgrade())
    }

    /// The target view.
    pub fn view(&self) -> &H::View {
        &self.view
    }

    /// The constraint this coordinator adjusts.
    pub fn constraint(&self) -> &H::Constraint {
        &self.constraint
    }

    /// The host adapter.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host adapter, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The fallback policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The subscription obtained from [`OverlayEvents::subscribe`].
    #[must_use]
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last offset actually applied to the constraint.
    #[must_use]
    pub fn current_offset(&self) -> f64 {
        self.offset
    }

    /// Token of the deferred application awaiting completion, if any.
    #[must_use]
    pub fn pending_completion(&self) -> Option<CompletionToken> {
        self.pending.map(|p| p.token)
    }

    /// Handles a deferred-application completion from the host.
    ///
    /// Tokens that are not the current pending one (superseded, cancelled, or
    /// unknown) are ignored.
    pub fn animation_completed(&mut self, token: CompletionToken) {
        let Some(pending) = self.pending.filter(|p| p.token == token) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(?token, "ignoring stale overlay completion");
            return;
        };
        self.pending = None;

        // Measured now: the view may have moved while the overlay animated.
        let frame = self.host.view_frame(&self.view).unwrap_or(Rect::ZERO);
        let offset = pending.transition.final_overlap_height(frame);
        self.apply(offset, None);
        self.notify(|d| d.did_update(&pending.transition));
        self.phase = Phase::Idle;
    }

    /// Resets the offset to zero for a hiding overlay.
    pub fn will_hide(&mut self, payload: &TransitionPayload) {
        let transition = OverlayTransition::from_payload(payload);
        self.supersede_pending();

        self.phase = Phase::Resetting;
        self.notify(|d| d.will_reset(&transition));
        self.apply(0.0, Some(transition.animation()));
        self.notify(|d| d.did_reset(&transition));
        self.phase = Phase::Idle;
    }

    fn policy_input(&self) -> PolicyInput {
        PolicyInput {
            view_frame: self.host.view_frame(&self.view).unwrap_or(Rect::ZERO),
            window_size_class: self.host.window_size_class(&self.view),
            view_size_class: self.host.view_size_class(&self.view),
        }
    }

    /// Cancels the pending deferred application and closes its notification pair.
    fn supersede_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(token = ?pending.token, "superseding deferred overlay update");
        self.host.cancel_completion(pending.token);
        self.notify(|d| d.did_update(&pending.transition));
        self.phase = Phase::Idle;
    }

    /// Applies `offset` unless the view is gone or the constraint is detached.
    fn apply(&mut self, offset: f64, animation: Option<OffsetAnimation>) {
        let live = self.host.view_frame(&self.view).is_some()
            && self.host.is_attached(&self.view, &self.constraint);
        if !live {
            #[cfg(feature = "tracing")]
            tracing::debug!(offset, "skipping offset for released view or detached constraint");
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(offset, ?animation, "applying overlay offset");
        self.host
            .apply_offset(&self.view, &self.constraint, offset, animation);
        self.offset = offset;
    }

    fn notify(&self, f: impl FnOnce(&dyn KeyboardAvoidanceDelegate)) {
        if let Some(delegate) = self.delegate() {
            f(&*delegate);
        }
    }

    fn mint_token(&mut self) -> CompletionToken {
        let token = CompletionToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        token
    }
}

impl<H, P> KeyboardAvoidance<H, P>
where
    H: LayoutHost + OverlayEvents,
    P: BehaviorPolicy,
{
    /// Routes one host event.
    pub fn handle(&mut self, event: OverlayEvent) {
        match event {
            OverlayEvent::WillShowOrChange(payload) => self.will_show_or_change(&payload),
            OverlayEvent::WillHide(payload) => self.will_hide(&payload),
            OverlayEvent::AnimationCompleted(token) => self.animation_completed(token),
        }
    }

    /// Follows an overlay that is appearing or changing its frame.
    pub fn will_show_or_change(&mut self, payload: &TransitionPayload) {
        let transition = OverlayTransition::from_payload(payload);
        self.supersede_pending();

        let input = self.policy_input();
        let behavior = self.behavior_for(&transition, &input);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            ?behavior,
            initial = transition.initial_overlap_height(input.view_frame),
            target = transition.final_overlap_height(input.view_frame),
            "overlay update"
        );

        self.phase = Phase::Updating(behavior);
        self.notify(|d| d.will_update(&transition));
        let offset = transition.final_overlap_height(input.view_frame);

        match behavior {
            Behavior::UpdateWithChange => {
                self.apply(offset, Some(transition.animation()));
                self.notify(|d| d.did_update(&transition));
                self.phase = Phase::Idle;
            }
            Behavior::UpdateAfterChange => {
                let token = self.mint_token();
                self.pending = Some(Pending { token, transition });
                self.host
                    .schedule_completion(token, transition.animation_duration());
            }
        }
    }

    /// Resolves the behavior for `transition`: delegate first, then the fallback policy.
    #[must_use]
    pub fn behavior_for(&self, transition: &OverlayTransition, input: &PolicyInput) -> Behavior {
        self.delegate()
            .and_then(|d| d.behavior_for(transition, input))
            .unwrap_or_else(|| self.policy.behavior(transition, input))
    }
}

impl<H, P> Drop for KeyboardAvoidance<H, P>
where
    H: LayoutHost + OverlayEvents,
{
    fn drop(&mut self) {
        self.supersede_pending();
        self.host.unsubscribe(self.subscription);
    }
}

impl<H, P> fmt::Debug for KeyboardAvoidance<H, P>
where
    H: LayoutHost + OverlayEvents,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardAvoidance")
            .field("subscription", &self.subscription)
            .field("phase", &self.phase)
            .field("pending", &self.pending_completion())
            .field("offset", &self.offset)
            .field("has_delegate", &self.delegate().is_some())
            .finish_non_exhaustive()
    }
}

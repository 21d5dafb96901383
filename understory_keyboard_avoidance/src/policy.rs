// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Behavior policies: decide whether the offset follows the overlay's animation or waits for it.

use kurbo::Rect;

use crate::transition::OverlayTransition;

/// How the coordinator applies a new offset relative to the overlay's own animation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Animate the offset alongside the overlay, using its duration and curve.
    #[default]
    UpdateWithChange,
    /// Set the offset only once the overlay's animation has completed.
    ///
    /// Useful when the view itself may move while the overlay animates, so the
    /// final overlap is not known until everything has settled.
    UpdateAfterChange,
}

/// Two-valued size classification of a view or window.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Constrained space, such as a phone or a narrow split-screen pane.
    #[default]
    Compact,
    /// Expansive space, such as a tablet in full screen.
    Regular,
}

/// Host state a policy may consult alongside the transition.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PolicyInput {
    /// Frame of the target view, in the overlay's coordinate space.
    ///
    /// [`Rect::ZERO`] when the view has been released.
    pub view_frame: Rect,
    /// Size class of the window containing the view.
    pub window_size_class: SizeClass,
    /// Size class of the view itself.
    pub view_size_class: SizeClass,
}

/// Chooses a [`Behavior`] for one transition.
///
/// Implemented for [`DefaultPolicy`] and for any
/// `Fn(&OverlayTransition, &PolicyInput) -> Behavior` closure.
///
/// # Example
///
/// ```
/// use understory_keyboard_avoidance::policy::{Behavior, BehaviorPolicy, PolicyInput};
/// use understory_keyboard_avoidance::transition::OverlayTransition;
///
/// // Always wait for the overlay to settle.
/// let settle = |_: &OverlayTransition, _: &PolicyInput| Behavior::UpdateAfterChange;
/// let decision = settle.behavior(&OverlayTransition::default(), &PolicyInput::default());
/// assert_eq!(decision, Behavior::UpdateAfterChange);
/// ```
pub trait BehaviorPolicy {
    /// Returns the behavior to use for `transition`.
    fn behavior(&self, transition: &OverlayTransition, input: &PolicyInput) -> Behavior;
}

impl<F> BehaviorPolicy for F
where
    F: Fn(&OverlayTransition, &PolicyInput) -> Behavior,
{
    fn behavior(&self, transition: &OverlayTransition, input: &PolicyInput) -> Behavior {
        self(transition, input)
    }
}

/// The stock policy: update with the overlay, except for an expanding overlay
/// over a compact view inside a regular window.
///
/// That combination usually means a form-sheet style panel on a large screen.
/// Some hosts slide such a panel upward while the overlay grows, which makes
/// the pre-animation geometry wrong, so the update waits until the overlay has
/// settled. Hosts without that quirk can swap in their own [`BehaviorPolicy`].
///
/// ```
/// use kurbo::Rect;
/// use std::time::Duration;
/// use understory_keyboard_avoidance::policy::{
///     Behavior, BehaviorPolicy, DefaultPolicy, PolicyInput, SizeClass,
/// };
/// use understory_keyboard_avoidance::transition::{AnimationCurve, OverlayTransition};
///
/// let growing = OverlayTransition::new(
///     Rect::new(0.0, 1000.0, 800.0, 1300.0),
///     Rect::new(0.0, 700.0, 800.0, 1000.0),
///     Duration::from_millis(250),
///     AnimationCurve::EaseOut,
/// );
/// let sheet = PolicyInput {
///     view_frame: Rect::new(100.0, 200.0, 700.0, 900.0),
///     window_size_class: SizeClass::Regular,
///     view_size_class: SizeClass::Compact,
/// };
/// assert_eq!(DefaultPolicy.behavior(&growing, &sheet), Behavior::UpdateAfterChange);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPolicy;

impl BehaviorPolicy for DefaultPolicy {
    fn behavior(&self, transition: &OverlayTransition, input: &PolicyInput) -> Behavior {
        let nested_compact = input.window_size_class == SizeClass::Regular
            && input.view_size_class == SizeClass::Compact;
        if nested_compact && transition.is_expanding(input.view_frame) {
            Behavior::UpdateAfterChange
        } else {
            Behavior::UpdateWithChange
        }
    }
}

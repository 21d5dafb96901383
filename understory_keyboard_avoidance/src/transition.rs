// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay transitions: parse a raw overlay event and measure how much of a view it covers.
//!
//! ## Usage
//!
//! 1) Receive a raw payload from the host (begin frame, end frame, duration, curve).
//! 2) Build an [`OverlayTransition`] with [`OverlayTransition::from_payload`] (lenient) or
//!    [`OverlayTransition::try_from_payload`] (strict).
//! 3) Query overlap heights against the target view's frame, in the same coordinate space.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_keyboard_avoidance::transition::{OverlayTransition, TransitionPayload};
//!
//! // Keyboard rises from y=800 to y=500 on a 1000-tall screen.
//! let payload = TransitionPayload {
//!     begin_frame: Some(Rect::new(0.0, 800.0, 400.0, 1100.0)),
//!     end_frame: Some(Rect::new(0.0, 500.0, 400.0, 800.0)),
//!     duration: Some(0.25),
//!     curve: Some(7),
//! };
//! let transition = OverlayTransition::from_payload(&payload);
//!
//! let view = Rect::new(0.0, 0.0, 400.0, 1000.0);
//! assert_eq!(transition.initial_overlap_height(view), 200.0);
//! assert_eq!(transition.final_overlap_height(view), 500.0);
//! assert!(transition.is_expanding(view));
//! ```

use core::fmt;
use core::time::Duration;

use kurbo::Rect;

use crate::host::OffsetAnimation;

/// Easing identifier reported by the host for the overlay's own animation.
///
/// The coordinator never interprets the curve; it passes it back to the host
/// unchanged so the offset animates in step with the overlay.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationCurve {
    /// Slow start and end.
    #[default]
    EaseInOut,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Constant velocity.
    Linear,
    /// A host-private curve identifier (software keyboards commonly report `7`).
    Other(i64),
}

impl AnimationCurve {
    /// Maps a raw host identifier to a curve.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::EaseInOut,
            1 => Self::EaseIn,
            2 => Self::EaseOut,
            3 => Self::Linear,
            other => Self::Other(other),
        }
    }

    /// Returns the raw host identifier for this curve.
    #[must_use]
    pub const fn to_raw(self) -> i64 {
        match self {
            Self::EaseInOut => 0,
            Self::EaseIn => 1,
            Self::EaseOut => 2,
            Self::Linear => 3,
            Self::Other(raw) => raw,
        }
    }
}

/// Raw fields of an overlay lifecycle event, as delivered by the host.
///
/// Every field is optional because hosts are not obliged to fill them in.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TransitionPayload {
    /// Overlay frame before the transition.
    pub begin_frame: Option<Rect>,
    /// Overlay frame after the transition.
    pub end_frame: Option<Rect>,
    /// Animation duration in seconds.
    pub duration: Option<f64>,
    /// Raw animation curve identifier.
    pub curve: Option<i64>,
}

/// A field of [`TransitionPayload`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadField {
    /// [`TransitionPayload::begin_frame`].
    BeginFrame,
    /// [`TransitionPayload::end_frame`].
    EndFrame,
    /// [`TransitionPayload::duration`].
    Duration,
    /// [`TransitionPayload::curve`].
    Curve,
}

impl fmt::Display for PayloadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BeginFrame => "begin frame",
            Self::EndFrame => "end frame",
            Self::Duration => "animation duration",
            Self::Curve => "animation curve",
        })
    }
}

/// Error returned by [`OverlayTransition::try_from_payload`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// A required field was absent.
    MissingField(PayloadField),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "overlay payload is missing the {field}"),
        }
    }
}

impl core::error::Error for PayloadError {}

/// One overlay lifecycle event (show, hide, or frame change) with its animation timing.
///
/// Immutable once built. All queries are pure functions of the two overlay
/// frames and the view frame passed in.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OverlayTransition {
    start_rect: Rect,
    end_rect: Rect,
    duration: Duration,
    curve: AnimationCurve,
}

impl OverlayTransition {
    /// Creates a transition from already-parsed parts.
    ///
    /// Rectangles are normalized so that `x0 <= x1` and `y0 <= y1`.
    #[must_use]
    pub fn new(start_rect: Rect, end_rect: Rect, duration: Duration, curve: AnimationCurve) -> Self {
        Self {
            start_rect: start_rect.abs(),
            end_rect: end_rect.abs(),
            duration,
            curve,
        }
    }

    /// Parses a payload, failing on the first absent field.
    pub fn try_from_payload(payload: &TransitionPayload) -> Result<Self, PayloadError> {
        let start = payload
            .begin_frame
            .ok_or(PayloadError::MissingField(PayloadField::BeginFrame))?;
        let end = payload
            .end_frame
            .ok_or(PayloadError::MissingField(PayloadField::EndFrame))?;
        let seconds = payload
            .duration
            .ok_or(PayloadError::MissingField(PayloadField::Duration))?;
        let curve = payload
            .curve
            .ok_or(PayloadError::MissingField(PayloadField::Curve))?;
        // Negative and non-finite durations collapse to an instant change.
        let duration = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
        Ok(Self::new(start, end, duration, AnimationCurve::from_raw(curve)))
    }

    /// Parses a payload, degrading to [`OverlayTransition::default`] when any field is absent.
    ///
    /// The degenerate transition has zero-size frames and zero duration, so it
    /// never reports an overlap.
    #[must_use]
    pub fn from_payload(payload: &TransitionPayload) -> Self {
        match Self::try_from_payload(payload) {
            Ok(transition) => transition,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_err, "degrading malformed overlay payload");
                Self::default()
            }
        }
    }

    /// Overlay frame before the transition.
    #[must_use]
    pub fn start_rect(&self) -> Rect {
        self.start_rect
    }

    /// Overlay frame after the transition.
    #[must_use]
    pub fn end_rect(&self) -> Rect {
        self.end_rect
    }

    /// Duration of the overlay's animation.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        self.duration
    }

    /// Easing curve of the overlay's animation.
    #[must_use]
    pub fn animation_curve(&self) -> AnimationCurve {
        self.curve
    }

    /// Timing to hand to [`LayoutHost::apply_offset`](crate::host::LayoutHost::apply_offset)
    /// so the offset moves in step with the overlay.
    #[must_use]
    pub fn animation(&self) -> OffsetAnimation {
        OffsetAnimation {
            duration: self.duration,
            curve: self.curve,
        }
    }

    /// How far the overlay covers `view` vertically at the start of the transition.
    ///
    /// This is the overlap rather than the overlay's own height, since the view
    /// does not always span the whole screen.
    #[must_use]
    pub fn initial_overlap_height(&self, view: Rect) -> f64 {
        overlap_height(self.start_rect, view)
    }

    /// How far the overlay covers `view` vertically at the end of the transition.
    #[must_use]
    pub fn final_overlap_height(&self, view: Rect) -> f64 {
        overlap_height(self.end_rect, view)
    }

    /// Change in covered height over the transition; positive while the overlay grows.
    #[must_use]
    pub fn overlap_delta(&self, view: Rect) -> f64 {
        self.final_overlap_height(view) - self.initial_overlap_height(view)
    }

    /// Returns `true` if the overlay covers more of `view` at the end than at the start.
    #[must_use]
    pub fn is_expanding(&self, view: Rect) -> bool {
        self.final_overlap_height(view) > self.initial_overlap_height(view)
    }

    /// Returns `true` if the overlay covers less of `view` at the end than at the start.
    #[must_use]
    pub fn is_collapsing(&self, view: Rect) -> bool {
        self.final_overlap_height(view) < self.initial_overlap_height(view)
    }
}

impl TryFrom<&TransitionPayload> for OverlayTransition {
    type Error = PayloadError;

    fn try_from(payload: &TransitionPayload) -> Result<Self, Self::Error> {
        Self::try_from_payload(payload)
    }
}

/// Covered height of `view`, measured from the overlay's top edge down to the view's bottom.
///
/// Overlays are anchored to the bottom of the screen, so everything of the
/// view below the overlay's top edge counts as covered.
fn overlap_height(overlay: Rect, view: Rect) -> f64 {
    let view = view.abs();
    // Side-by-side rects touch on an edge at most; that is not an overlap.
    if overlay.x1.min(view.x1) - overlay.x0.max(view.x0) <= 0.0 {
        return 0.0;
    }
    (view.y1 - view.y0.max(overlay.y0)).max(0.0)
}

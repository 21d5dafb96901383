// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_keyboard_avoidance --heading-base-level=0

//! Understory Keyboard Avoidance: keep content clear of a software keyboard.
//!
//! A software keyboard (or any host-controlled overlay) slides over part of the
//! screen. This crate keeps one layout value, a bottom offset, equal to how
//! much of a target view the overlay actually covers. It is headless: the host
//! toolkit delivers overlay events and performs the layout change, and this
//! crate decides what the offset should be and when to apply it.
//!
//! - [`transition`]: [`OverlayTransition`] parses a raw overlay event and measures
//!   the overlap with a view at the start and end of the animation.
//! - [`policy`]: [`BehaviorPolicy`] decides whether the offset animates with the
//!   overlay or waits until it has settled; [`DefaultPolicy`] is the stock rule.
//! - [`host`]: the [`LayoutHost`] and [`OverlayEvents`] traits a host adapter implements.
//! - [`delegate`]: [`KeyboardAvoidanceDelegate`], optional will/did notifications
//!   and a per-transition policy override.
//! - [`KeyboardAvoidance`]: the coordinator tying these together.
//!
//! ## Overlap, not overlay height
//!
//! The offset is how much of the view lies below the overlay's top edge, not the
//! overlay's height. A sheet centered on a tablet screen may only
//! be partly covered, or not at all:
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::Rect;
//! use understory_keyboard_avoidance::{AnimationCurve, OverlayTransition};
//!
//! let keyboard = OverlayTransition::new(
//!     Rect::new(0.0, 1024.0, 768.0, 1324.0),
//!     Rect::new(0.0, 724.0, 768.0, 1024.0),
//!     Duration::from_millis(250),
//!     AnimationCurve::EaseInOut,
//! );
//!
//! let full_screen = Rect::new(0.0, 0.0, 768.0, 1024.0);
//! let sheet = Rect::new(84.0, 212.0, 684.0, 812.0);
//! assert_eq!(keyboard.final_overlap_height(full_screen), 300.0);
//! assert_eq!(keyboard.final_overlap_height(sheet), 88.0);
//! ```
//!
//! ## Driving the coordinator
//!
//! 1) Implement [`LayoutHost`] and [`OverlayEvents`] for your toolkit adapter.
//! 2) Create a [`KeyboardAvoidance`] per screen that needs avoidance, optionally
//!    with a delegate ([`KeyboardAvoidance::with_delegate`]).
//! 3) Forward every overlay signal as an [`OverlayEvent`] to [`KeyboardAvoidance::handle`].
//! 4) Drop the coordinator to unsubscribe and cancel any deferred application.
//!
//! Everything runs on the host's UI thread; nothing here blocks or locks.
//!
//! ## Features
//!
//! - `std` (default): forwarded to `kurbo`.
//! - `libm`: `no_std` float support for `kurbo`.
//! - `tracing`: emit `tracing` events at each decision point.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod coordinator;
pub mod delegate;
pub mod host;
pub mod policy;
pub mod transition;

pub use coordinator::{KeyboardAvoidance, Phase};
pub use delegate::KeyboardAvoidanceDelegate;
pub use host::{
    CompletionToken, LayoutHost, OffsetAnimation, OverlayEvent, OverlayEvents, SubscriptionId,
};
pub use policy::{Behavior, BehaviorPolicy, DefaultPolicy, PolicyInput, SizeClass};
pub use transition::{AnimationCurve, OverlayTransition, PayloadError, PayloadField, TransitionPayload};

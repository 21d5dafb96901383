// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checks the `tracing` events emitted at coordinator decision points.

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use kurbo::Rect;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use understory_keyboard_avoidance::{
    CompletionToken, KeyboardAvoidance, LayoutHost, OffsetAnimation, OverlayEvents, SizeClass,
    SubscriptionId, TransitionPayload,
};

/// Captures each event's message and its `token` field, if any.
#[derive(Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl<S> Layer<S> for EventCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        #[derive(Default)]
        struct Fields {
            message: String,
            token: Option<String>,
        }

        impl tracing::field::Visit for Fields {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                match field.name() {
                    "message" => self.message = format!("{value:?}"),
                    "token" => self.token = Some(format!("{value:?}")),
                    _ => {}
                }
            }
        }

        let mut fields = Fields::default();
        event.record(&mut fields);
        self.events
            .lock()
            .expect("event capture lock")
            .push((fields.message, fields.token));
    }
}

/// A compact view in a regular window, so expanding transitions defer.
#[derive(Default)]
struct Sheet {
    scheduled: Vec<CompletionToken>,
}

impl LayoutHost for Sheet {
    type View = ();
    type Constraint = ();

    fn view_frame(&self, _: &()) -> Option<Rect> {
        Some(Rect::new(100.0, 200.0, 700.0, 900.0))
    }

    fn is_attached(&self, _: &(), _: &()) -> bool {
        true
    }

    fn view_size_class(&self, _: &()) -> SizeClass {
        SizeClass::Compact
    }

    fn window_size_class(&self, _: &()) -> SizeClass {
        SizeClass::Regular
    }

    fn apply_offset(&mut self, _: &(), _: &(), _: f64, _: Option<OffsetAnimation>) {}
}

impl OverlayEvents for Sheet {
    fn subscribe(&mut self) -> SubscriptionId {
        SubscriptionId(1)
    }

    fn unsubscribe(&mut self, _: SubscriptionId) {}

    fn schedule_completion(&mut self, token: CompletionToken, _: Duration) {
        self.scheduled.push(token);
    }
}

fn rise(from: f64, to: f64) -> TransitionPayload {
    TransitionPayload {
        begin_frame: Some(Rect::new(0.0, from, 800.0, from + 300.0)),
        end_frame: Some(Rect::new(0.0, to, 800.0, to + 300.0)),
        duration: Some(0.25),
        curve: Some(7),
    }
}

#[test]
fn degraded_payload_and_superseded_token_are_logged() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: Arc::clone(&events),
    });
    let _guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();

    let mut avoidance = KeyboardAvoidance::new(Sheet::default(), (), ());
    avoidance.will_show_or_change(&TransitionPayload {
        curve: None,
        ..rise(1000.0, 700.0)
    });
    avoidance.will_show_or_change(&rise(1000.0, 700.0));
    let superseded = avoidance.host().scheduled[0];
    avoidance.will_show_or_change(&rise(1000.0, 650.0));

    let events = events.lock().expect("event capture lock");
    let degraded: Vec<_> = events
        .iter()
        .filter(|(message, _)| message == "degrading malformed overlay payload")
        .collect();
    assert_eq!(degraded.len(), 1, "events: {events:?}");

    let superseding: Vec<_> = events
        .iter()
        .filter(|(message, _)| message == "superseding deferred overlay update")
        .collect();
    assert_eq!(superseding.len(), 1, "events: {events:?}");
    assert_eq!(superseding[0].1, Some(format!("{superseded:?}")));
}

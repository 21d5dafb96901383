// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use std::time::Duration;
use understory_keyboard_avoidance::{
    AnimationCurve, CompletionToken, KeyboardAvoidance, LayoutHost, OffsetAnimation, OverlayEvent,
    OverlayEvents, OverlayTransition, SizeClass, SubscriptionId, TransitionPayload,
};

/// Host that only remembers the last offset.
struct NullHost {
    frame: Rect,
    window: SizeClass,
    last: f64,
}

impl LayoutHost for NullHost {
    type View = ();
    type Constraint = ();

    fn view_frame(&self, _: &()) -> Option<Rect> {
        Some(self.frame)
    }

    fn is_attached(&self, _: &(), _: &()) -> bool {
        true
    }

    fn view_size_class(&self, _: &()) -> SizeClass {
        SizeClass::Compact
    }

    fn window_size_class(&self, _: &()) -> SizeClass {
        self.window
    }

    fn apply_offset(&mut self, _: &(), _: &(), offset: f64, _: Option<OffsetAnimation>) {
        self.last = offset;
    }
}

impl OverlayEvents for NullHost {
    fn subscribe(&mut self) -> SubscriptionId {
        SubscriptionId(0)
    }

    fn unsubscribe(&mut self, _: SubscriptionId) {}

    fn schedule_completion(&mut self, _: CompletionToken, _: Duration) {}
}

fn payload(from: f64, to: f64) -> TransitionPayload {
    TransitionPayload {
        begin_frame: Some(Rect::new(0.0, from, 1024.0, from + 320.0)),
        end_frame: Some(Rect::new(0.0, to, 1024.0, to + 320.0)),
        duration: Some(0.25),
        curve: Some(7),
    }
}

fn bench_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyboard_avoidance/overlap");

    // Views sliding across the keyboard's path, including some that miss it entirely.
    for len in [64usize, 1_024] {
        let views: Vec<Rect> = (0..len)
            .map(|i| {
                let y = (i % 64) as f64 * 20.0;
                let x = (i % 7) as f64 * 200.0;
                Rect::new(x, y, x + 400.0, y + 600.0)
            })
            .collect();
        let transition = OverlayTransition::new(
            Rect::new(0.0, 1366.0, 1024.0, 1686.0),
            Rect::new(0.0, 1046.0, 1024.0, 1366.0),
            Duration::from_millis(250),
            AnimationCurve::Other(7),
        );
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("is_expanding", len), &views, |b, views| {
            b.iter(|| {
                views
                    .iter()
                    .filter(|v| transition.is_expanding(**v))
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_event_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyboard_avoidance/events");

    for (name, window) in [("immediate", SizeClass::Compact), ("deferred", SizeClass::Regular)] {
        let host = NullHost {
            frame: Rect::new(128.0, 200.0, 896.0, 1200.0),
            window,
            last: 0.0,
        };
        let mut avoidance = KeyboardAvoidance::new(host, (), ());

        group.bench_function(name, |b| {
            b.iter(|| {
                avoidance.handle(OverlayEvent::WillShowOrChange(black_box(payload(1366.0, 1046.0))));
                if let Some(pending) = avoidance.pending_completion() {
                    avoidance.handle(OverlayEvent::AnimationCompleted(pending));
                }
                avoidance.handle(OverlayEvent::WillHide(black_box(payload(1046.0, 1366.0))));
                black_box(avoidance.host().last)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_overlap, bench_event_stream);
criterion_main!(benches);

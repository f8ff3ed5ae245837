// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for gesture zoom fusion

use proptest::prelude::*;
use viewfinder::constants::zoom::MIN_ZOOM;
use viewfinder::{GestureEvent, GestureFusionEngine};

fn event() -> impl Strategy<Value = GestureEvent> {
    prop_oneof![
        (-10.0f64..10.0).prop_map(GestureEvent::PinchUpdate),
        Just(GestureEvent::PinchEnd),
        (-1000.0f64..1000.0).prop_map(GestureEvent::DragUpdate),
        Just(GestureEvent::DragEnd),
    ]
}

proptest! {
    #[test]
    fn test_zoom_always_within_range(
        max in 1.0f64..20.0,
        events in proptest::collection::vec(event(), 0..64),
    ) {
        let mut engine = GestureFusionEngine::new(max);
        for event in events {
            let zoom = engine.handle(event);
            prop_assert!(zoom >= MIN_ZOOM && zoom <= max, "zoom {} outside [1, {}]", zoom, max);
            let state = engine.zoom();
            prop_assert!(state.base >= MIN_ZOOM && state.base <= max);
        }
    }

    #[test]
    fn test_drag_is_monotonic_upward(a in 0.0f64..400.0, b in 0.0f64..400.0) {
        let mut engine = GestureFusionEngine::new(10.0);
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let low = engine.drag_update(-near);
        let high = engine.drag_update(-far);
        prop_assert!(low <= high);
    }
}

#[test]
fn test_pinch_then_drag_scenario() {
    // Pinch to 2x, release, then drag halfway up
    let mut engine = GestureFusionEngine::new(10.0);
    assert_eq!(engine.handle(GestureEvent::PinchUpdate(2.0)), 2.0);
    assert_eq!(engine.handle(GestureEvent::PinchEnd), 2.0);
    assert_eq!(engine.zoom().base, 2.0);

    // Drag zoom is absolute: 1 + (10 - 1) * (100 / 200)
    assert_eq!(engine.handle(GestureEvent::DragUpdate(-100.0)), 5.5);
    assert_eq!(engine.handle(GestureEvent::DragEnd), 5.5);

    // The next pinch multiplies the frozen drag result
    assert_eq!(engine.handle(GestureEvent::PinchUpdate(1.5)), 8.25);
}

#[test]
fn test_full_drag_reaches_maximum() {
    let mut engine = GestureFusionEngine::new(6.0).with_full_zoom_drag(300.0);
    assert_eq!(engine.drag_update(-300.0), 6.0);
    assert_eq!(engine.drag_update(-150.0), 3.5);
}

#[test]
fn test_reset_returns_to_minimum() {
    let mut engine = GestureFusionEngine::new(10.0);
    engine.pinch_update(4.0);
    engine.end_gesture();
    assert_eq!(engine.reset(), MIN_ZOOM);
    assert_eq!(engine.pinch_update(2.0), 2.0);
}

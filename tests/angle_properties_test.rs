use form_coach::models::{AngleKind, ExerciseProfile, ExerciseType};
use form_coach::services::{angle_between, band, Band, RollingBuffer};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = (f32, f32)> {
    (-1000.0f32..1000.0, -1000.0f32..1000.0)
}

proptest! {
    #[test]
    fn angle_is_within_zero_and_180(a in point(), b in point(), c in point()) {
        if let Some(angle) = angle_between(a, b, c) {
            prop_assert!((0.0..=180.0).contains(&angle), "angle {} out of range", angle);
        }
    }

    #[test]
    fn angle_is_symmetric_in_outer_points(a in point(), b in point(), c in point()) {
        let forward = angle_between(a, b, c);
        let backward = angle_between(c, b, a);
        match (forward, backward) {
            (Some(x), Some(y)) => prop_assert!((x - y).abs() < 1e-3),
            (x, y) => prop_assert_eq!(x.is_none(), y.is_none()),
        }
    }

    #[test]
    fn coincident_vertex_is_undetected(a in point(), c in point()) {
        prop_assert!(angle_between(a, a, c).is_none());
        prop_assert!(angle_between(a, c, c).is_none());
    }

    #[test]
    fn buffer_never_exceeds_capacity(
        capacity in 1usize..10,
        values in proptest::collection::vec(0.0f32..180.0, 0..40),
    ) {
        let mut buffer = RollingBuffer::new(capacity);
        for value in &values {
            buffer.push(*value);
        }

        prop_assert_eq!(buffer.len(), values.len().min(capacity));
        if !values.is_empty() {
            let tail = &values[values.len() - buffer.len()..];
            let expected = tail.iter().sum::<f32>() / tail.len() as f32;
            prop_assert!((buffer.average() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn bar_position_stays_on_scale(current in -360.0f32..360.0) {
        let profile = ExerciseProfile::for_exercise(ExerciseType::Squat);
        let knee = profile.angle(AngleKind::Knee).unwrap();

        match band(current, knee.ideal, knee.display_range, knee.excellent_range) {
            Band::OffScale => prop_assert!((current - knee.ideal).abs() > knee.display_range),
            other => {
                let bar = other.bar().unwrap();
                prop_assert!((0.0..=1.0).contains(&bar.position));
            }
        }
    }
}

#[test]
fn right_angle_and_straight_line() {
    let right = angle_between((0.0, 0.0), (0.0, 1.0), (1.0, 1.0)).unwrap();
    assert!((right - 90.0).abs() < 1e-4);

    let straight = angle_between((0.0, 0.0), (0.0, 1.0), (0.0, 2.0)).unwrap();
    assert!((straight - 180.0).abs() < 1e-3);
}

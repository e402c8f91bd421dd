//! Property tests for the mappers, the arbiter and the filters

use std::cell::RefCell;

use efis_core::config::{CompassSpec, SpringConfig, TapeSpec};
use efis_core::filter::SpringDamper;
use efis_core::input::{EncoderArbiter, EncoderSample, Target};
use efis_core::mapping::{digit_at, CompassWrapMapper, TapeMapper, WheelDigit, WheelDigitMapper};
use proptest::prelude::*;

struct Recorder<'a> {
    index: usize,
    log: &'a RefCell<Vec<(usize, bool)>>,
}

impl Target for Recorder<'_> {
    fn notify(&mut self, _selected: bool, editable: bool, _value: i32) {
        self.log.borrow_mut().push((self.index, editable));
    }
}

proptest! {
    #[test]
    fn tape_labels_track_value(value in -20_000.0f32..20_000.0) {
        let tape = TapeMapper::new(TapeSpec::altitude()).expect("altitude tape is valid");
        let frame = tape.map(value, None);
        let interval = 100;
        let ppu = tape.px_per_unit();
        let reach = (f32::from(tape.spec().major_interval_count) / 2.0 + 1.0) * 100.0 * ppu;

        prop_assert_eq!(frame.labels.len(), 5);
        for pair in frame.labels.windows(2) {
            prop_assert_eq!(pair[1].value - pair[0].value, interval);
        }
        let lowest = frame.labels[0].value as f32;
        let highest = frame.labels[frame.labels.len() - 1].value as f32;
        prop_assert!(lowest <= value && value <= highest);

        for label in &frame.labels {
            let expected = (value - label.value as f32) * ppu;
            prop_assert!((label.offset_px - expected).abs() < 0.05);
            // Recycled labels stay within one interval of the window
            prop_assert!(label.offset_px.abs() <= reach + 0.05);
        }
    }

    #[test]
    fn ruler_jumps_only_at_interval_boundaries(
        value in -2_000.0f32..2_000.0,
        step in 0.01f32..0.5,
        allow_negative in any::<bool>(),
    ) {
        let spec = if allow_negative { TapeSpec::altitude() } else { TapeSpec::airspeed() };
        let tape = TapeMapper::new(spec).expect("tape is valid");
        let interval = f32::from(spec.major_interval_size);
        let ppu = tape.px_per_unit();
        let next = value + step;

        let jump = tape.map(next, None).ruler_offset_px
            - tape.map(value, None).ruler_offset_px
            - (next - value) * ppu;
        let crosses = ((value - 0.01) / interval).floor() != ((next + 0.01) / interval).floor();
        if crosses {
            // Either smooth or a wrap of exactly one interval
            prop_assert!(jump.abs() < 0.02 || (jump.abs() - interval * ppu).abs() < 0.02);
        } else {
            prop_assert!(jump.abs() < 0.02);
        }
    }

    #[test]
    fn compass_is_periodic(heading in 0u16..360, bug in 0u16..360, turns in -5i32..5) {
        let compass = CompassWrapMapper::new(CompassSpec::default()).expect("compass is valid");
        let base = compass.map(f32::from(heading), Some(f32::from(bug)));
        let shifted = compass.map(
            f32::from(heading) + 360.0 * turns as f32,
            Some(f32::from(bug) - 360.0 * turns as f32),
        );
        prop_assert_eq!(base, shifted);
    }

    #[test]
    fn bug_takes_short_way_across_seam(heading in 0i32..360, bug in 0i32..360) {
        let compass = CompassWrapMapper::new(CompassSpec::default()).expect("compass is valid");
        let short = (bug - heading + 540).rem_euclid(360) - 180;
        if short.abs() < compass.overscan_deg() as i32 {
            prop_assert_eq!(
                compass.bug_offset_deg(heading as f32, bug as f32),
                short as f32
            );
        }
    }

    #[test]
    fn wheel_digits_reconstruct_value(value in -99_999.0f32..99_999.0) {
        let mut rebuilt = 0u64;
        for place in 0..6u8 {
            let digit = digit_at(value, place);
            let wheel = WheelDigitMapper::new(WheelDigit::new(place, false), 30.0)
                .expect("positive unit");
            prop_assert_eq!(wheel.map(value).digit, digit);
            rebuilt += u64::from(digit) * 10u64.pow(u32::from(place));
        }
        prop_assert_eq!(rebuilt, value.abs().floor() as u64);
    }

    #[test]
    fn arbiter_edits_only_the_selected_target(
        steps in proptest::collection::vec((-5i32..=5, any::<bool>()), 1..64),
    ) {
        let log = RefCell::new(Vec::new());
        let mut arbiter: EncoderArbiter<Recorder, 3> = EncoderArbiter::new();
        for index in 0..3 {
            arbiter.register(Recorder { index, log: &log }).expect("room for three");
        }
        let mut position = 0i32;
        arbiter.sample(EncoderSample::new(position, false));
        log.borrow_mut().clear();

        for (delta, click) in steps {
            let before: Vec<Option<i32>> = (0..3).map(|i| arbiter.stored_value(i)).collect();
            let owner = arbiter.selected();

            position += delta;
            arbiter.sample(EncoderSample::new(position, false));
            if click {
                arbiter.sample(EncoderSample::new(position, true));
                arbiter.sample(EncoderSample::new(position, false));
            }

            // Only the target being edited when the step started can save a value
            for i in (0..3).filter(|&i| i != owner) {
                prop_assert_eq!(arbiter.stored_value(i), before[i]);
            }
            let selected = arbiter.selected();
            for (index, editable) in log.borrow_mut().drain(..) {
                if editable {
                    prop_assert_eq!(index, selected);
                }
            }
        }
    }

    #[test]
    fn spring_settles_without_overshoot(target in -10.0f32..10.0) {
        let mut needle = SpringDamper::new(SpringConfig::default()).expect("default spring");
        let mut peak = 0.0f32;
        for _ in 0..500 {
            peak = peak.max(needle.step(target, 0.02).abs());
        }
        prop_assert!((needle.position() - target).abs() < 1e-2);
        prop_assert!(needle.velocity().abs() < 1e-2);
        prop_assert!(peak <= target.abs() * 1.001 + 1e-4);
    }
}

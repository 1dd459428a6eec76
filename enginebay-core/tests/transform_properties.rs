//! Property tests for the numeric transforms and the scheduler grid

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{fuel_table, temperature_table, TEMPERATURE_CURVE};
use enginebay_core::{
    time::ManualTime, AnalogVoltage, CurveTable, Linear, MovingAverage, Scheduler, Transform,
    VoltageDividerR2,
};
use proptest::prelude::*;

fn output_bounds(table: &CurveTable) -> (f32, f32) {
    table.points().iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| {
        (lo.min(p.output), hi.max(p.output))
    })
}

proptest! {
    #[test]
    fn curve_output_stays_within_table(x in -1.0e6_f32..1.0e6) {
        for table in [temperature_table(), fuel_table()] {
            let (lo, hi) = output_bounds(&table);
            let slack = (hi - lo) * 1e-5;
            let y = table.lookup(x).expect("table has enough points");
            prop_assert!(y >= lo - slack && y <= hi + slack, "{} outside [{}, {}]", y, lo, hi);
        }
    }

    #[test]
    fn temperature_curve_is_monotonic(a in 0.0_f32..500.0, b in 0.0_f32..500.0) {
        // The sender curve falls as resistance rises
        let table = temperature_table();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.lookup(low).unwrap() >= table.lookup(high).unwrap() - 1e-3);
    }

    #[test]
    fn curve_rows_are_reproduced_exactly(row in 0_usize..TEMPERATURE_CURVE.len()) {
        let (input, output) = TEMPERATURE_CURVE[row];
        prop_assert_eq!(temperature_table().lookup(input).unwrap(), output);
    }

    #[test]
    fn moving_average_stays_within_window(
        samples in prop::collection::vec(-1000.0_f32..1000.0, 1..100),
        n in 1_usize..16,
    ) {
        let mut average = MovingAverage::new(n, 1.0);

        for (i, &sample) in samples.iter().enumerate() {
            let out = average.apply(sample).expect("finite input is never withheld");
            let window = &samples[(i + 1).saturating_sub(n)..=i];
            let lo = window.iter().copied().fold(f32::MAX, f32::min);
            let hi = window.iter().copied().fold(f32::MIN, f32::max);
            prop_assert!(out >= lo - 1e-2 && out <= hi + 1e-2, "{} outside [{}, {}]", out, lo, hi);
        }
    }

    #[test]
    fn stateless_transforms_are_idempotent(raw in 0_u16..=4095, x in -1.0e4_f32..1.0e4) {
        let adc = AnalogVoltage::new(3.3, 1.5, 0.2);
        prop_assert_eq!(adc.convert(raw), adc.convert(raw));

        let linear = Linear::new(1.0, 0.9);
        prop_assert_eq!(linear.convert(x), linear.convert(x));

        let table = temperature_table();
        prop_assert_eq!(table.lookup(x), table.lookup(x));
    }

    #[test]
    fn divider_output_is_finite_and_bounded(vout in -5.0_f32..10.0) {
        let divider = VoltageDividerR2::new(120.0, 3.5);
        let r2 = divider.convert(vout);
        prop_assert!(r2.is_finite());
        prop_assert!((0.0..=1.0e6).contains(&r2));
    }

    #[test]
    fn due_times_stay_on_the_period_grid(
        jitter in prop::collection::vec(0_u64..3000, 1..40),
        period in 100_u64..2000,
    ) {
        let clock = ManualTime::new(0);
        let mut scheduler = Scheduler::new(clock.clone());
        let fired = Rc::new(RefCell::new(Vec::new()));
        let log = fired.clone();
        let id = scheduler.every(period, "rig", move |now| log.borrow_mut().push(now)).unwrap();

        let mut now = 0;
        for late in jitter {
            now += late;
            clock.set(now);
            let before = fired.borrow().len();
            scheduler.tick();

            let stats = scheduler.stats(id).unwrap();
            prop_assert_eq!(stats.next_due % period, 0);
            prop_assert!(stats.next_due > now);
            // Never more than one firing per tick
            prop_assert!(fired.borrow().len() - before <= 1);
        }
    }
}

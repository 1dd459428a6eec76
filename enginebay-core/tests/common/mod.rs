//! Shared fixtures for integration tests
//!
//! - The coolant sender and fuel flow calibration curves
//! - `EngineRoom`: the engine-room topology wired against simulated drivers
//!   and a [`ManualTime`] clock, so tests step time explicitly

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use enginebay_core::{
    time::ManualTime, AnalogInput, AnalogVoltage, ConfigItem, CurveInterpolator, CurveTable,
    DigitalInputCounter, DigitalInputState, EdgeCounter, Frequency, GraphBuilder, LambdaTransform,
    Linear, MemorySink, MovingAverage, Pipeline, ReadError, Scheduler, VoltageDividerR2,
};

/// Coolant sender: ohms → kelvin
pub const TEMPERATURE_CURVE: [(f32, f32); 10] = [
    (20.0, 393.15),
    (30.0, 383.15),
    (40.0, 373.15),
    (55.0, 363.15),
    (70.0, 353.15),
    (100.0, 343.15),
    (140.0, 333.15),
    (200.0, 323.15),
    (300.0, 317.15),
    (400.0, 313.15),
];

/// Engine fuel burn: RPM → m³/s
pub const FUEL_CURVE: [(f32, f32); 11] = [
    (600.0, 0.000_000_069_4),
    (1000.0, 0.000_000_125),
    (1500.0, 0.000_000_222),
    (1800.0, 0.000_000_284),
    (2000.0, 0.000_000_347),
    (2200.0, 0.000_000_484),
    (2400.0, 0.000_000_620),
    (2600.0, 0.000_000_757),
    (2800.0, 0.000_000_893),
    (3000.0, 0.000_001_03),
    (3200.0, 0.000_001_24),
];

pub const RPM_PATH: &str = "propulsion.engine.revolutions";
pub const FUEL_RATE_PATH: &str = "propulsion.engine.fuel.rate";
pub const ENGINE_TEMP_PATH: &str = "propulsion.engine.temperature";
pub const ENGINE_TEMP_RAW_PATH: &str = "propulsion.engine.temperature.raw";
pub const BILGE_PATH: &str = "notification.bilge";
pub const BILGE_RAW_PATH: &str = "notification.bilge.raw";

/// Flywheel pulses per revolution
pub const FLYWHEEL_TEETH: f32 = 11.0;

/// Counter and analog period
pub const FAST_PERIOD_MS: u64 = 2000;
/// Bilge switch period
pub const BILGE_PERIOD_MS: u64 = 5000;

pub fn temperature_table() -> CurveTable {
    CurveTable::from_points(&TEMPERATURE_CURVE).expect("temperature curve is ascending")
}

pub fn fuel_table() -> CurveTable {
    CurveTable::from_points(&FUEL_CURVE).expect("fuel curve is ascending")
}

/// Engine-room pipeline on simulated hardware
pub struct EngineRoom {
    pub clock: ManualTime,
    pub scheduler: Scheduler,
    pub pipeline: Pipeline,
    pub memory: Rc<RefCell<MemorySink>>,
    /// Shared with the simulated flywheel interrupt
    pub flywheel: Arc<EdgeCounter>,
    /// Next ADC count on the coolant sender pin; `None` simulates a bus fault
    pub coolant_adc: Rc<Cell<Option<u16>>>,
    /// Bilge float switch
    pub bilge_wet: Rc<Cell<bool>>,
}

impl EngineRoom {
    /// Wire the RPM, fuel, engine temperature and bilge chains
    pub fn wire() -> Self {
        let memory = MemorySink::shared();
        let flywheel = Arc::new(EdgeCounter::new());
        let coolant_adc = Rc::new(Cell::new(Some(0_u16)));
        let bilge_wet = Rc::new(Cell::new(false));

        let mut graph = GraphBuilder::new();

        // RPM and fuel rate share the flywheel counter
        let rpm_sensor =
            graph.add_producer(DigitalInputCounter::new(16, FAST_PERIOD_MS, flywheel.clone()));
        let rpm_calibrate = graph.add_transform(Frequency::new(1.0 / FLYWHEEL_TEETH));
        let rpm_average = graph.add_transform(MovingAverage::new(2, 1.0));
        let rpm_out = graph.add_sink::<f32>(RPM_PATH, memory.clone());

        let fuel_frequency = graph.add_transform(Frequency::new(6.0));
        let fuel_average = graph.add_transform(MovingAverage::new(4, 1.0));
        let fuel_curve = graph.add_transform(CurveInterpolator::new(fuel_table()));
        let fuel_out = graph.add_sink::<f32>(FUEL_RATE_PATH, memory.clone());

        // Coolant sender through the divider
        let adc = coolant_adc.clone();
        let analog = graph.add_producer(AnalogInput::new(36, FAST_PERIOD_MS, move || {
            adc.get().ok_or(ReadError::Bus("adc1 timeout"))
        }));
        let voltage = graph.add_transform(AnalogVoltage::new(3.5, 1.0, 0.0));
        let divider = graph.add_transform(VoltageDividerR2::new(120.0, 3.5));
        let temp_curve = graph.add_transform(CurveInterpolator::new(temperature_table()));
        let temp_calibrate = graph.add_transform(Linear::new(1.0, 0.9));
        let temp_average = graph.add_transform(MovingAverage::new(4, 1.0));
        let temp_out = graph.add_sink::<f32>(ENGINE_TEMP_PATH, memory.clone());
        let temp_raw_out = graph.add_sink::<f32>(ENGINE_TEMP_RAW_PATH, memory.clone());

        // Bilge float switch
        let wet = bilge_wet.clone();
        let bilge = graph.add_producer(DigitalInputState::new(17, BILGE_PERIOD_MS, move || {
            Ok(wet.get())
        }));
        let bilge_text = graph.add_transform(LambdaTransform::new("bilge text", |wet: bool| {
            String::from(if wet { "Water in bilge" } else { "Bilge clear" })
        }));
        let bilge_out = graph.add_sink::<String>(BILGE_PATH, memory.clone());
        let bilge_raw_out = graph.add_sink::<bool>(BILGE_RAW_PATH, memory.clone());

        let wiring = (|| {
            graph.connect(&rpm_sensor, &rpm_calibrate)?;
            graph.connect(&rpm_calibrate, &rpm_average)?;
            graph.connect(&rpm_average, &rpm_out)?;

            graph.connect(&rpm_sensor, &fuel_frequency)?;
            graph.connect(&fuel_frequency, &fuel_average)?;
            graph.connect(&fuel_average, &fuel_curve)?;
            graph.connect(&fuel_curve, &fuel_out)?;

            graph.connect(&analog, &voltage)?;
            graph.connect(&voltage, &divider)?;
            graph.connect(&divider, &temp_curve)?;
            graph.connect(&temp_curve, &temp_calibrate)?;
            graph.connect(&temp_calibrate, &temp_average)?;
            graph.connect(&temp_average, &temp_out)?;
            graph.connect(&divider, &temp_raw_out)?;

            graph.connect(&bilge, &bilge_text)?;
            graph.connect(&bilge_text, &bilge_out)?;
            graph.connect(&bilge, &bilge_raw_out)
        })();
        wiring.expect("engine-room wiring is acyclic");

        let exposed = [
            graph.expose(
                &rpm_calibrate,
                ConfigItem::new("/Engine RPM/calibrate")
                    .title("RPM Frequency Calibration")
                    .sort_order(600),
            ),
            graph.expose(
                &rpm_average,
                ConfigItem::new("/Engine RPM/movingAVG").title("RPM Moving Average").sort_order(601),
            ),
            graph.expose(
                &rpm_out,
                ConfigItem::new("/Engine RPM/sk_path")
                    .title("Engine RPM SK Output Path")
                    .sort_order(602),
            ),
            graph.expose(
                &fuel_curve,
                ConfigItem::new("/Engine Fuel/curve")
                    .title("Fuel Flow Curve Interpolation")
                    .sort_order(702),
            ),
            graph.expose(
                &divider,
                ConfigItem::new("/Engine Temp/sender")
                    .title("Engine Temperature Voltage Divider")
                    .sort_order(901),
            ),
            graph.expose(
                &temp_curve,
                ConfigItem::new("/Engine Temp/curve")
                    .title("Engine Temperature Curve")
                    .sort_order(902),
            ),
            graph.expose(
                &temp_calibrate,
                ConfigItem::new("/Engine Temp/calibrate")
                    .title("Engine Temperature Calibration")
                    .sort_order(903),
            ),
            graph.expose(
                &temp_average,
                ConfigItem::new("/Engine Temp/movingAVG")
                    .title("Engine Temperature Moving Average")
                    .sort_order(904),
            ),
            graph.expose(
                &bilge,
                ConfigItem::new("/Bilge/input").title("Bilge Float Switch").sort_order(999),
            ),
        ];
        for result in exposed {
            result.expect("config paths are unique");
        }

        let mut pipeline = graph.build().expect("engine-room graph builds");
        let clock = ManualTime::new(0);
        let mut scheduler = Scheduler::new(clock.clone());
        pipeline.start(&mut scheduler).expect("all periods are non-zero");

        Self { clock, scheduler, pipeline, memory, flywheel, coolant_adc, bilge_wet }
    }

    /// Record `edges` flywheel pulses, as the interrupt handler would
    pub fn spin(&self, edges: u32) {
        for _ in 0..edges {
            self.flywheel.record_edge();
        }
    }

    /// Move the clock to `at` and tick once
    pub fn tick_at(&mut self, at: u64) -> usize {
        self.clock.set(at);
        self.scheduler.tick()
    }

    /// Numeric values published under `path`, oldest first
    pub fn floats(&self, path: &str) -> Vec<f32> {
        self.memory.borrow().values(path).into_iter().filter_map(|v| v.as_f32()).collect()
    }
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

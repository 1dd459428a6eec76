//! Engine-room instrument wiring on simulated hardware
//!
//! Wires the full instrument: flywheel RPM and fuel rate, coolant sender,
//! engine-bay BME280, INA219 fuel tank current loop, four 1-Wire sensors and
//! the bilge float switch. Time is simulated at 100 ms per step for six
//! minutes, then the last value on every path is printed.
//!
//! Run with: cargo run -p enginebay-core --example engine_room

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::rc::Rc;
use std::sync::Arc;

use enginebay_core::{
    time::{ManualTime, TimeSource},
    AnalogInput, AnalogVoltage, ConfigItem, CurveInterpolator, CurveTable, DigitalInputCounter,
    DigitalInputState, EdgeCounter, Frequency, GraphBuilder, LambdaTransform, Linear, MemorySink,
    MovingAverage, ReadError, ReadResult, RepeatSensor, Scheduler, UptimeSensor,
    VoltageDividerR2,
};

const KELVIN_OFFSET: f32 = 273.15;
const FLYWHEEL_TEETH: f32 = 11.0;
const STEP_MS: u64 = 100;
const RUN_MS: u64 = 6 * 60 * 1000;

const TEMPERATURE_CURVE: [(f32, f32); 10] = [
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

const FUEL_CURVE: [(f32, f32); 11] = [
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

/// Simulated engine state the drivers read from
struct Engine {
    rpm: Cell<f32>,
    coolant_celsius: Cell<f32>,
    bilge_wet: Cell<bool>,
}

impl Engine {
    /// Coolant sender resistance, inverted from the sender curve
    fn sender_ohms(&self) -> f32 {
        let kelvin = self.coolant_celsius.get() + KELVIN_OFFSET;
        let curve = TEMPERATURE_CURVE;
        for pair in curve.windows(2) {
            let ((r0, k0), (r1, k1)) = (pair[0], pair[1]);
            if kelvin <= k0 && kelvin >= k1 {
                return r0 + (k0 - kelvin) / (k0 - k1) * (r1 - r0);
            }
        }
        curve[curve.len() - 1].0
    }

    /// ADC count across the sender in a 120 Ω / 3.5 V divider
    fn adc_count(&self) -> u16 {
        let r2 = self.sender_ohms();
        let vout = 3.5 * r2 / (120.0 + r2);
        (vout / 3.5 * 4095.0) as u16
    }
}

type BmeRead = fn(&Bme280) -> ReadResult<f32>;

/// Simulated BME280 on I2C address 0x76
struct Bme280 {
    present: bool,
}

impl Bme280 {
    fn temperature(&self) -> ReadResult<f32> {
        self.check().map(|_| 38.5 + KELVIN_OFFSET)
    }

    fn pressure(&self) -> ReadResult<f32> {
        self.check().map(|_| 101_210.0)
    }

    fn humidity(&self) -> ReadResult<f32> {
        self.check().map(|_| 61.0)
    }

    fn check(&self) -> ReadResult<()> {
        if self.present {
            Ok(())
        } else {
            Err(ReadError::NotResponding)
        }
    }
}

/// Simulated Dallas 1-Wire bus; one sensor has gone missing
struct OneWireBus {
    sensors: BTreeMap<u8, f32>,
}

impl OneWireBus {
    fn read_kelvin(&self, rom: u8) -> ReadResult<f32> {
        self.sensors
            .get(&rom)
            .map(|celsius| celsius + KELVIN_OFFSET)
            .ok_or(ReadError::NotResponding)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let engine = Rc::new(Engine {
        rpm: Cell::new(1800.0),
        coolant_celsius: Cell::new(82.0),
        bilge_wet: Cell::new(false),
    });
    let bme280 = Rc::new(Bme280 { present: true });
    let one_wire = Rc::new(RefCell::new(OneWireBus {
        sensors: BTreeMap::from([(1, 410.0), (2, 65.0), (3, 88.0)]),
    }));
    let memory = MemorySink::shared();
    let flywheel = Arc::new(EdgeCounter::new());

    let mut graph = GraphBuilder::new();

    // Device uptime
    let uptime = graph.add_producer(UptimeSensor::default());
    let uptime_out =
        graph.add_sink::<f32>("sensorDevice.Oceans-Dream-Instruments.uptime", memory.clone());
    graph.connect(&uptime, &uptime_out)?;

    // Fuel tank sender current through the INA219, A
    let fuel_level =
        graph.add_producer(RepeatSensor::new("INA219 current", 300_000, || Ok(0.0124_f32)));
    let fuel_level_out = graph.add_sink::<f32>("propulsion.fuelTank.level", memory.clone());
    graph.connect(&fuel_level, &fuel_level_out)?;
    graph.expose(
        &fuel_level_out,
        ConfigItem::new("/Fuel/Level/sk_path")
            .title("Fuel Tank Level SK Output Path")
            .description("Signal K path for fuel tank level")
            .sort_order(100),
    )?;

    // 1-Wire sensors: (rom, config prefix, path, base sort order)
    let sensors = [
        (1, "/Exhaust Temperature", "propulsion.engine.exhaustTemperature", 199),
        (2, "/Alternator Temperature", "electrical.alternator.temperature", 299),
        (3, "/Oil Temperature", "propulsion.engine.oilTemperature", 399),
        (4, "/Coolant Temperature", "propulsion.engine.coolantTemperature", 499),
    ];
    for (rom, prefix, path, order) in sensors {
        let bus = one_wire.clone();
        let source = graph.add_producer(RepeatSensor::new("OneWireTemperature", 10_000, move || {
            bus.borrow().read_kelvin(rom)
        }));
        let linear = graph.add_transform(Linear::new(1.0, 0.0));
        let out = graph.add_sink::<f32>(path, memory.clone());
        graph.connect(&source, &linear)?;
        graph.connect(&linear, &out)?;

        graph.expose(&source, ConfigItem::new(&format!("{prefix}/oneWire")).sort_order(order))?;
        graph
            .expose(&linear, ConfigItem::new(&format!("{prefix}/linear")).sort_order(order + 1))?;
        graph.expose(&out, ConfigItem::new(&format!("{prefix}/sk_path")).sort_order(order + 2))?;
    }

    // Flywheel: RPM and fuel rate from the same counter
    let rpm_sensor = graph.add_producer(DigitalInputCounter::new(16, 2000, flywheel.clone()));
    let rpm_calibrate = graph.add_transform(Frequency::new(1.0 / FLYWHEEL_TEETH));
    let rpm_average = graph.add_transform(MovingAverage::new(2, 1.0));
    let rpm_out = graph.add_sink::<f32>("propulsion.engine.revolutions", memory.clone());
    graph.connect(&rpm_sensor, &rpm_calibrate)?;
    graph.connect(&rpm_calibrate, &rpm_average)?;
    graph.connect(&rpm_average, &rpm_out)?;
    graph.expose(
        &rpm_calibrate,
        ConfigItem::new("/Engine RPM/calibrate")
            .title("RPM Frequency Calibration")
            .description("Frequency multiplier for RPM calculation")
            .sort_order(600),
    )?;
    graph.expose(
        &rpm_average,
        ConfigItem::new("/Engine RPM/movingAVG").title("RPM Moving Average").sort_order(601),
    )?;

    let fuel_frequency = graph.add_transform(Frequency::new(6.0));
    let fuel_average = graph.add_transform(MovingAverage::new(4, 1.0));
    let fuel_curve =
        graph.add_transform(CurveInterpolator::new(CurveTable::from_points(&FUEL_CURVE)?));
    let fuel_out = graph.add_sink::<f32>("propulsion.engine.fuel.rate", memory.clone());
    graph.connect(&rpm_sensor, &fuel_frequency)?;
    graph.connect(&fuel_frequency, &fuel_average)?;
    graph.connect(&fuel_average, &fuel_curve)?;
    graph.connect(&fuel_curve, &fuel_out)?;
    graph.expose(
        &fuel_curve,
        ConfigItem::new("/Engine Fuel/curve")
            .title("Fuel Flow Curve Interpolation")
            .description("RPM to fuel flow curve interpolation")
            .sort_order(702),
    )?;

    // Engine-bay environment
    let environment = [
        ("Temperature", "environment.engineBay.temperature", 800, Bme280::temperature as BmeRead),
        ("Pressure", "environment.engineBay.pressure", 801, Bme280::pressure),
        ("Humidity", "environment.engineBay.relativeHumidity", 802, Bme280::humidity),
    ];
    for (label, path, order, read) in environment {
        let device = bme280.clone();
        let sensor =
            graph.add_producer(RepeatSensor::new("BME280", 10_000, move || read(device.as_ref())));
        let out = graph.add_sink::<f32>(path, memory.clone());
        graph.connect(&sensor, &out)?;
        let item = ConfigItem::new(&format!("/Engine Room/{label}/sk_path")).sort_order(order);
        graph.expose(&out, item)?;
    }

    // Coolant sender on the divider
    let sim = engine.clone();
    let analog = graph.add_producer(AnalogInput::new(36, 2000, move || Ok(sim.adc_count())));
    let voltage = graph.add_transform(AnalogVoltage::new(3.5, 1.0, 0.0));
    let divider = graph.add_transform(VoltageDividerR2::new(120.0, 3.5));
    let temp_curve =
        graph.add_transform(CurveInterpolator::new(CurveTable::from_points(&TEMPERATURE_CURVE)?));
    let temp_calibrate = graph.add_transform(Linear::new(1.0, 0.9));
    let temp_average = graph.add_transform(MovingAverage::new(4, 1.0));
    let temp_out = graph.add_sink::<f32>("propulsion.engine.temperature", memory.clone());
    let temp_raw_out = graph.add_sink::<f32>("propulsion.engine.temperature.raw", memory.clone());
    graph.connect(&analog, &voltage)?;
    graph.connect(&voltage, &divider)?;
    graph.connect(&divider, &temp_curve)?;
    graph.connect(&temp_curve, &temp_calibrate)?;
    graph.connect(&temp_calibrate, &temp_average)?;
    graph.connect(&temp_average, &temp_out)?;
    graph.connect(&divider, &temp_raw_out)?;
    graph.expose(&voltage, ConfigItem::new("/Engine Temp/voltage").sort_order(900))?;
    graph.expose(&divider, ConfigItem::new("/Engine Temp/sender").sort_order(901))?;
    graph.expose(&temp_curve, ConfigItem::new("/Engine Temp/curve").sort_order(902))?;
    graph.expose(&temp_calibrate, ConfigItem::new("/Engine Temp/calibrate").sort_order(903))?;
    graph.expose(&temp_average, ConfigItem::new("/Engine Temp/movingAVG").sort_order(904))?;

    // Bilge float switch
    let sim = engine.clone();
    let bilge =
        graph.add_producer(DigitalInputState::new(17, 5000, move || Ok(sim.bilge_wet.get())));
    let bilge_text = graph.add_transform(LambdaTransform::new("bilge text", |wet: bool| {
        String::from(if wet { "Water in bilge" } else { "Bilge clear" })
    }));
    let bilge_out = graph.add_sink::<String>("notification.bilge", memory.clone());
    let bilge_raw_out = graph.add_sink::<bool>("notification.bilge.raw", memory.clone());
    graph.connect(&bilge, &bilge_text)?;
    graph.connect(&bilge_text, &bilge_out)?;
    graph.connect(&bilge, &bilge_raw_out)?;

    let mut pipeline = graph.build()?;
    let clock = ManualTime::new(0);
    let mut scheduler = Scheduler::new(clock.clone());
    pipeline.start(&mut scheduler)?;

    // Pulses owed to the flywheel interrupt, carried across steps
    let mut owed_edges = 0.0_f32;
    while clock.now() < RUN_MS {
        clock.advance(STEP_MS);
        let t = clock.now();

        // Throttle up after two minutes; bilge takes water at four
        if t == 120_000 {
            engine.rpm.set(2600.0);
            engine.coolant_celsius.set(88.0);
        }
        if t == 240_000 {
            engine.bilge_wet.set(true);
        }

        let edges_per_ms = engine.rpm.get() / 60.0 * FLYWHEEL_TEETH / 1000.0;
        owed_edges += edges_per_ms * STEP_MS as f32;
        while owed_edges >= 1.0 {
            flywheel.record_edge();
            owed_edges -= 1.0;
        }

        scheduler.tick();
    }

    let topology = pipeline.topology();
    println!("{} nodes, {} edges", topology.nodes().len(), topology.edges().len());
    println!();

    let memory = memory.borrow();
    let mut latest: BTreeMap<&str, (usize, String)> = BTreeMap::new();
    for (path, value) in memory.records() {
        let entry = latest.entry(path.as_str()).or_insert((0, String::new()));
        entry.0 += 1;
        entry.1 = value.to_string();
    }
    for (path, (count, value)) in &latest {
        println!("{path:<48} {value:>16}  ({count} updates)");
    }

    println!();
    for item in pipeline.config().items() {
        println!("{:>5}  {}", item.sort_order, item.path);
    }
    Ok(())
}

//! Named node parameters
//!
//! Nodes that carry tunable numbers (gains, offsets, window sizes, curve
//! points, periods) implement [`Configurable`]. The graph builder exposes
//! them in a [`ConfigRegistry`] under a config path such as
//! `"/Engine Temp/curve"`, where an external collaborator (file loader,
//! admin UI) can read and override them. Overrides never touch topology.
//!
//! A rejected value leaves the previous one in place.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::errors::{ConfigError, ConfigResult};

/// Parameter value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    /// Counts, periods, pin numbers
    Int(i64),
    /// Gains, offsets, voltages
    Float(f32),
    /// Paths and labels
    Text(String),
    /// Calibration curve as `(input, output)` points
    Curve(Vec<(f32, f32)>),
}

impl ParamValue {
    /// Numeric view; integers widen to `f32`
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Integer view; floats are accepted only when integral
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) if libm::truncf(*v) == *v => Some(*v as i64),
            _ => None,
        }
    }

    /// Text view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Curve view
    pub fn as_curve(&self) -> Option<&[(f32, f32)]> {
        match self {
            ParamValue::Curve(points) => Some(points),
            _ => None,
        }
    }

    /// Finite float or `TypeMismatch`/`InvalidValue` for `key`
    pub fn expect_finite(&self, key: &'static str) -> ConfigResult<f32> {
        let v = self.as_f32().ok_or(ConfigError::TypeMismatch { key, expected: "a number" })?;
        if !v.is_finite() {
            return Err(ConfigError::InvalidValue { key, reason: "must be finite" });
        }
        Ok(v)
    }

    /// Strictly positive integer or `TypeMismatch`/`InvalidValue` for `key`
    pub fn expect_positive_int(&self, key: &'static str) -> ConfigResult<u64> {
        let v = self.as_i64().ok_or(ConfigError::TypeMismatch { key, expected: "an integer" })?;
        if v <= 0 {
            return Err(ConfigError::InvalidValue { key, reason: "must be greater than zero" });
        }
        Ok(v as u64)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(String::from(v))
    }
}

/// A node with named, externally settable parameters
pub trait Configurable {
    /// Parameter keys, in display order
    fn param_keys(&self) -> &'static [&'static str];

    /// Current value of a parameter
    fn get_param(&self, key: &str) -> Option<ParamValue>;

    /// Override a parameter; on error the old value stays
    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()>;
}

/// Metadata shown next to a node's parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigItem {
    /// Unique path, e.g. `"/Engine Temp/curve"`
    pub path: String,
    /// Short human title
    pub title: String,
    /// Longer explanation
    pub description: String,
    /// Position in listings; lower first
    pub sort_order: u32,
}

impl ConfigItem {
    /// Item with only a path; title defaults to the path
    pub fn new(path: &str) -> Self {
        Self {
            path: String::from(path),
            title: String::from(path),
            description: String::new(),
            sort_order: u32::MAX,
        }
    }

    /// Set the title
    pub fn title(mut self, title: &str) -> Self {
        self.title = String::from(title);
        self
    }

    /// Set the description
    pub fn description(mut self, description: &str) -> Self {
        self.description = String::from(description);
        self
    }

    /// Set the listing position
    pub fn sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }
}

/// Shared handle to a configurable node
pub type SharedConfigurable = Rc<RefCell<dyn Configurable>>;

struct Entry {
    item: ConfigItem,
    node: SharedConfigurable,
}

/// Config path → configurable node
#[derive(Default)]
pub struct ConfigRegistry {
    entries: Vec<Entry>,
}

impl ConfigRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `node` under `item.path`
    pub fn register(&mut self, item: ConfigItem, node: SharedConfigurable) -> ConfigResult<()> {
        if self.entries.iter().any(|e| e.item.path == item.path) {
            return Err(ConfigError::DuplicatePath(item.path));
        }
        self.entries.push(Entry { item, node });
        Ok(())
    }

    /// Items sorted by `sort_order`, then path
    pub fn items(&self) -> Vec<&ConfigItem> {
        let mut items: Vec<&ConfigItem> = self.entries.iter().map(|e| &e.item).collect();
        items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.path.cmp(&b.path)));
        items
    }

    /// All current parameters of the node at `path`
    pub fn params(&self, path: &str) -> ConfigResult<Vec<(&'static str, ParamValue)>> {
        let node = self.lookup(path)?.borrow();
        let params = node
            .param_keys()
            .iter()
            .filter_map(|key| node.get_param(key).map(|value| (*key, value)))
            .collect();
        Ok(params)
    }

    /// One parameter of the node at `path`
    pub fn get(&self, path: &str, key: &str) -> ConfigResult<ParamValue> {
        self.lookup(path)?
            .borrow()
            .get_param(key)
            .ok_or_else(|| ConfigError::UnknownParam(String::from(key)))
    }

    /// Override one parameter of the node at `path`
    pub fn set(&mut self, path: &str, key: &str, value: &ParamValue) -> ConfigResult<()> {
        self.lookup(path)?.borrow_mut().set_param(key, value)?;
        log_debug!("config {}: {} updated", path, key);
        Ok(())
    }

    /// Registered path count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, path: &str) -> ConfigResult<&SharedConfigurable> {
        self.entries
            .iter()
            .find(|e| e.item.path == path)
            .map(|e| &e.node)
            .ok_or_else(|| ConfigError::UnknownPath(String::from(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain {
        gain: f32,
    }

    impl Configurable for Gain {
        fn param_keys(&self) -> &'static [&'static str] {
            &["gain"]
        }

        fn get_param(&self, key: &str) -> Option<ParamValue> {
            match key {
                "gain" => Some(self.gain.into()),
                _ => None,
            }
        }

        fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
            match key {
                "gain" => {
                    self.gain = value.expect_finite("gain")?;
                    Ok(())
                }
                _ => Err(ConfigError::UnknownParam(String::from(key))),
            }
        }
    }

    fn registry_with_gain() -> (ConfigRegistry, Rc<RefCell<Gain>>) {
        let node = Rc::new(RefCell::new(Gain { gain: 1.0 }));
        let mut registry = ConfigRegistry::new();
        registry.register(ConfigItem::new("/Tank/gain"), node.clone()).unwrap();
        (registry, node)
    }

    #[test]
    fn set_reaches_the_node() {
        let (mut registry, node) = registry_with_gain();
        registry.set("/Tank/gain", "gain", &ParamValue::Float(0.5)).unwrap();
        assert_eq!(node.borrow().gain, 0.5);
        assert_eq!(registry.get("/Tank/gain", "gain"), Ok(ParamValue::Float(0.5)));
    }

    #[test]
    fn integer_widens_to_float_parameter() {
        let (mut registry, node) = registry_with_gain();
        registry.set("/Tank/gain", "gain", &ParamValue::Int(2)).unwrap();
        assert_eq!(node.borrow().gain, 2.0);
    }

    #[test]
    fn rejected_value_keeps_previous() {
        let (mut registry, node) = registry_with_gain();
        let err = registry.set("/Tank/gain", "gain", &ParamValue::Text("loud".into()));
        assert!(matches!(err, Err(ConfigError::TypeMismatch { key: "gain", .. })));
        let err = registry.set("/Tank/gain", "gain", &ParamValue::Float(f32::NAN));
        assert!(matches!(err, Err(ConfigError::InvalidValue { key: "gain", .. })));
        assert_eq!(node.borrow().gain, 1.0);
    }

    #[test]
    fn unknown_path_and_duplicates_are_errors() {
        let (mut registry, node) = registry_with_gain();
        assert!(matches!(
            registry.get("/Nope", "gain"),
            Err(ConfigError::UnknownPath(_))
        ));
        assert!(matches!(
            registry.register(ConfigItem::new("/Tank/gain"), node),
            Err(ConfigError::DuplicatePath(_))
        ));
    }

    #[test]
    fn items_follow_sort_order() {
        let mut registry = ConfigRegistry::new();
        for (path, order) in [("/b", 2), ("/a", 5), ("/c", 1)] {
            let node = Rc::new(RefCell::new(Gain { gain: 1.0 }));
            registry.register(ConfigItem::new(path).sort_order(order), node).unwrap();
        }
        let paths: Vec<&str> = registry.items().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, ["/c", "/b", "/a"]);
    }
}

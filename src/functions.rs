//! Named objective functions with their interval extensions and search boxes.
//!
//! The built-in set covers the usual two-variable benchmarks. Each objective
//! is the natural interval extension of its formula: sound, and tight only
//! when every variable occurs once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::distribute::minimize_box;
use crate::error::{MinimizeError, Result};
use crate::interval::Interval;
use crate::types::{Evaluable, IntervalFn, SearchBox, SearchOptions, SearchResult};

/// An objective together with the box it is searched over.
#[derive(Clone)]
pub struct ObjectiveFunction {
    name: String,
    root: SearchBox,
    func: Arc<IntervalFn>,
    known_minimum: Option<f64>,
}

impl ObjectiveFunction {
    pub fn new(
        name: impl Into<String>,
        root: SearchBox,
        func: impl Fn(&SearchBox) -> Interval + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            root,
            func: Arc::new(func),
            known_minimum: None,
        }
    }

    /// Attach the known global minimum value, for reporting and tests.
    pub fn with_known_minimum(mut self, value: f64) -> Self {
        self.known_minimum = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> SearchBox {
        self.root
    }

    pub fn known_minimum(&self) -> Option<f64> {
        self.known_minimum
    }

    /// Partitioned search over this objective's root box.
    pub fn minimize(&self, options: &SearchOptions) -> Result<SearchResult> {
        minimize_box(self, self.root, options)
    }
}

impl Evaluable for ObjectiveFunction {
    #[inline]
    fn evaluate(&self, b: &SearchBox) -> Interval {
        (self.func)(b)
    }
}

impl fmt::Debug for ObjectiveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectiveFunction")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("known_minimum", &self.known_minimum)
            .finish_non_exhaustive()
    }
}

/// Objectives selectable by name, listed in name order.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, ObjectiveFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in benchmark.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for f in builtin_functions() {
            reg.register(f);
        }
        reg
    }

    /// Add or replace an objective under its own name.
    pub fn register(&mut self, f: ObjectiveFunction) {
        self.functions.insert(f.name.clone(), f);
    }

    /// Look up an objective by name.
    ///
    /// # Errors
    /// Returns `MinimizeError::UnknownFunction` with the valid choices.
    pub fn get(&self, name: &str) -> Result<&ObjectiveFunction> {
        self.functions
            .get(name)
            .ok_or_else(|| MinimizeError::UnknownFunction {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn square(half: f64) -> SearchBox {
    SearchBox::new(Interval::new(-half, half), Interval::new(-half, half))
}

// ──────────────────────────────────────────────────────────────────────────────
// Built-in benchmarks
// ──────────────────────────────────────────────────────────────────────────────

/// x² + y²; minimum 0 at (0, 0).
pub fn sphere(b: &SearchBox) -> Interval {
    b.x.sqr() + b.y.sqr()
}

/// (x + 2y − 7)² + (2x + y − 5)²; minimum 0 at (1, 3).
pub fn booth(b: &SearchBox) -> Interval {
    let (x, y) = (b.x, b.y);
    (x + 2.0 * y - 7.0).sqr() + (2.0 * x + y - 5.0).sqr()
}

/// (1.5 − x + xy)² + (2.25 − x + xy²)² + (2.625 − x + xy³)²; minimum 0 at (3, 0.5).
pub fn beale(b: &SearchBox) -> Interval {
    let (x, y) = (b.x, b.y);
    (1.5 - x + x * y).sqr() + (2.25 - x + x * y.sqr()).sqr() + (2.625 - x + x * y.powi(3)).sqr()
}

/// 0.26(x² + y²) − 0.48xy; minimum 0 at (0, 0).
pub fn matyas(b: &SearchBox) -> Interval {
    let (x, y) = (b.x, b.y);
    0.26 * (x.sqr() + y.sqr()) - 0.48 * (x * y)
}

/// 2x² − 1.05x⁴ + x⁶/6 + xy + y²; minimum 0 at (0, 0).
pub fn three_hump_camel(b: &SearchBox) -> Interval {
    let (x, y) = (b.x, b.y);
    2.0 * x.sqr() - 1.05 * x.powi(4) + (1.0 / 6.0) * x.powi(6) + x * y + y.sqr()
}

/// Goldstein–Price; minimum 3 at (0, −1).
pub fn goldstein_price(b: &SearchBox) -> Interval {
    let (x, y) = (b.x, b.y);
    let a = 1.0
        + (x + y + 1.0).sqr()
            * (19.0 - 14.0 * x + 3.0 * x.sqr() - 14.0 * y + 6.0 * (x * y) + 3.0 * y.sqr());
    let c = 30.0
        + (2.0 * x - 3.0 * y).sqr()
            * (18.0 - 32.0 * x + 12.0 * x.sqr() + 48.0 * y - 36.0 * (x * y) + 27.0 * y.sqr());
    a * c
}

/// (x² + y − 11)² + (x + y² − 7)²; minimum 0 at four points, one being (3, 2).
pub fn himmelblau(b: &SearchBox) -> Interval {
    let (x, y) = (b.x, b.y);
    (x.sqr() + y - 11.0).sqr() + (x + y.sqr() - 7.0).sqr()
}

/// Every built-in objective with its conventional search box.
pub fn builtin_functions() -> Vec<ObjectiveFunction> {
    vec![
        ObjectiveFunction::new("beale", square(4.5), beale).with_known_minimum(0.0),
        ObjectiveFunction::new("booth", square(10.0), booth).with_known_minimum(0.0),
        ObjectiveFunction::new("goldstein_price", square(2.0), goldstein_price)
            .with_known_minimum(3.0),
        ObjectiveFunction::new("himmelblau", square(5.0), himmelblau).with_known_minimum(0.0),
        ObjectiveFunction::new("matyas", square(10.0), matyas).with_known_minimum(0.0),
        ObjectiveFunction::new("sphere", square(2.0), sphere).with_known_minimum(0.0),
        ObjectiveFunction::new("three_hump_camel", square(5.0), three_hump_camel)
            .with_known_minimum(0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p_sphere(x: f64, y: f64) -> f64 {
        x * x + y * y
    }

    fn p_booth(x: f64, y: f64) -> f64 {
        (x + 2.0 * y - 7.0).powi(2) + (2.0 * x + y - 5.0).powi(2)
    }

    fn p_beale(x: f64, y: f64) -> f64 {
        (1.5 - x + x * y).powi(2) + (2.25 - x + x * y * y).powi(2) + (2.625 - x + x * y.powi(3)).powi(2)
    }

    fn p_matyas(x: f64, y: f64) -> f64 {
        0.26 * (x * x + y * y) - 0.48 * x * y
    }

    fn p_three_hump_camel(x: f64, y: f64) -> f64 {
        2.0 * x * x - 1.05 * x.powi(4) + x.powi(6) / 6.0 + x * y + y * y
    }

    fn p_goldstein_price(x: f64, y: f64) -> f64 {
        (1.0 + (x + y + 1.0).powi(2)
            * (19.0 - 14.0 * x + 3.0 * x * x - 14.0 * y + 6.0 * x * y + 3.0 * y * y))
            * (30.0
                + (2.0 * x - 3.0 * y).powi(2)
                    * (18.0 - 32.0 * x + 12.0 * x * x + 48.0 * y - 36.0 * x * y + 27.0 * y * y))
    }

    fn p_himmelblau(x: f64, y: f64) -> f64 {
        (x * x + y - 11.0).powi(2) + (x + y * y - 7.0).powi(2)
    }

    type PointFn = fn(f64, f64) -> f64;

    fn point_formulas() -> Vec<(&'static str, PointFn)> {
        vec![
            ("sphere", p_sphere as PointFn),
            ("booth", p_booth as PointFn),
            ("beale", p_beale as PointFn),
            ("matyas", p_matyas as PointFn),
            ("three_hump_camel", p_three_hump_camel as PointFn),
            ("goldstein_price", p_goldstein_price as PointFn),
            ("himmelblau", p_himmelblau as PointFn),
        ]
    }

    #[test]
    fn test_builtin_names_sorted() {
        let reg = FunctionRegistry::builtin();
        let names: Vec<&str> = reg.names().collect();
        assert_eq!(
            names,
            vec![
                "beale",
                "booth",
                "goldstein_price",
                "himmelblau",
                "matyas",
                "sphere",
                "three_hump_camel"
            ]
        );
        assert_eq!(reg.len(), 7);
    }

    #[test]
    fn test_unknown_name_lists_choices() {
        let reg = FunctionRegistry::builtin();
        match reg.get("rosenbrock") {
            Err(MinimizeError::UnknownFunction { name, available }) => {
                assert_eq!(name, "rosenbrock");
                assert!(available.contains(&"booth".to_string()));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_enclosures_contain_point_values() {
        let reg = FunctionRegistry::builtin();
        for (name, point) in point_formulas() {
            let f = reg.get(name).unwrap();
            // A few sub-boxes at different scales inside the root box.
            let root = f.root();
            let mut boxes = vec![root];
            boxes.extend(root.split());
            boxes.extend(root.split()[1].split());
            for b in boxes {
                let r = f.evaluate(&b);
                for i in 0..=10 {
                    for j in 0..=10 {
                        let px = b.x.lo + b.x.width() * i as f64 / 10.0;
                        let py = b.y.lo + b.y.width() * j as f64 / 10.0;
                        let v = point(px, py);
                        let slack = 1e-9 * v.abs().max(1.0);
                        assert!(
                            r.lo - slack <= v && v <= r.hi + slack,
                            "{}: f({}, {}) = {} outside {}",
                            name,
                            px,
                            py,
                            v,
                            r
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_known_minimum_values() {
        let reg = FunctionRegistry::builtin();
        for (name, point) in point_formulas() {
            let f = reg.get(name).unwrap();
            let at = match name {
                "booth" => (1.0, 3.0),
                "beale" => (3.0, 0.5),
                "goldstein_price" => (0.0, -1.0),
                "himmelblau" => (3.0, 2.0),
                _ => (0.0, 0.0),
            };
            assert_eq!(Some(point(at.0, at.1)), f.known_minimum(), "{}", name);
            assert!(f.root().contains(at.0, at.1));
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut reg = FunctionRegistry::new();
        assert!(reg.is_empty());
        reg.register(ObjectiveFunction::new("flat", square(1.0), |_: &SearchBox| {
            Interval::point(1.0)
        }));
        reg.register(ObjectiveFunction::new("flat", square(1.0), |_: &SearchBox| {
            Interval::point(2.0)
        }));
        assert_eq!(reg.len(), 1);
        let f = reg.get("flat").unwrap();
        assert_eq!(f.evaluate(&f.root()), Interval::point(2.0));
    }

    #[test]
    fn test_booth_minimizer_survives() {
        let reg = FunctionRegistry::builtin();
        let booth = reg.get("booth").unwrap();
        let result = booth.minimize(&SearchOptions::with_precision(0.1)).unwrap();
        assert!(result.minimizers.iter().any(|m| m.bounds.contains(1.0, 3.0)));
        let enclosure = result.minimum_enclosure().unwrap();
        assert!(enclosure.contains(0.0), "{}", enclosure);
    }
}

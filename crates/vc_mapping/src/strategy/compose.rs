use alloc::vec::Vec;

use super::Strategy;

// -----------------------------------------------------------------------------
// Stage

/// One argument of [`compose`]: a single strategy or a nested sequence.
#[derive(Clone, Debug)]
pub enum Stage {
    One(Strategy),
    Many(Vec<Stage>),
}

impl Stage {
    fn flatten_into(self, out: &mut Vec<Strategy>) {
        match self {
            Stage::One(strategy) => out.push(strategy),
            Stage::Many(stages) => {
                for stage in stages {
                    stage.flatten_into(out);
                }
            }
        }
    }
}

impl From<Strategy> for Stage {
    #[inline]
    fn from(value: Strategy) -> Self {
        Stage::One(value)
    }
}

impl From<Vec<Strategy>> for Stage {
    fn from(value: Vec<Strategy>) -> Self {
        Stage::Many(value.into_iter().map(Stage::One).collect())
    }
}

impl From<Vec<Stage>> for Stage {
    #[inline]
    fn from(value: Vec<Stage>) -> Self {
        Stage::Many(value)
    }
}

impl<const N: usize> From<[Strategy; N]> for Stage {
    fn from(value: [Strategy; N]) -> Self {
        Stage::Many(value.into_iter().map(Stage::One).collect())
    }
}

// -----------------------------------------------------------------------------
// compose

/// Composes strategies so that `compose([f, g, h])` applied to `v` is `h(g(f(v)))`.
///
/// Nested sequences are flattened first. An empty composition is the identity.
/// A failing stage stops the pipeline and its error is returned unchanged.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use vc_mapping::MappingRegistry;
/// use vc_mapping::strategy::{Stage, Strategy, compose};
/// use vc_mapping::value::FieldValue;
///
/// let add = |n: i64| Strategy::json(move |v: Value| Ok(json!(v.as_i64().unwrap() + n)));
/// let times_ten = Strategy::json(|v: Value| Ok(json!(v.as_i64().unwrap() * 10)));
///
/// let pipeline = compose([Stage::from(add(1)), Stage::from(vec![times_ten, add(2)])]);
/// let out = pipeline.apply(FieldValue::from(1), &MappingRegistry::new()).unwrap();
/// assert_eq!(out.as_json(), Some(&json!(22)));
/// ```
pub fn compose<I>(stages: I) -> Strategy
where
    I: IntoIterator,
    I::Item: Into<Stage>,
{
    let mut flat = Vec::new();
    for stage in stages {
        stage.into().flatten_into(&mut flat);
    }

    match flat.len() {
        0 => Strategy::identity(),
        1 => flat.remove(0),
        _ => Strategy::with_registry(move |value, registry| {
            flat.iter().try_fold(value, |acc, stage| stage.apply(acc, registry))
        }),
    }
}

/// Composes strategies and nested arrays of strategies, see [`compose`].
///
/// ```
/// use serde_json::{Value, json};
/// use vc_mapping::{MappingRegistry, compose};
/// use vc_mapping::strategy::Strategy;
/// use vc_mapping::value::FieldValue;
///
/// let push = |c: &'static str| {
///     Strategy::json(move |v: Value| Ok(json!(format!("{}{c}", v.as_str().unwrap()))))
/// };
///
/// let pipeline = compose!(push("a"), [push("b"), push("c")], push("d"));
/// let out = pipeline.apply(FieldValue::from(""), &MappingRegistry::new()).unwrap();
/// assert_eq!(out.as_json(), Some(&json!("abcd")));
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        $crate::strategy::Strategy::identity()
    };
    ($($stage:expr),+ $(,)?) => {
        $crate::strategy::compose([$($crate::strategy::Stage::from($stage)),+])
    };
}

// -----------------------------------------------------------------------------
// Tests

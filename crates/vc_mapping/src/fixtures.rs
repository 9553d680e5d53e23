//! Small mapped classes shared by the unit tests.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_json::Value;

use crate::MappingError;
use crate::info::FieldId;
use crate::polymorphic::Initializer;
use crate::registry::{ClassDeclaration, Mappable, MappingRegistry, ParentClass};
use crate::serde::Serializable;
use crate::strategy::Strategy;
use crate::table::PropertyEntry;
use crate::value::FieldValue;

/// A registry with every fixture below registered, except the broken ones.
pub fn registry() -> MappingRegistry {
    let mut registry = MappingRegistry::new();
    registry.register::<Point>().unwrap();
    registry.register::<Root>().unwrap();
    registry.register::<Child>().unwrap();
    registry.register::<Renamed>().unwrap();
    registry.register::<Shape>().unwrap();
    registry.register::<FigureXPrime>().unwrap();
    registry.register::<FigureY>().unwrap();
    registry.register::<Login>().unwrap();
    registry
}

pub fn init<T: Serializable + Default>() -> Initializer {
    Arc::new(|| Box::new(T::default()) as Box<dyn Serializable>)
}

fn read<T: Clone + Into<FieldValue>>(value: &Option<T>) -> Option<FieldValue> {
    value.clone().map(Into::into)
}

fn scale(mul: i64, div: i64) -> Strategy {
    Strategy::json(move |v| match v.as_i64() {
        Some(n) => Ok(Value::from(n * mul / div)),
        None => Ok(v),
    })
}

// -----------------------------------------------------------------------------
// Plain classes

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

impl Serializable for Point {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "x" => read(&self.x),
            "y" => read(&self.y),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("x") => self.x = value.decode()?,
            Some("y") => self.y = value.decode()?,
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Point {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field("x")?.field("y")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nested {
    pub sub_property: Option<String>,
}

impl Serializable for Nested {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "sub_property" => read(&self.sub_property),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("sub_property") => self.sub_property = value.decode()?,
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Nested {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field(PropertyEntry::builder("sub_property").key("sub"))?;
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Root {
    pub nested: Option<Nested>,
}

impl Root {
    pub fn new() -> Self {
        Self {
            nested: Some(Nested {
                sub_property: Some("a".to_string()),
            }),
        }
    }
}

impl Serializable for Root {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "nested" => self.nested.clone().map(FieldValue::object),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match (field.as_name(), value) {
            (Some("nested"), FieldValue::Json(Value::Null)) => self.nested = None,
            (Some("nested"), value) => self.nested = Some(value.into_object()?),
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Root {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.registry().register::<Nested>()?;
        class.field(PropertyEntry::builder("nested").hydrate(Strategy::object::<Nested>()))?;
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Shape {
    pub label: Option<String>,
    pub points: Vec<Point>,
    pub tags: Vec<String>,
}

impl Serializable for Shape {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "label" => read(&self.label),
            "points" => Some(FieldValue::array(
                self.points.iter().cloned().map(FieldValue::object),
            )),
            "tags" => Some(FieldValue::from(self.tags.clone())),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("label") => self.label = value.decode()?,
            Some("points") => {
                self.points = value
                    .into_items()?
                    .into_iter()
                    .map(FieldValue::into_object)
                    .collect::<Result<_, _>>()?;
            }
            Some("tags") => self.tags = value.decode()?,
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Shape {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        let upper = Strategy::json(|v| match v {
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            other => Ok(other),
        });
        class
            .field("label")?
            .field(PropertyEntry::builder("points").hydrate(Strategy::object::<Point>()))?
            .field(PropertyEntry::builder("tags").dehydrate(upper))?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Inheritance

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parent {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl Serializable for Parent {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "x" => read(&self.x),
            "y" => read(&self.y),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("x") => self.x = value.decode()?,
            Some("y") => self.y = value.decode()?,
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Parent {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field("x")?.field("y")?;
        Ok(())
    }
}

/// Redeclares `y`, scaled by ten on the wire, and adds `z`.
#[derive(Debug, Default, PartialEq)]
pub struct Child {
    pub parent: Parent,
    pub z: Option<i64>,
}

impl Child {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self {
            parent: Parent {
                x: Some(x),
                y: Some(y),
            },
            z: Some(z),
        }
    }
}

impl Serializable for Child {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "z" => read(&self.z),
            _ => self.parent.read_field(field),
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("z") => self.z = value.decode()?,
            _ => self.parent.write_field(field, value)?,
        }
        Ok(())
    }
}

impl Mappable for Child {
    fn parent() -> Option<ParentClass> {
        Some(ParentClass::of::<Parent>())
    }

    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        let y = PropertyEntry::builder("y")
            .hydrate(scale(1, 10))
            .dehydrate(scale(10, 1));
        class.field(y)?.field("z")?;
        Ok(())
    }
}

/// Repoints the external key `x` to its own field `w`.
#[derive(Debug, Default, PartialEq)]
pub struct Renamed {
    pub parent: Parent,
    pub w: Option<i64>,
}

impl Renamed {
    pub fn new(x: i64, y: i64, w: i64) -> Self {
        Self {
            parent: Parent {
                x: Some(x),
                y: Some(y),
            },
            w: Some(w),
        }
    }
}

impl Serializable for Renamed {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "w" => read(&self.w),
            _ => self.parent.read_field(field),
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("w") => self.w = value.decode()?,
            _ => self.parent.write_field(field, value)?,
        }
        Ok(())
    }
}

impl Mappable for Renamed {
    fn parent() -> Option<ParentClass> {
        Some(ParentClass::of::<Parent>())
    }

    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field(PropertyEntry::builder("w").key("x"))?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Polymorphism

#[derive(Debug, Default, PartialEq)]
pub struct Figure {
    pub kind: Option<String>,
    pub size: Option<i64>,
}

impl Serializable for Figure {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "kind" => read(&self.kind),
            "size" => read(&self.size),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("kind") => self.kind = value.decode()?,
            Some("size") => self.size = value.decode()?,
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Figure {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field("kind")?.field("size")?;
        Ok(())
    }
}

/// Selected by an explicit discriminant value.
#[derive(Debug, Default, PartialEq)]
pub struct FigureX {
    pub base: Figure,
    pub x_only: Option<bool>,
}

impl Serializable for FigureX {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "x_only" => read(&self.x_only),
            _ => self.base.read_field(field),
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("x_only") => self.x_only = value.decode()?,
            _ => self.base.write_field(field, value)?,
        }
        Ok(())
    }
}

impl Mappable for FigureX {
    fn parent() -> Option<ParentClass> {
        Some(ParentClass::of::<Figure>())
    }

    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field("x_only")?.discriminant_value("kind", "x")?;
        Ok(())
    }
}

/// A second level below [`FigureX`].
#[derive(Debug, Default, PartialEq)]
pub struct FigureXPrime {
    pub base: FigureX,
    pub variant: Option<String>,
}

impl Serializable for FigureXPrime {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "variant" => read(&self.variant),
            _ => self.base.read_field(field),
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("variant") => self.variant = value.decode()?,
            _ => self.base.write_field(field, value)?,
        }
        Ok(())
    }
}

impl Mappable for FigureXPrime {
    fn parent() -> Option<ParentClass> {
        Some(ParentClass::of::<FigureX>())
    }

    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class
            .field("variant")?
            .discriminant_value("variant", "prime")?;
        Ok(())
    }
}

/// Declares no fields; its discriminant value comes from its default.
#[derive(Debug, PartialEq)]
pub struct FigureY {
    pub base: Figure,
}

impl Default for FigureY {
    fn default() -> Self {
        Self {
            base: Figure {
                kind: Some("y".to_string()),
                size: None,
            },
        }
    }
}

impl Serializable for FigureY {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        self.base.read_field(field)
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        self.base.write_field(field, value)
    }
}

impl Mappable for FigureY {
    fn parent() -> Option<ParentClass> {
        Some(ParentClass::of::<Figure>())
    }

    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.discriminant("kind")?;
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Event {
    pub kind: Option<String>,
}

impl Serializable for Event {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "kind" => read(&self.kind),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("kind") => self.kind = value.decode()?,
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Event {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field(PropertyEntry::builder("kind").key("type"))?;
        class.resolver(|input| {
            Ok(match input.get("type").and_then(Value::as_str) {
                Some("login") => Some(Box::new(Login::default()) as Box<dyn Serializable>),
                _ => None,
            })
        });
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Login {
    pub base: Event,
    pub user: Option<String>,
}

impl Serializable for Login {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "user" => read(&self.user),
            _ => self.base.read_field(field),
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("user") => self.user = value.decode()?,
            _ => self.base.write_field(field, value)?,
        }
        Ok(())
    }
}

impl Mappable for Login {
    fn parent() -> Option<ParentClass> {
        Some(ParentClass::of::<Event>())
    }

    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field("user")?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Broken declarations

/// Declares a discriminant without a parent.
#[derive(Debug, Default)]
pub struct Orphan {
    pub tag: Option<String>,
}

impl Serializable for Orphan {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        match field.as_name()? {
            "tag" => read(&self.tag),
            _ => None,
        }
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        match field.as_name() {
            Some("tag") => self.tag = value.decode()?,
            _ => return Err(MappingError::unknown_field(self, field)),
        }
        Ok(())
    }
}

impl Mappable for Orphan {
    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class.field("tag")?.discriminant("tag")?;
        Ok(())
    }
}

/// Registers a field, a resolver and a switch case, then declares the first
/// field again.
#[derive(Debug, Default)]
pub struct Broken {
    pub parent: Parent,
}

impl Serializable for Broken {
    fn read_field(&self, field: &FieldId) -> Option<FieldValue> {
        self.parent.read_field(field)
    }

    fn write_field(&mut self, field: &FieldId, value: FieldValue) -> Result<(), MappingError> {
        self.parent.write_field(field, value)
    }
}

impl Mappable for Broken {
    fn parent() -> Option<ParentClass> {
        Some(ParentClass::of::<Parent>())
    }

    fn declare(class: &mut ClassDeclaration<'_, Self>) -> Result<(), MappingError> {
        class
            .field("q")?
            .resolver(|_| Ok(None))
            .discriminant_value("kind", "broken")?
            .field("q")?;
        Ok(())
    }
}

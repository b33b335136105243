//! Schema type definitions.
//!
//! Specs ([`KeySpec`], [`SectionSpec`]) are what callers write; schemas
//! ([`KeySchema`], [`SectionSchema`]) are what the registry holds after
//! checking them. A spec can be incomplete (no type tag); a schema cannot.

use std::fmt;

use serde::Serialize;

use crate::document::{Value, ValueKind};
use crate::schema::errors::SchemaError;

/// Dimensions of the robot whose controller consumes the `ctrl` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RobotModel {
    /// Controllable arm joints.
    pub arm_dofs: usize,
    /// Controllable gripper finger joints.
    pub gripper_dofs: usize,
}

impl RobotModel {
    /// Cartesian task space: 3 translational + 3 rotational axes.
    pub const TASK_SPACE_DIMS: usize = 6;

    /// Franka Panda: 7 arm joints, 2 finger joints.
    pub fn franka() -> Self {
        Self {
            arm_dofs: 7,
            gripper_dofs: 2,
        }
    }
}

impl Default for RobotModel {
    fn default() -> Self {
        Self::franka()
    }
}

/// Expected length of a vector key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorLen {
    Fixed(usize),
    ArmDofs,
    GripperDofs,
    TaskSpace,
}

impl VectorLen {
    pub fn expected(&self, robot: &RobotModel) -> usize {
        match self {
            VectorLen::Fixed(n) => *n,
            VectorLen::ArmDofs => robot.arm_dofs,
            VectorLen::GripperDofs => robot.gripper_dofs,
            VectorLen::TaskSpace => RobotModel::TASK_SPACE_DIMS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueType {
    Integer,
    /// Accepts integer literals too.
    Float,
    Bool,
    String,
    Enum {
        allowed: Vec<String>,
    },
    Vector {
        length: VectorLen,
    },
}

impl ValueType {
    /// Whether `value` has the right tag. Enum membership and vector length
    /// are checked separately so they can be reported as distinct findings.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value.kind()) {
            (ValueType::Integer, ValueKind::Integer) => true,
            (ValueType::Float, ValueKind::Integer | ValueKind::Float) => true,
            (ValueType::Bool, ValueKind::Bool) => true,
            (ValueType::String | ValueType::Enum { .. }, ValueKind::String) => true,
            (ValueType::Vector { .. }, ValueKind::Vector) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => f.write_str("integer"),
            ValueType::Float => f.write_str("float"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::String => f.write_str("string"),
            ValueType::Enum { allowed } => write!(f, "one of [{}]", allowed.join(", ")),
            ValueType::Vector { length } => match length {
                VectorLen::Fixed(n) => write!(f, "vector[{}]", n),
                VectorLen::ArmDofs => f.write_str("vector[arm_dofs]"),
                VectorLen::GripperDofs => f.write_str("vector[gripper_dofs]"),
                VectorLen::TaskSpace => f.write_str("vector[task_space]"),
            },
        }
    }
}

/// A checked key declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySchema {
    pub name: String,
    #[serde(flatten)]
    pub ty: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Reported as `MissingKey` when absent. Never set together with a default.
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl KeySchema {
    /// True if `x` falls outside the declared plausible range.
    pub fn out_of_range(&self, x: f64) -> bool {
        self.min.is_some_and(|min| x < min) || self.max.is_some_and(|max| x > max)
    }
}

/// Builder for a key declaration.
#[derive(Debug, Clone, Default)]
pub struct KeySpec {
    name: String,
    ty: Option<ValueType>,
    default: Option<Value>,
    required: bool,
    min: Option<f64>,
    max: Option<f64>,
    doc: Option<String>,
}

impl KeySpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn integer(mut self) -> Self {
        self.ty = Some(ValueType::Integer);
        self
    }

    pub fn float(mut self) -> Self {
        self.ty = Some(ValueType::Float);
        self
    }

    pub fn bool(mut self) -> Self {
        self.ty = Some(ValueType::Bool);
        self
    }

    pub fn string(mut self) -> Self {
        self.ty = Some(ValueType::String);
        self
    }

    pub fn one_of<S: AsRef<str>>(mut self, allowed: &[S]) -> Self {
        self.ty = Some(ValueType::Enum {
            allowed: allowed.iter().map(|s| s.as_ref().to_string()).collect(),
        });
        self
    }

    pub fn vector(mut self, length: VectorLen) -> Self {
        self.ty = Some(ValueType::Vector { length });
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Gains, noise magnitudes and scales: anything below zero is suspicious.
    pub fn non_negative(self) -> Self {
        self.min(0.0)
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_schema(self, section: &str) -> Result<KeySchema, SchemaError> {
        let ty = self.ty.ok_or_else(|| SchemaError::MissingType {
            section: section.to_string(),
            key: self.name.clone(),
        })?;
        if let ValueType::Enum { allowed } = &ty
            && allowed.is_empty()
        {
            return Err(SchemaError::EmptyEnum {
                section: section.to_string(),
                key: self.name,
            });
        }
        if let Some(default) = &self.default {
            let enum_ok = match (&ty, default) {
                (ValueType::Enum { allowed }, Value::Str(s)) => allowed.contains(s),
                _ => true,
            };
            if !ty.accepts(default) || !enum_ok {
                return Err(SchemaError::DefaultTypeMismatch {
                    section: section.to_string(),
                    key: self.name,
                    expected: ty.to_string(),
                    found: default.kind().to_string(),
                });
            }
            // robot-relative lengths are only known at validation time
            if let (ValueType::Vector { length: VectorLen::Fixed(n) }, Value::Vector(v)) = (&ty, default)
                && v.len() != *n
            {
                return Err(SchemaError::DefaultTypeMismatch {
                    section: section.to_string(),
                    key: self.name,
                    expected: ty.to_string(),
                    found: format!("vector of length {}", v.len()),
                });
            }
        }
        Ok(KeySchema {
            required: self.required && self.default.is_none(),
            name: self.name,
            ty,
            default: self.default,
            min: self.min,
            max: self.max,
            doc: self.doc,
        })
    }
}

/// A checked section declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSchema {
    pub name: String,
    pub keys: Vec<KeySchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionSchema>,
    /// Unknown keys inside an open section are not reported.
    pub open: bool,
    /// Enum key whose value names the subsection that is in effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

impl SectionSchema {
    pub fn key(&self, name: &str) -> Option<&KeySchema> {
        self.keys.iter().find(|k| k.name == name)
    }

    pub fn section(&self, name: &str) -> Option<&SectionSchema> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Subsection names that the selector key can pick between.
    pub fn branches(&self) -> Vec<&str> {
        let Some(ValueType::Enum { allowed }) = self
            .selector
            .as_deref()
            .and_then(|key| self.key(key))
            .map(|k| &k.ty)
        else {
            return Vec::new();
        };
        self.sections
            .iter()
            .map(|s| s.name.as_str())
            .filter(|name| allowed.iter().any(|a| a == name))
            .collect()
    }

    /// True if this section or anything below it declares a default.
    pub fn has_defaults(&self) -> bool {
        self.keys.iter().any(|k| k.default.is_some())
            || self.sections.iter().any(SectionSchema::has_defaults)
    }
}

/// Builder for a section declaration.
#[derive(Debug, Clone, Default)]
pub struct SectionSpec {
    keys: Vec<KeySpec>,
    sections: Vec<(String, SectionSpec)>,
    open: bool,
    selector: Option<String>,
}

impl SectionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: KeySpec) -> Self {
        self.keys.push(key);
        self
    }

    pub fn section(mut self, name: impl Into<String>, spec: SectionSpec) -> Self {
        self.sections.push((name.into(), spec));
        self
    }

    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn selected_by(mut self, key: impl Into<String>) -> Self {
        self.selector = Some(key.into());
        self
    }

    pub(crate) fn into_schema(self, name: &str, path: &str) -> Result<SectionSchema, SchemaError> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in self
            .keys
            .iter()
            .map(KeySpec::name)
            .chain(self.sections.iter().map(|(n, _)| n.as_str()))
        {
            if seen.contains(&entry) {
                return Err(SchemaError::DuplicateKey {
                    section: path.to_string(),
                    key: entry.to_string(),
                });
            }
            seen.push(entry);
        }

        let keys = self
            .keys
            .into_iter()
            .map(|k| k.into_schema(path))
            .collect::<Result<Vec<_>, _>>()?;

        let sections = self
            .sections
            .into_iter()
            .map(|(child, spec)| {
                let child_path = format!("{}.{}", path, child);
                spec.into_schema(&child, &child_path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(selector) = &self.selector {
            let is_enum = keys
                .iter()
                .any(|k| &k.name == selector && matches!(k.ty, ValueType::Enum { .. }));
            if !is_enum {
                return Err(SchemaError::InvalidSelector {
                    section: path.to_string(),
                    key: selector.clone(),
                });
            }
        }

        Ok(SectionSchema {
            name: name.to_string(),
            keys,
            sections,
            open: self.open,
            selector: self.selector,
        })
    }
}

use crate::document::{Mapping, Value};
use crate::resolve::ResolvedConfig;
use crate::schema::{KeySchema, RobotModel, SchemaRegistry, SectionSchema, TASK_SECTION, ValueType};
use crate::validate::errors::ValidationError;
use crate::validate::types::{Finding, FindingKind, ValidationReport};

/// Check a resolved config against the registry.
///
/// The whole tree is walked before deciding, so a failing report lists every
/// problem at once. Warnings alone never fail validation.
pub fn validate(
    config: &ResolvedConfig,
    registry: &SchemaRegistry,
    robot: &RobotModel,
) -> Result<ValidationReport, ValidationError> {
    let mut checker = Checker {
        robot,
        findings: Vec::new(),
    };
    checker.check_root(config.tree(), registry);

    let report = ValidationReport {
        findings: checker.findings,
    };
    if report.has_fatal() {
        return Err(ValidationError::Failed { report });
    }
    Ok(report)
}

struct Checker<'a> {
    robot: &'a RobotModel,
    findings: Vec<Finding>,
}

impl Checker<'_> {
    fn report(&mut self, path: impl Into<String>, kind: FindingKind) {
        self.findings.push(Finding::new(path, kind));
    }

    fn check_root(&mut self, tree: &Mapping, registry: &SchemaRegistry) {
        let task = registry.lookup(TASK_SECTION).ok();

        for (key, value) in tree.iter() {
            if let Some(schema) = task.and_then(|t| t.key(key)) {
                self.check_key(key.to_string(), schema, value);
                continue;
            }
            match registry.lookup(key) {
                Ok(section) if key != TASK_SECTION => match value {
                    Value::Mapping(mapping) => self.check_section(key, section, mapping, true),
                    other => self.report(key, mismatch("mapping", other)),
                },
                _ => self.report(key, FindingKind::UnknownKey),
            }
        }

        if let Some(task) = task {
            self.check_required_keys("", task, tree);
        }
        for section in registry.sections() {
            if section.name != TASK_SECTION
                && !tree.contains_key(&section.name)
                && requires_anything(section)
            {
                self.report(section.name.clone(), FindingKind::MissingKey);
            }
        }
    }

    fn check_section(&mut self, path: &str, schema: &SectionSchema, mapping: &Mapping, enforce: bool) {
        if schema.open {
            return;
        }
        let branches = schema.branches();
        let selected = selected_branch(schema, mapping, &branches);

        for (key, value) in mapping.iter() {
            let child_path = join(path, key);
            if let Some(key_schema) = schema.key(key) {
                self.check_key(child_path, key_schema, value);
            } else if let Some(child) = schema.section(key) {
                // unselected branches are still type-checked, never required
                let enforce_child = enforce && (!branches.contains(&key) || selected == Some(key));
                match value {
                    Value::Mapping(inner) => self.check_section(&child_path, child, inner, enforce_child),
                    other => self.report(child_path, mismatch("mapping", other)),
                }
            } else {
                self.report(child_path, FindingKind::UnknownKey);
            }
        }

        if !enforce {
            return;
        }
        self.check_required_keys(path, schema, mapping);
        for child in &schema.sections {
            let name = child.name.as_str();
            let in_effect = !branches.contains(&name) || selected == Some(name);
            if in_effect && !mapping.contains_key(name) && requires_anything(child) {
                self.report(join(path, name), FindingKind::MissingKey);
            }
        }
    }

    fn check_required_keys(&mut self, path: &str, schema: &SectionSchema, mapping: &Mapping) {
        for key in &schema.keys {
            if key.required && !mapping.contains_key(&key.name) {
                self.report(join(path, &key.name), FindingKind::MissingKey);
            }
        }
    }

    fn check_key(&mut self, path: String, schema: &KeySchema, value: &Value) {
        if !schema.ty.accepts(value) {
            let kind = mismatch(&schema.ty.to_string(), value);
            self.report(path, kind);
            return;
        }
        match (&schema.ty, value) {
            (ValueType::Enum { allowed }, Value::Str(s)) => {
                if !allowed.iter().any(|a| a == s) {
                    self.report(
                        path,
                        FindingKind::InvalidEnum {
                            value: s.clone(),
                            allowed: allowed.clone(),
                        },
                    );
                }
            }
            (ValueType::Vector { length }, Value::Vector(items)) => {
                let expected = length.expected(self.robot);
                if items.len() != expected {
                    self.report(
                        path.clone(),
                        FindingKind::LengthMismatch {
                            expected,
                            actual: items.len(),
                        },
                    );
                }
                for (i, x) in items.iter().enumerate() {
                    self.check_range(format!("{}[{}]", path, i), schema, *x);
                }
            }
            (ValueType::Integer | ValueType::Float, number) => {
                if let Some(x) = number.as_f64() {
                    self.check_range(path, schema, x);
                }
            }
            _ => {}
        }
    }

    fn check_range(&mut self, path: String, schema: &KeySchema, x: f64) {
        if schema.out_of_range(x) {
            self.report(
                path,
                FindingKind::RangeWarning {
                    value: x,
                    min: schema.min,
                    max: schema.max,
                },
            );
        }
    }
}

fn selected_branch<'s>(schema: &SectionSchema, mapping: &'s Mapping, branches: &[&str]) -> Option<&'s str> {
    let selector = schema.selector.as_deref()?;
    mapping
        .get(selector)
        .and_then(Value::as_str)
        .filter(|name| branches.contains(name))
}

/// A section whose absence must be reported: it declares a required key
/// somewhere outside its selectable branches.
fn requires_anything(section: &SectionSchema) -> bool {
    let branches = section.branches();
    section.keys.iter().any(|k| k.required)
        || section
            .sections
            .iter()
            .filter(|child| !branches.contains(&child.name.as_str()))
            .any(requires_anything)
}

fn mismatch(expected: &str, found: &Value) -> FindingKind {
    FindingKind::TypeMismatch {
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

//! Generic required-field validation.
//!
//! Each action declares its requirements as a static slice of
//! [`RequiredField`] entries; one walker evaluates every spec. The walk is
//! spec-driven, so fields the spec does not name are never inspected.

use crate::errors::{ConnectorError, CustomResult};

/// Presence of a single request field as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Missing,
    Present,
}

/// One entry of an action's declarative required-field spec. `name` is the
/// path reported to the caller; `probe` inspects the parameter set.
pub struct RequiredField<P> {
    pub name: &'static str,
    pub probe: fn(&P) -> FieldState,
}

/// Absent and empty-string values are missing. Zero and `false` are values a
/// probe must report as present.
pub fn string_field(value: Option<&str>) -> FieldState {
    match value {
        Some(v) if !v.is_empty() => FieldState::Present,
        _ => FieldState::Missing,
    }
}

/// Walks the spec in declaration order and reports every missing field at
/// once, so a caller can fix all of them from a single error.
pub fn validate_params<P>(
    spec: &[RequiredField<P>],
    params: &P,
) -> CustomResult<(), ConnectorError> {
    let field_names = spec
        .iter()
        .filter(|field| (field.probe)(params) == FieldState::Missing)
        .map(|field| field.name)
        .collect::<Vec<_>>();
    if field_names.is_empty() {
        Ok(())
    } else {
        Err(ConnectorError::MissingRequiredFields { field_names }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        name: Option<String>,
        retries: Option<u32>,
        active: Option<bool>,
    }

    const SPEC: &[RequiredField<Probe>] = &[
        RequiredField {
            name: "name",
            probe: |p| string_field(p.name.as_deref()),
        },
        RequiredField {
            name: "retries",
            probe: |p| match p.retries {
                Some(_) => FieldState::Present,
                None => FieldState::Missing,
            },
        },
        RequiredField {
            name: "active",
            probe: |p| match p.active {
                Some(_) => FieldState::Present,
                None => FieldState::Missing,
            },
        },
    ];

    #[test]
    fn collects_every_missing_field_in_declaration_order() {
        let result = validate_params(SPEC, &Probe::default());
        let error = result.unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::MissingRequiredFields {
                field_names: vec!["name", "retries", "active"],
            }
        );
    }

    #[test]
    fn zero_and_false_values_are_present() {
        let params = Probe {
            name: Some("probe".to_string()),
            retries: Some(0),
            active: Some(false),
        };
        assert!(validate_params(SPEC, &params).is_ok());
    }

    #[test]
    fn empty_string_is_missing() {
        let params = Probe {
            name: Some(String::new()),
            retries: Some(3),
            active: Some(true),
        };
        let error = validate_params(SPEC, &params).unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::MissingRequiredFields {
                field_names: vec!["name"],
            }
        );
    }
}

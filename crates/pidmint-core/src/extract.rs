//! Content extraction through the host's template resolver

use thiserror::Error;

use crate::field::{ContentField, FieldSpec};

/// Template engine failure. Fatal for the run; never translated.
#[derive(Debug, Clone, Error)]
#[error("template resolution failed for `{expression}`: {message}")]
pub struct ResolutionError {
    pub expression: String,
    pub message: String,
}

/// The host's template-substitution engine.
///
/// An expression the engine cannot resolve comes back unchanged; the
/// extractor treats such a result as "unresolved" and moves on to the next
/// expression.
pub trait TemplateResolver {
    fn resolve(&self, expression: &str) -> Result<String, ResolutionError>;
}

/// Resolve the configured field specs into the ordered field list.
///
/// For each spec the first expression whose result is non-blank and differs
/// from the literal expression wins, falling back to the spec's default.
/// Specs that end up without a value are dropped. When a repeatable field's
/// value contains `separator`, it expands to one field per non-blank
/// segment, in left-to-right order.
pub fn extract_fields(
    specs: &[FieldSpec],
    separator: &str,
    resolver: &dyn TemplateResolver,
) -> Result<Vec<ContentField>, ResolutionError> {
    let mut fields = Vec::new();

    for spec in specs {
        let mut value: Option<String> = None;
        for expression in &spec.data {
            let result = resolver.resolve(expression)?;
            if !result.trim().is_empty() && result != *expression {
                value = Some(result);
                break;
            }
        }

        let value = value.or_else(|| {
            spec.default
                .clone()
                .filter(|default| !default.trim().is_empty())
        });
        let Some(value) = value else {
            continue;
        };

        if spec.repeatable && value.contains(separator) {
            for segment in value.split(separator) {
                if !segment.trim().is_empty() {
                    fields.push(ContentField::new(&spec.name, segment));
                }
            }
        } else {
            fields.push(ContentField::new(&spec.name, &value));
        }
    }

    Ok(fields)
}

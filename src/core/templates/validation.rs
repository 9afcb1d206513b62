//! Template validation: disk format and conversion to `Template`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Template, TemplatesError};

/// JSON structure on disk.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TemplatesFile {
    pub(super) templates: Vec<TemplateEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TemplateEntry {
    pub name: String,
    pub description: String,
    pub prompt_prefix: String,
}

impl TemplatesFile {
    pub(super) fn from_templates(templates: &[Template]) -> Self {
        Self {
            templates: templates
                .iter()
                .map(|t| TemplateEntry {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    prompt_prefix: t.prompt_prefix.clone(),
                })
                .collect(),
        }
    }
}

/// Validate file entries and convert to a template list.
/// `builtin_names` must be lowercase.
pub(crate) fn validate_and_convert(
    file: TemplatesFile,
    builtin_names: &[String],
) -> Result<Vec<Template>, TemplatesError> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(file.templates.len());

    for (i, entry) in file.templates.into_iter().enumerate() {
        if entry.name.is_empty() {
            return Err(TemplatesError::Validation(format!(
                "Template at index {}: name cannot be empty",
                i
            )));
        }
        if !entry
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplatesError::Validation(format!(
                "Template '{}': name must contain only letters, numbers, hyphens, and underscores",
                entry.name
            )));
        }
        let name_lower = entry.name.to_lowercase();

        if builtin_names.contains(&name_lower) {
            return Err(TemplatesError::Validation(format!(
                "Template '{}': name conflicts with built-in template",
                entry.name
            )));
        }

        if !seen.insert(name_lower) {
            return Err(TemplatesError::Validation(format!(
                "Duplicate template name '{}'",
                entry.name
            )));
        }

        if entry.description.trim().is_empty() {
            return Err(TemplatesError::Validation(format!(
                "Template '{}': description cannot be empty",
                entry.name
            )));
        }
        if entry.prompt_prefix.trim().is_empty() {
            return Err(TemplatesError::Validation(format!(
                "Template '{}': prompt_prefix cannot be empty",
                entry.name
            )));
        }

        result.push(Template {
            name: entry.name,
            description: entry.description,
            prompt_prefix: entry.prompt_prefix,
        });
    }

    Ok(result)
}

//! Prompt templates: built-ins embedded from `config/builtin-templates.json`
//! plus user-defined templates in `templates.json` (config directory).

mod validation;

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::util::filter_by_query;

/// A prompt template. `prompt_prefix` may contain a `{text}` placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub prompt_prefix: String,
}

/// A template tagged with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub template: Template,
    pub is_custom: bool,
}

/// Error loading or saving templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplatesError {
    #[error("Failed to read templates file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No template named '{0}'")]
    NotFound(String),
    #[error("No config directory available")]
    NoConfigDir,
}

impl TemplatesError {
    /// User-friendly message when falling back to built-in templates only.
    pub fn safe_mode_message(&self) -> String {
        let detail = match self {
            TemplatesError::Io(_) => "could not read file".to_string(),
            TemplatesError::Json(_) => "invalid JSON".to_string(),
            other => other.to_string(),
        };
        format!("templates.json: {}; using built-in templates only", detail)
    }
}

fn load_builtin_templates() -> Vec<Template> {
    let json = include_str!("../../../config/builtin-templates.json");
    serde_json::from_str(json).expect("builtin-templates.json is validated by build.rs")
}

static BUILTIN_TEMPLATES: OnceLock<Vec<Template>> = OnceLock::new();

/// Built-in templates, parsed on first access.
pub fn builtin_templates() -> &'static [Template] {
    BUILTIN_TEMPLATES.get_or_init(load_builtin_templates)
}

fn builtin_names() -> Vec<String> {
    builtin_templates()
        .iter()
        .map(|t| t.name.to_lowercase())
        .collect()
}

/// Load custom templates from `path`. Returns an empty list when the file is absent.
pub fn load_custom(path: &Path) -> Result<Vec<Template>, TemplatesError> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let content = fs::read_to_string(path)?;
    let file: validation::TemplatesFile = serde_json::from_str(&content)?;
    validation::validate_and_convert(file, &builtin_names())
}

/// Save custom templates to `path`, creating the parent directory if needed.
pub fn save_custom(path: &Path, templates: &[Template]) -> Result<(), TemplatesError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = validation::TemplatesFile::from_templates(templates);
    let content = serde_json::to_string_pretty(&file)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Validate and append a custom template.
pub fn add_custom(path: &Path, template: Template) -> Result<(), TemplatesError> {
    let mut templates = load_custom(path)?;
    templates.push(template);
    let checked = validation::validate_and_convert(
        validation::TemplatesFile::from_templates(&templates),
        &builtin_names(),
    )?;
    save_custom(path, &checked)
}

/// Remove a custom template by name (case-insensitive).
pub fn remove_custom(path: &Path, name: &str) -> Result<(), TemplatesError> {
    let mut templates = load_custom(path)?;
    let before = templates.len();
    templates.retain(|t| !t.name.eq_ignore_ascii_case(name));
    if templates.len() == before {
        return Err(TemplatesError::NotFound(name.to_string()));
    }
    save_custom(path, &templates)
}

/// Merge built-in and custom templates. Built-in first (sorted), then custom (sorted).
pub fn resolve(custom: Vec<Template>) -> Vec<ResolvedTemplate> {
    let by_name = |a: &ResolvedTemplate, b: &ResolvedTemplate| {
        a.template
            .name
            .to_lowercase()
            .cmp(&b.template.name.to_lowercase())
    };

    let mut builtin: Vec<ResolvedTemplate> = builtin_templates()
        .iter()
        .cloned()
        .map(|template| ResolvedTemplate {
            template,
            is_custom: false,
        })
        .collect();
    builtin.sort_by(by_name);

    let mut custom: Vec<ResolvedTemplate> = custom
        .into_iter()
        .map(|template| ResolvedTemplate {
            template,
            is_custom: true,
        })
        .collect();
    custom.sort_by(by_name);

    builtin.append(&mut custom);
    builtin
}

/// Find a template by name (case-insensitive).
pub fn find<'a>(templates: &'a [ResolvedTemplate], name: &str) -> Option<&'a ResolvedTemplate> {
    templates
        .iter()
        .find(|t| t.template.name.eq_ignore_ascii_case(name.trim()))
}

/// Filter templates by query on name or description.
pub fn filter<'a>(templates: &'a [ResolvedTemplate], query: &str) -> Vec<&'a ResolvedTemplate> {
    filter_by_query(templates, query, |t| {
        (t.template.name.as_str(), t.template.description.as_str())
    })
}

/// Build the chat prompt: `{text}` in the prefix is replaced, otherwise the
/// text is appended after a blank line.
pub fn compose_prompt(prefix: &str, text: &str) -> String {
    let prefix = prefix.trim();
    let text = text.trim();
    if prefix.contains("{text}") {
        prefix.replace("{text}", text)
    } else if text.is_empty() {
        prefix.to_string()
    } else {
        format!("{}\n\n{}", prefix, text)
    }
}

#[cfg(test)]
mod tests;

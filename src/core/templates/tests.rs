use super::validation::{TemplateEntry, TemplatesFile, validate_and_convert};
use super::*;

fn builtin() -> Vec<String> {
    vec!["email".to_string(), "blog-post".to_string()]
}

fn entry(name: &str) -> TemplateEntry {
    TemplateEntry {
        name: name.to_string(),
        description: "x".to_string(),
        prompt_prefix: "y".to_string(),
    }
}

fn template(name: &str) -> Template {
    Template {
        name: name.to_string(),
        description: format!("{} description", name),
        prompt_prefix: "Rewrite as a haiku:".to_string(),
    }
}

#[test]
fn builtins_are_embedded() {
    let names: Vec<_> = builtin_templates().iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"blog-post"));
    assert!(names.contains(&"email"));
    assert!(names.contains(&"social-media"));
}

#[test]
fn validate_rejects_duplicate_names_case_insensitive() {
    let file = TemplatesFile {
        templates: vec![entry("Foo"), entry("foo")],
    };
    let err = validate_and_convert(file, &builtin()).unwrap_err();
    assert!(err.to_string().contains("Duplicate"));
}

#[test]
fn validate_rejects_builtin_collision() {
    let file = TemplatesFile {
        templates: vec![entry("EMAIL")],
    };
    let err = validate_and_convert(file, &builtin()).unwrap_err();
    assert!(err.to_string().contains("built-in"));
}

#[test]
fn validate_rejects_bad_names() {
    for name in ["", "my template", "cmd!"] {
        let file = TemplatesFile {
            templates: vec![entry(name)],
        };
        assert!(
            validate_and_convert(file, &builtin()).is_err(),
            "accepted {:?}",
            name
        );
    }
}

#[test]
fn validate_rejects_empty_prefix() {
    let file = TemplatesFile {
        templates: vec![TemplateEntry {
            name: "ok".to_string(),
            description: "d".to_string(),
            prompt_prefix: "   ".to_string(),
        }],
    };
    let err = validate_and_convert(file, &builtin()).unwrap_err();
    assert!(err.to_string().contains("prompt_prefix"));
}

#[test]
fn validate_accepts_hyphens_and_underscores() {
    let file = TemplatesFile {
        templates: vec![entry("cover-letter"), entry("press_release")],
    };
    let out = validate_and_convert(file, &builtin()).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name, "cover-letter");
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let out = load_custom(&dir.path().join("templates.json")).unwrap();
    assert!(out.is_empty());
}

#[test]
fn add_and_remove_custom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg").join("templates.json");

    add_custom(&path, template("haiku")).unwrap();
    add_custom(&path, template("limerick")).unwrap();
    let loaded = load_custom(&path).unwrap();
    assert_eq!(loaded, vec![template("haiku"), template("limerick")]);

    let err = add_custom(&path, template("Haiku")).unwrap_err();
    assert!(err.to_string().contains("Duplicate"));
    let err = add_custom(&path, template("email")).unwrap_err();
    assert!(err.to_string().contains("built-in"));

    remove_custom(&path, "HAIKU").unwrap();
    assert_eq!(load_custom(&path).unwrap(), vec![template("limerick")]);
    assert!(matches!(
        remove_custom(&path, "haiku"),
        Err(TemplatesError::NotFound(_))
    ));
}

#[test]
fn invalid_file_reports_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("templates.json");
    std::fs::write(&path, "[oops").unwrap();
    let err = load_custom(&path).unwrap_err();
    assert!(matches!(err, TemplatesError::Json(_)));
    assert!(err.safe_mode_message().contains("built-in templates only"));
}

#[test]
fn resolve_orders_builtin_then_custom() {
    let all = resolve(vec![template("zeta"), template("alpha")]);
    let first_custom = all.iter().position(|t| t.is_custom).unwrap();
    assert!(all[..first_custom].iter().all(|t| !t.is_custom));
    assert_eq!(all[first_custom].template.name, "alpha");
    assert_eq!(all.last().unwrap().template.name, "zeta");
    assert_eq!(all[0].template.name, "blog-post");
}

#[test]
fn find_and_filter() {
    let all = resolve(vec![template("haiku")]);
    assert!(find(&all, "HAIKU").unwrap().is_custom);
    assert!(find(&all, "sonnet").is_none());
    let social = filter(&all, "social platforms");
    assert_eq!(social.len(), 1);
    assert_eq!(social[0].template.name, "social-media");
    assert_eq!(filter(&all, "").len(), all.len());
}

#[test]
fn compose_prompt_appends_or_substitutes() {
    assert_eq!(
        compose_prompt("Write an email.", " meeting moved to 3pm "),
        "Write an email.\n\nmeeting moved to 3pm"
    );
    assert_eq!(
        compose_prompt("Translate '{text}' into pirate speak.", "hello"),
        "Translate 'hello' into pirate speak."
    );
    assert_eq!(compose_prompt("Tell me a joke.", ""), "Tell me a joke.");
}

//! Embedded-template preprocessing for fixture files and sanitizers.
//!
//! Fixture files may contain `{{ ... }}` expressions and `{% ... %}` blocks;
//! they are rendered with tera before the YAML is parsed. Tera's built-in
//! functions are available (`now()`, `get_env(name="...")`, `range(...)`).

use anyhow::{Context as _, Result};
use fixtree_core::Record;
use tera::{Context, Tera};

/// Render a template with an empty context.
pub fn render(text: &str) -> Result<String> {
    Tera::one_off(text, &Context::new(), false).context("render template")
}

/// Render a template with the columns of `record` as variables.
pub fn render_with_record(template: &str, record: &Record) -> Result<String> {
    let context = Context::from_serialize(record).context("build template context")?;
    Tera::one_off(template, &context, false)
        .with_context(|| format!("render template: {template}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtree_core::Value;

    #[test]
    fn plain_text_is_unchanged() {
        let yaml = "users:\n- name: alice\n";
        assert_eq!(render(yaml).unwrap(), yaml);
    }

    #[test]
    fn expressions_are_evaluated() {
        let rendered = render("count: {{ 2 + 3 }}\n{% for i in range(end=2) %}- {{ i }}\n{% endfor %}")
            .unwrap();
        assert_eq!(rendered, "count: 5\n- 0\n- 1\n");
    }

    #[test]
    fn record_columns_are_in_context() {
        let record = Record::from([
            ("id".to_string(), Value::from(7)),
            ("email".to_string(), Value::from("real@corp.com")),
        ]);
        let rendered = render_with_record("user{{ id }}@example.com", &record).unwrap();
        assert_eq!(rendered, "user7@example.com");
    }

    #[test]
    fn undefined_variable_errors() {
        let err = render_with_record("{{ missing }}", &Record::new()).unwrap_err();
        assert!(err.to_string().contains("render template"));
    }
}

use super::assemble::{ENTRY_POINT, INCLUDE_DIRECTIVE};
use super::generation::Parts;
use super::store::KeywordTemplate;

pub type Values = ahash::HashMap<String, String>;

/// How parameter values are spliced into a template.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionMode {
    /// Parameters are replaced one after another in declaration order, each pass
    /// running over the output of the previous one. A value that contains the
    /// placeholder of a later parameter is therefore expanded as well.
    #[default]
    Sequential,
    /// Placeholders of the template text are replaced once; values are never rescanned.
    SinglePass,
}

pub fn substitute(template: &KeywordTemplate, values: &Values, tag: &str) -> Parts {
    substitute_with(template, values, tag, SubstitutionMode::default())
}

pub fn substitute_with(
    template: &KeywordTemplate,
    values: &Values,
    tag: &str,
    mode: SubstitutionMode,
) -> Parts {
    let text = apply_params(template, values, mode);

    let mut parts = Parts::default();
    if text.contains(ENTRY_POINT) {
        tracing::warn!(tag, "custom keyword template contains an entry point");
        parts.body.push(format!(
            "// ({tag}) error: user-defined snippet declares its own `{ENTRY_POINT}`; nothing inserted"
        ));
        return parts;
    }

    parts
        .body
        .push(format!("// ({tag}) User-defined snippet (with parameter substitution):"));
    for line in text.lines() {
        match line.trim().strip_prefix(INCLUDE_DIRECTIVE) {
            Some(reference) => parts.includes.push(reference.trim().to_owned()),
            None => parts.body.push(line.to_owned()),
        }
    }
    parts
}

/// Replaces the `{param}` placeholders of the template's own parameters.
///
/// Values missing from `values` fall back to the stored defaults. Placeholders
/// naming anything else are kept as is.
pub fn apply_params(template: &KeywordTemplate, values: &Values, mode: SubstitutionMode) -> String {
    let resolve = |name: &str| {
        let param = template.params.iter().find(|p| p.name == name)?;
        Some(values.get(name).unwrap_or(&param.default).as_str())
    };

    match mode {
        SubstitutionMode::Sequential => {
            let mut text = template.snippet.clone();
            for param in &template.params {
                if let Some(value) = resolve(&param.name) {
                    text = text.replace(&format!("{{{}}}", param.name), value);
                }
            }
            text
        }
        SubstitutionMode::SinglePass => render_placeholders(&template.snippet, resolve),
    }
}

/// Replaces every `{key}` for which `lookup` has a value, scanning the text once.
///
/// Only identifier-like keys are considered, so code braces such as
/// `struct S { int x; };` pass through untouched.
pub fn render_placeholders<'v, F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'v str>,
{
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let key_len = after
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let key = &after[..key_len];

        if !key.is_empty()
            && after[key_len..].starts_with('}')
            && let Some(value) = lookup(key)
        {
            result.push_str(value);
            rest = &after[key_len + 1..];
        } else {
            result.push('{');
            rest = after;
        }
    }

    result.push_str(rest);
    result
}

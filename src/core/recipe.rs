use ahash::HashMap;
use anyhow::Result;

use super::dictionary::Request;
use super::generation::{GenerationContext, Parts};
use super::substitute::render_placeholders;

/// Declarative description of a built-in keyword example.
///
/// Line templates and labels reference answers by `{key}`. Besides the prompt
/// keys, `{kw}` (the keyword), `{tag}` (the occurrence tag) and `{var}` (the
/// name bound by [`Effect::Declare`]) are available.
pub struct Recipe {
    /// Header comment of the body, rendered after `// (<tag>) `.
    pub title: &'static str,
    pub prompts: &'static [Prompt],
    pub effects: &'static [Effect],
    pub includes: &'static [&'static str],
    pub top: &'static [Line],
    pub body: &'static [Line],
}

pub struct Prompt {
    pub key: &'static str,
    pub label: &'static str,
    pub default: Fallback,
}

pub enum Fallback {
    Text(&'static str),
    /// Looked up by the keyword being generated.
    PerKeyword(&'static [(&'static str, &'static str)], &'static str),
    /// `with` rendered against `{last_var}` once any variable is declared.
    LastVar {
        with: &'static str,
        otherwise: &'static str,
    },
    /// First undeclared name derived from the base.
    FreshVar(&'static str),
}

impl Fallback {
    pub fn resolve(&self, keyword: &str, state: &GenerationContext) -> String {
        match self {
            Self::Text(text) => (*text).to_owned(),
            Self::PerKeyword(table, otherwise) => table
                .iter()
                .find(|(kw, _)| *kw == keyword)
                .map(|(_, value)| *value)
                .unwrap_or(*otherwise)
                .to_owned(),
            Self::LastVar { with, otherwise } => match &state.last_var {
                Some(last_var) => render_placeholders(with, |key| {
                    (key == "last_var").then_some(last_var.as_str())
                }),
                None => (*otherwise).to_owned(),
            },
            Self::FreshVar(base) => state.unique_name(base),
        }
    }
}

pub enum Effect {
    /// Declares a variable of type `ty` named after the rendered `name` and
    /// binds the collision-free name to `{var}`.
    Declare {
        ty: &'static str,
        name: &'static str,
    },
    /// Registers the variable of the free-form declaration under the given key.
    Track(&'static str),
}

pub enum Line {
    Text(&'static str),
    /// One line per comma-separated item of the answer under the first key,
    /// with the item bound to `{item}`.
    Each(&'static str, &'static str),
}

impl Recipe {
    pub fn generate(&self, req: &mut Request<'_>) -> Result<Parts> {
        let mut values = HashMap::<&'static str, String>::default();
        values.insert("kw", req.keyword.to_owned());
        values.insert("tag", req.tag.to_owned());

        for prompt in self.prompts {
            let label = render(prompt.label, &values, None);
            let default = prompt.default.resolve(req.keyword, req.state);
            let answer = req.ask(&label, &default)?;
            values.insert(prompt.key, answer);
        }

        for effect in self.effects {
            match effect {
                Effect::Declare { ty, name } => {
                    let ty = render(ty, &values, None);
                    let base = render(name, &values, None);
                    let var = req.state.declare_variable(&ty, &base);
                    values.insert("var", var);
                }
                Effect::Track(key) => {
                    if let Some(declaration) = values.get(key) {
                        req.state.track_declaration(declaration);
                    }
                }
            }
        }

        let mut parts = Parts::default();
        parts
            .includes
            .extend(self.includes.iter().map(|s| (*s).to_owned()));
        render_lines(self.top, &values, &mut parts.top);

        let title = render(self.title, &values, None);
        parts.body.push(format!("// ({}) {title}", req.tag));
        render_lines(self.body, &values, &mut parts.body);

        Ok(parts)
    }
}

fn render_lines(lines: &[Line], values: &HashMap<&'static str, String>, out: &mut Vec<String>) {
    for line in lines {
        match line {
            Line::Text(text) => out.push(render(text, values, None)),
            Line::Each(key, text) => {
                let list = values.get(key).map(String::as_str).unwrap_or_default();
                for item in split_list(list) {
                    out.push(render(text, values, Some(item)));
                }
            }
        }
    }
}

fn render(text: &str, values: &HashMap<&'static str, String>, item: Option<&str>) -> String {
    render_placeholders(text, |key| match (key, item) {
        ("item", Some(item)) => Some(item),
        _ => values.get(key).map(String::as_str),
    })
}

/// Splits a comma-separated answer into trimmed, non-empty items.
pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

use std::collections::hash_map;

use ahash::HashMap;
use anyhow::Result;

use super::assemble::ENTRY_POINT;
use super::env::Prompter;
use super::generation::{GenerationContext, Parts};
use super::recipe::Recipe;

pub type NativeHandler = fn(&mut Request<'_>) -> Result<Parts>;

/// Everything a handler needs to generate one occurrence.
pub struct Request<'a> {
    pub keyword: &'a str,
    pub tag: &'a str,
    pub state: &'a mut GenerationContext,
    pub prompter: &'a mut dyn Prompter,
}

impl Request<'_> {
    /// Asks a question labeled with the occurrence tag.
    pub fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        self.prompter.ask(&format!("[{}] {label}", self.tag), default)
    }

    pub fn read_block(&mut self, instruction: &str) -> Result<Vec<String>> {
        self.prompter.read_block(instruction)
    }
}

#[derive(Clone, Copy)]
pub enum Handler {
    Recipe(&'static Recipe),
    Native(NativeHandler),
}

impl Handler {
    pub fn generate(&self, req: &mut Request<'_>) -> Result<Parts> {
        match self {
            Self::Recipe(recipe) => recipe.generate(req),
            Self::Native(f) => f(req),
        }
    }
}

pub struct Dictionary {
    handlers: HandlersMap,
    fallback: Handler,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self {
            handlers: Default::default(),
            fallback: Handler::Native(interpret_fragment),
        }
    }
}

impl Dictionary {
    pub fn lookup(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }

    /// Handler for keywords without a tailored one.
    pub fn fallback(&self) -> Handler {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Sorted names of all keywords with a tailored handler.
    pub fn words(&self) -> Vec<&str> {
        let mut words = self.handlers.keys().map(String::as_str).collect::<Vec<_>>();
        words.sort_unstable();
        words
    }

    pub fn define_recipe(&mut self, names: &[&str], recipe: &'static Recipe) -> Result<()> {
        for name in names {
            self.define_handler(*name, Handler::Recipe(recipe))?;
        }
        Ok(())
    }

    pub fn define_native(&mut self, names: &[&str], f: NativeHandler) -> Result<()> {
        for name in names {
            self.define_handler(*name, Handler::Native(f))?;
        }
        Ok(())
    }

    pub fn define_handler<T: Into<String>>(&mut self, name: T, handler: Handler) -> Result<()> {
        fn define_handler_impl(
            handlers: &mut HandlersMap,
            name: String,
            handler: Handler,
        ) -> Result<()> {
            match handlers.entry(name) {
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(handler);
                    Ok(())
                }
                hash_map::Entry::Occupied(entry) => {
                    anyhow::bail!("Handler for `{}` is already defined", entry.key())
                }
            }
        }
        define_handler_impl(&mut self.handlers, name.into(), handler)
    }
}

type HandlersMap = HashMap<String, Handler>;

/// Asks the user to paste a fragment for a keyword without a tailored handler.
fn interpret_fragment(req: &mut Request<'_>) -> Result<Parts> {
    req.prompter.message(&format!(
        "[{}] No tailored snippet for '{}'. Please paste a small code fragment.",
        req.tag, req.keyword
    ))?;
    let lines = req.read_block("Finish the fragment with a single '.' on its own line:")?;

    let mut parts = Parts::default();
    if lines.iter().any(|line| line.contains(ENTRY_POINT)) {
        let mut program = lines.join("\n");
        program.push('\n');
        parts.top.push(program);
        parts.body.push(format!(
            "// ({}) User provided a full program above; no extra main content added.",
            req.tag
        ));
    } else {
        parts.body.extend(lines);
    }
    Ok(parts)
}

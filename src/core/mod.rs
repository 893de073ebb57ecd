use anyhow::Result;

pub use self::assemble::{ENTRY_POINT, assemble, canonical_include};
pub use self::catalog::{Catalog, catalog};
pub use self::dictionary::{Dictionary, Handler, NativeHandler, Request};
pub use self::env::{BLOCK_TERMINATOR, Prompter, ScriptedPrompter, StdioPrompter};
pub use self::generation::{AggregatedParts, GenerationContext, Parts};
pub use self::lexer::{KeywordSet, Lexer, Occurrence, Token, normalize, scan, tokenize};
pub use self::recipe::{Effect, Fallback, Line, Prompt, Recipe, split_list};
pub use self::store::{Defined, Edit, KeywordStore, KeywordTemplate, Param, SaveStatus};
pub use self::substitute::{SubstitutionMode, Values, render_placeholders, substitute, substitute_with};

pub mod assemble;
pub mod catalog;
pub mod dictionary;
pub mod env;
pub mod generation;
pub mod lexer;
pub mod recipe;
pub mod store;
pub mod substitute;

pub struct Context<'a> {
    pub dictionary: Dictionary,
    pub store: KeywordStore,
    pub prompter: &'a mut dyn Prompter,
}

impl<'a> Context<'a> {
    pub fn new(store: KeywordStore, prompter: &'a mut dyn Prompter) -> Self {
        Self {
            dictionary: Default::default(),
            store,
            prompter,
        }
    }

    pub fn with_module<T: Module>(mut self, module: T) -> Result<Self> {
        self.add_module(module)?;
        Ok(self)
    }

    pub fn add_module<T: Module>(&mut self, module: T) -> Result<()> {
        module.init(&mut self.dictionary)
    }

    /// Generates one program for every keyword occurrence of the line.
    ///
    /// Returns `None` without prompting when the line has no recognized keywords.
    /// Any error (including [`Cancelled`]) discards everything collected so far.
    ///
    /// [`Cancelled`]: crate::error::Cancelled
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let tokens = tokenize(line);
        let occurrences = scan(&tokens, catalog(), &self.store);
        if occurrences.is_empty() {
            return Ok(None);
        }

        let mut detected = String::from("Detected occurrences in order:");
        for (i, occurrence) in occurrences.iter().enumerate() {
            detected.push_str(&format!(
                " [{}] '{}'(token {})",
                i + 1,
                occurrence.keyword,
                occurrence.position
            ));
        }
        self.prompter.message(&detected)?;

        let parts = self.generate(&occurrences)?;
        Ok(Some(assemble(parts)))
    }

    pub fn generate(&mut self, occurrences: &[Occurrence]) -> Result<AggregatedParts> {
        let mut state = GenerationContext::default();
        let mut aggregated = AggregatedParts::default();

        for (i, occurrence) in occurrences.iter().enumerate() {
            let index = i + 1;
            self.prompter.message(&format!(
                "--- Asking about keyword occurrence {index}: '{}' (token {}) ---",
                occurrence.keyword, occurrence.position
            ))?;

            let parts = self.dispatch(
                &occurrence.keyword,
                &mut state,
                index,
                occurrence.position,
            )?;
            aggregated.push(parts);
        }

        Ok(aggregated)
    }

    pub fn dispatch(
        &mut self,
        keyword: &str,
        state: &mut GenerationContext,
        occurrence_index: usize,
        token_position: usize,
    ) -> Result<Parts> {
        let tag = format!("occurrence {occurrence_index} (token {token_position})");

        if let Some(template) = self.store.get(keyword) {
            tracing::debug!(keyword, "using custom keyword template");
            let mut values = Values::default();
            for param in &template.params {
                let value = self.prompter.ask(
                    &format!("[{tag}] Value for parameter '{}'", param.name),
                    &param.default,
                )?;
                values.insert(param.name.clone(), value);
            }
            return Ok(substitute(template, &values, &tag));
        }

        let handler = match self.dictionary.lookup(keyword) {
            Some(handler) => handler,
            None => {
                tracing::debug!(keyword, "no tailored handler, asking for a fragment");
                self.dictionary.fallback()
            }
        };

        let mut request = Request {
            keyword,
            tag: &tag,
            state,
            prompter: &mut *self.prompter,
        };
        handler.generate(&mut request)
    }
}

pub trait Module {
    fn init(&self, d: &mut Dictionary) -> Result<()>;
}

impl<T: Module> Module for &T {
    fn init(&self, d: &mut Dictionary) -> Result<()> {
        T::init(self, d)
    }
}

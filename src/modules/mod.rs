use crate::core::*;

pub use self::alternative_tokens::AlternativeTokens;
pub use self::control::Control;
pub use self::declarations::Declarations;
pub use self::expressions::Expressions;
pub use self::types::Types;

mod alternative_tokens;
mod control;
mod declarations;
mod expressions;
mod types;

/// Every built-in keyword example.
pub struct BaseModule;

impl Module for BaseModule {
    fn init(&self, d: &mut Dictionary) -> anyhow::Result<()> {
        Types.init(d)?;
        Control.init(d)?;
        Declarations.init(d)?;
        Expressions.init(d)?;
        AlternativeTokens.init(d)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub struct Generated {
        pub parts: Parts,
        pub prompts: Vec<String>,
    }

    /// Runs the handler of `keyword` with scripted answers.
    pub fn generate<M: Module>(
        module: M,
        keyword: &str,
        state: &mut GenerationContext,
        answers: &[&str],
    ) -> Generated {
        let mut d = Dictionary::default();
        module.init(&mut d).unwrap();
        let handler = d.lookup(keyword).unwrap();

        let mut prompter = ScriptedPrompter::new(answers.iter().copied());
        let parts = handler
            .generate(&mut Request {
                keyword,
                tag: "occurrence 1 (token 1)",
                state,
                prompter: &mut prompter,
            })
            .unwrap();
        assert_eq!(prompter.remaining(), 0, "unused answers for `{keyword}`");

        Generated {
            parts,
            prompts: prompter.prompts,
        }
    }

    /// Same as [`generate`] with every default accepted.
    pub fn defaults<M: Module>(module: M, keyword: &str, prompts: usize) -> Generated {
        let mut state = GenerationContext::default();
        generate(module, keyword, &mut state, &vec![""; prompts])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modules_do_not_overlap() {
        let mut d = Dictionary::default();
        BaseModule.init(&mut d).unwrap();

        for word in d.words() {
            assert!(catalog().contains(word), "`{word}` is not a keyword");
        }
        assert_eq!(d.len(), 54);
    }
}

use ahash::{HashMap, HashSet};

use super::lexer::normalize;

/// Declarations made so far while generating one input line.
#[derive(Debug, Default)]
pub struct GenerationContext {
    pub vars: HashMap<String, String>,
    pub types: HashSet<String>,
    pub last_var: Option<String>,
    pub last_type: Option<String>,
}

impl GenerationContext {
    /// Returns `base`, or the first of `base1`, `base2`, ... not yet declared.
    pub fn unique_name(&self, base: &str) -> String {
        if !self.vars.contains_key(base) {
            return base.to_owned();
        }

        let mut suffix = 1usize;
        loop {
            let name = format!("{base}{suffix}");
            if !self.vars.contains_key(&name) {
                return name;
            }
            suffix += 1;
        }
    }

    /// Declares a variable under a collision-free name and returns that name.
    pub fn declare_variable(&mut self, ty: &str, base: &str) -> String {
        let name = self.unique_name(base);
        self.vars.insert(name.clone(), ty.to_owned());
        self.last_var = Some(name.clone());
        name
    }

    pub fn register_type(&mut self, name: &str) {
        self.types.insert(name.to_owned());
        self.last_type = Some(name.to_owned());
    }

    /// Registers the variable of a free-form `type name = init` declaration.
    ///
    /// Returns the registered name, if any could be extracted.
    pub fn track_declaration(&mut self, declaration: &str) -> Option<String> {
        let mut words = declaration.split_whitespace();
        let ty = words.next()?;
        let name = words.next()?;
        let name = normalize(name.split('=').next().unwrap_or_default());
        if name.is_empty() {
            return None;
        }

        self.vars.insert(name.clone(), ty.to_owned());
        self.last_var = Some(name.clone());
        Some(name)
    }
}

/// Fragments produced for one keyword occurrence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Parts {
    pub includes: Vec<String>,
    pub top: Vec<String>,
    pub body: Vec<String>,
}

impl Parts {
    pub fn append(&mut self, other: Parts) {
        self.includes.extend(other.includes);
        self.top.extend(other.top);
        self.body.extend(other.body);
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.top.is_empty() && self.body.is_empty()
    }
}

/// Parts of all occurrences of a line, in occurrence order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregatedParts {
    parts: Parts,
    fragments: usize,
}

impl AggregatedParts {
    pub fn push(&mut self, parts: Parts) {
        self.parts.append(parts);
        self.fragments += 1;
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn includes(&self) -> &[String] {
        &self.parts.includes
    }

    pub fn top(&self) -> &[String] {
        &self.parts.top
    }

    pub fn body(&self) -> &[String] {
        &self.parts.body
    }

    pub fn into_parts(self) -> Parts {
        self.parts
    }
}

impl FromIterator<Parts> for AggregatedParts {
    fn from_iter<T: IntoIterator<Item = Parts>>(iter: T) -> Self {
        let mut aggregated = Self::default();
        for parts in iter {
            aggregated.push(parts);
        }
        aggregated
    }
}

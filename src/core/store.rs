use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::assemble::ENTRY_POINT;
use super::catalog::catalog;
use super::lexer::{KeywordSet, normalize};
use crate::error::StoreError;

const KEYWORD_MARKER: &str = "===KEYWORD:";
const PARAMS_MARKER: &str = "===PARAMS:";
const END_MARKER: &str = "===END===";
const MARKER_FENCE: &str = "===";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub default: String,
}

impl Param {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, default: D) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
        }
    }
}

/// Parses `name=default,other=val`.
///
/// An entry without `=` has an empty default, entries without a name are dropped.
pub fn parse_params(text: &str) -> Vec<Param> {
    text.split(',')
        .filter_map(|entry| {
            let (name, default) = entry.split_once('=').unwrap_or((entry, ""));
            let name = name.trim();
            (!name.is_empty()).then(|| Param::new(name, default.trim()))
        })
        .collect()
}

pub fn format_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{}={}", p.name, p.default))
        .collect::<Vec<_>>()
        .join(",")
}

/// A user-defined keyword.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeywordTemplate {
    /// Raw multiline text with `{param}` placeholders.
    pub snippet: String,
    pub params: Vec<Param>,
}

impl KeywordTemplate {
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// A change applied to a stored keyword.
#[derive(Debug, Clone)]
pub enum Edit {
    SetDefault { param: String, value: String },
    AddParam(Param),
    ReplaceSnippet(String),
}

impl Edit {
    fn apply(self, keyword: &str, template: &mut KeywordTemplate) -> Result<(), StoreError> {
        match self {
            Self::SetDefault { param, value } => {
                let Some(p) = template.params.iter_mut().find(|p| p.name == param) else {
                    return Err(StoreError::UnknownParam {
                        keyword: keyword.to_owned(),
                        param,
                    });
                };
                check_default(keyword, &p.name, &value)?;
                p.default = value;
            }
            Self::AddParam(param) => {
                check_param(keyword, &param)?;
                if template.param(&param.name).is_some() {
                    return Err(StoreError::DuplicateParam {
                        keyword: keyword.to_owned(),
                        param: param.name,
                    });
                }
                template.params.push(param);
            }
            Self::ReplaceSnippet(snippet) => {
                check_snippet(keyword, &snippet)?;
                template.snippet = snippet;
            }
        }
        Ok(())
    }
}

/// Outcome of rewriting the store file after a successful mutation.
#[must_use]
#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    /// The in-memory table keeps the change.
    Failed(std::io::Error),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

#[derive(Debug)]
pub struct Defined {
    pub name: String,
    pub replaced: bool,
    pub status: SaveStatus,
}

/// Persistent table of user-defined keywords.
///
/// The file is read once on open and rewritten wholesale after each mutation.
#[derive(Debug, Default)]
pub struct KeywordStore {
    path: Option<PathBuf>,
    keywords: BTreeMap<String, KeywordTemplate>,
}

impl KeywordStore {
    /// A store that is never written to disk.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Loads the store; an unreadable file means an empty store.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let keywords = load(&path);
        Self {
            path: Some(path),
            keywords,
        }
    }

    pub fn with_keywords(mut self, keywords: BTreeMap<String, KeywordTemplate>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&KeywordTemplate> {
        self.keywords.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keywords.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// All keywords in name order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &KeywordTemplate)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Case-insensitive match against names and snippet text.
    pub fn search(&self, term: &str) -> Vec<(&str, &KeywordTemplate)> {
        let term = term.trim().to_lowercase();
        self.list()
            .filter(|(name, template)| {
                name.contains(&term) || template.snippet.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Normalizes a proposed keyword name and checks it against the catalog.
    pub fn validate_name(&self, name: &str) -> Result<String, StoreError> {
        let name = normalize(name);
        if name.is_empty() {
            return Err(StoreError::EmptyKeywordName);
        }
        if catalog().contains(&name) {
            return Err(StoreError::KeywordConflict(name));
        }
        Ok(name)
    }

    /// Adds or replaces a keyword and rewrites the store.
    ///
    /// Rejected definitions leave both the table and the file untouched.
    pub fn define(&mut self, name: &str, params: Vec<Param>, snippet: String) -> Result<Defined> {
        let name = self.validate_name(name)?;
        for param in &params {
            check_param(&name, param)?;
        }
        check_snippet(&name, &snippet)?;

        let replaced = self
            .keywords
            .insert(name.clone(), KeywordTemplate { snippet, params })
            .is_some();
        tracing::debug!(keyword = %name, replaced, "defined custom keyword");

        Ok(Defined {
            name,
            replaced,
            status: self.save(),
        })
    }

    pub fn remove(&mut self, name: &str) -> Result<SaveStatus> {
        let name = normalize(name);
        if self.keywords.remove(&name).is_none() {
            return Err(StoreError::UnknownKeyword(name).into());
        }
        tracing::debug!(keyword = %name, "removed custom keyword");
        Ok(self.save())
    }

    pub fn edit(&mut self, name: &str, edit: Edit) -> Result<SaveStatus> {
        let name = normalize(name);
        let Some(template) = self.keywords.get_mut(&name) else {
            return Err(StoreError::UnknownKeyword(name).into());
        };

        let mut updated = template.clone();
        edit.apply(&name, &mut updated)?;
        *template = updated;
        tracing::debug!(keyword = %name, "edited custom keyword");

        Ok(self.save())
    }

    /// Rewrites the whole file. Detached stores have nothing to write.
    pub fn save(&self) -> SaveStatus {
        let Some(path) = &self.path else {
            return SaveStatus::Saved;
        };

        match save(path, &self.keywords) {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to save custom keywords: {e}");
                SaveStatus::Failed(e)
            }
        }
    }
}

impl KeywordSet for KeywordStore {
    fn contains_keyword(&self, key: &str) -> bool {
        self.contains(key)
    }
}

/// Rejects snippets that would nest an entry point or read back differently.
fn check_snippet(keyword: &str, snippet: &str) -> Result<(), StoreError> {
    if snippet.contains(ENTRY_POINT) {
        return Err(StoreError::EntryPointInTemplate(keyword.to_owned()));
    }
    if let Some(line) = snippet.lines().find(|line| is_marker(line)) {
        return Err(StoreError::MarkerInSnippet {
            keyword: keyword.to_owned(),
            line: line.to_owned(),
        });
    }
    Ok(())
}

/// Parameters are written as one `name=default,...` line.
fn check_param(keyword: &str, param: &Param) -> Result<(), StoreError> {
    let name = &param.name;
    if name.is_empty()
        || name.trim() != name.as_str()
        || name.contains([',', '=', '\n', '\r'])
    {
        return Err(StoreError::InvalidParamName {
            keyword: keyword.to_owned(),
            param: name.clone(),
        });
    }
    check_default(keyword, name, &param.default)
}

fn check_default(keyword: &str, param: &str, value: &str) -> Result<(), StoreError> {
    if value.trim() != value || value.contains([',', '\n', '\r']) {
        return Err(StoreError::InvalidParamDefault {
            keyword: keyword.to_owned(),
            param: param.to_owned(),
            value: value.to_owned(),
        });
    }
    Ok(())
}

pub fn load(path: &Path) -> BTreeMap<String, KeywordTemplate> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let keywords = parse_store(&text);
            tracing::debug!(path = %path.display(), count = keywords.len(), "loaded custom keywords");
            keywords
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), "no custom keywords loaded: {e}");
            BTreeMap::new()
        }
    }
}

/// Replaces the file through a sibling temporary file.
pub fn save(path: &Path, keywords: &BTreeMap<String, KeywordTemplate>) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, render_store(keywords))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        std::fs::remove_file(&tmp).ok();
        return Err(e);
    }
    Ok(())
}

pub fn parse_store(text: &str) -> BTreeMap<String, KeywordTemplate> {
    struct Block {
        name: String,
        template: KeywordTemplate,
    }

    fn commit(keywords: &mut BTreeMap<String, KeywordTemplate>, block: Block) {
        if !block.name.is_empty() {
            keywords.insert(block.name, block.template);
        }
    }

    let mut keywords = BTreeMap::new();
    let mut current: Option<Block> = None;

    for line in text.lines() {
        if let Some(name) = marker_value(line, KEYWORD_MARKER) {
            if let Some(block) = current.take() {
                tracing::warn!(keyword = %block.name, "keyword block is not terminated");
                commit(&mut keywords, block);
            }
            current = Some(Block {
                name: normalize(name),
                template: KeywordTemplate::default(),
            });
            continue;
        }

        let Some(block) = &mut current else {
            continue;
        };

        if line == END_MARKER {
            if let Some(block) = current.take() {
                commit(&mut keywords, block);
            }
        } else if let Some(params) = marker_value(line, PARAMS_MARKER) {
            block.template.params.extend(parse_params(params));
        } else if is_marker(line) {
            tracing::debug!(line, "ignoring unknown store marker");
        } else {
            block.template.snippet.push_str(line);
            block.template.snippet.push('\n');
        }
    }

    if let Some(block) = current {
        tracing::warn!(keyword = %block.name, "store ended inside a keyword block");
        commit(&mut keywords, block);
    }

    keywords
}

pub fn render_store(keywords: &BTreeMap<String, KeywordTemplate>) -> String {
    let mut out = String::new();
    for (name, template) in keywords {
        out.push_str(&format!("{KEYWORD_MARKER}{name}{MARKER_FENCE}\n"));
        if !template.params.is_empty() {
            out.push_str(&format!(
                "{PARAMS_MARKER}{}{MARKER_FENCE}\n",
                format_params(&template.params)
            ));
        }
        out.push_str(&template.snippet);
        if !template.snippet.is_empty() && !template.snippet.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(END_MARKER);
        out.push('\n');
    }
    out
}

/// Extracts the trimmed value of a `<marker>value===` line.
fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let value = line.strip_prefix(marker)?.strip_suffix(MARKER_FENCE)?;
    Some(value.trim())
}

fn is_marker(line: &str) -> bool {
    let Some(rest) = line.strip_prefix(MARKER_FENCE) else {
        return false;
    };
    rest.len() > MARKER_FENCE.len()
        && rest.ends_with(MARKER_FENCE)
        && rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase())
}

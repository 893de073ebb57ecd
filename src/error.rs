pub use anyhow::{Error, Result};

/// End of input at a prompt. Aborts the whole line and ends the session.
#[derive(Debug, thiserror::Error)]
#[error("Input stream ended during a prompt")]
pub struct Cancelled;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Empty keyword name")]
    EmptyKeywordName,
    #[error("`{0}` conflicts with a built-in C++17 keyword")]
    KeywordConflict(String),
    #[error("Snippet for `{0}` defines its own `int main(`")]
    EntryPointInTemplate(String),
    #[error("No such custom keyword: `{0}`")]
    UnknownKeyword(String),
    #[error("Keyword `{keyword}` has no parameter `{param}`")]
    UnknownParam { keyword: String, param: String },
    #[error("Keyword `{keyword}` already has a parameter `{param}`")]
    DuplicateParam { keyword: String, param: String },
    #[error("Invalid parameter name `{param}` for `{keyword}`: no `,`, `=`, line breaks or surrounding spaces")]
    InvalidParamName { keyword: String, param: String },
    #[error("Invalid default `{value}` for parameter `{param}` of `{keyword}`: no `,`, line breaks or surrounding spaces")]
    InvalidParamDefault {
        keyword: String,
        param: String,
        value: String,
    },
    #[error("Snippet of `{keyword}` contains the store marker line `{line}`")]
    MarkerInSnippet { keyword: String, line: String },
}

pub fn is_cancelled(error: &Error) -> bool {
    error.downcast_ref::<Cancelled>().is_some()
}

use std::sync::OnceLock;

use ahash::HashSet;

use super::lexer::KeywordSet;

/// Reserved words of C++17.
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| Catalog {
        words: CPP17_KEYWORDS.iter().copied().collect(),
    })
}

pub struct Catalog {
    words: HashSet<&'static str>,
}

impl Catalog {
    pub fn contains(&self, word: &str) -> bool {
        if word.chars().any(|c| c.is_ascii_uppercase()) {
            self.words.contains(word.to_ascii_lowercase().as_str())
        } else {
            self.words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn sorted(&self) -> Vec<&'static str> {
        let mut words = self.words.iter().copied().collect::<Vec<_>>();
        words.sort_unstable();
        words
    }
}

impl KeywordSet for Catalog {
    fn contains_keyword(&self, key: &str) -> bool {
        self.contains(key)
    }
}

const CPP17_KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "and",
    "and_eq",
    "asm",
    "auto",
    "bitand",
    "bitor",
    "bool",
    "break",
    "case",
    "catch",
    "char",
    "char16_t",
    "char32_t",
    "class",
    "compl",
    "const",
    "constexpr",
    "const_cast",
    "continue",
    "decltype",
    "default",
    "delete",
    "do",
    "double",
    "dynamic_cast",
    "else",
    "enum",
    "explicit",
    "export",
    "extern",
    "false",
    "float",
    "for",
    "friend",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "not",
    "not_eq",
    "nullptr",
    "operator",
    "or",
    "or_eq",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "static_cast",
    "struct",
    "switch",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "try",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
    "while",
    "xor",
    "xor_eq",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_ignores_case() {
        let catalog = catalog();
        assert!(catalog.contains("while"));
        assert!(catalog.contains("WHILE"));
        assert!(catalog.contains("Static_Cast"));
        assert!(!catalog.contains("println"));
        assert!(!catalog.contains(""));
    }

    #[test]
    fn has_every_cpp17_keyword_once() {
        assert_eq!(catalog().len(), 84);
        assert_eq!(CPP17_KEYWORDS.len(), 84);
    }

    #[test]
    fn sorted_listing() {
        let sorted = catalog().sorted();
        assert_eq!(sorted.first(), Some(&"alignas"));
        assert_eq!(sorted.last(), Some(&"xor_eq"));
        assert!(sorted.windows(2).all(|w| w[0] < w[1]));
    }
}

use std::fmt::Write;

use ahash::HashSet;

use super::generation::AggregatedParts;

/// Marker of a full program definition.
pub const ENTRY_POINT: &str = "int main(";

pub const INCLUDE_DIRECTIVE: &str = "#include";

const PRELUDE_HEADER: &str = "iostream";

/// Renders the final program: prelude, unique includes, top-level blocks and
/// one `main` holding every body line.
pub fn assemble(parts: AggregatedParts) -> String {
    let parts = parts.into_parts();
    let mut out = String::with_capacity(256);

    out.push_str("#include <iostream>\n");

    let mut seen = HashSet::default();
    seen.insert(PRELUDE_HEADER.to_owned());
    for reference in &parts.includes {
        if let Some((key, directive)) = canonical_include(reference)
            && seen.insert(key)
        {
            let _ = writeln!(out, "{INCLUDE_DIRECTIVE} {directive}");
        }
    }

    out.push_str("\nusing namespace std;\n\n");

    let mut emitted = HashSet::default();
    for block in &parts.top {
        let block = block.trim_end_matches('\n');
        if emitted.insert(block) {
            out.push_str(block);
            out.push('\n');
        }
    }
    if !emitted.is_empty() {
        out.push('\n');
    }

    out.push_str("int main() {\n");
    for line in &parts.body {
        for line in line.split('\n') {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
    out.push_str("    return 0;\n}\n");
    out
}

/// Returns the deduplication key and the rendered form of an include reference.
///
/// `string`, `<string>` and `"string"` share the key `string`. Bare names are
/// rendered bracketed, explicit forms are kept.
pub fn canonical_include(reference: &str) -> Option<(String, String)> {
    let reference = reference.trim();
    let reference = reference
        .strip_prefix(INCLUDE_DIRECTIVE)
        .map(str::trim)
        .unwrap_or(reference);

    let (key, directive) = if let Some(inner) = reference
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
    {
        let inner = inner.trim();
        (inner, format!("<{inner}>"))
    } else if let Some(inner) = reference
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        let inner = inner.trim();
        (inner, format!("\"{inner}\""))
    } else {
        (reference, format!("<{reference}>"))
    };

    if key.is_empty() {
        None
    } else {
        Some((key.to_owned(), directive))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::generation::Parts;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn include_forms_share_a_key() {
        assert_eq!(
            canonical_include("string"),
            Some(("string".to_owned(), "<string>".to_owned()))
        );
        assert_eq!(
            canonical_include(" < string > "),
            Some(("string".to_owned(), "<string>".to_owned()))
        );
        assert_eq!(
            canonical_include("\"string\""),
            Some(("string".to_owned(), "\"string\"".to_owned()))
        );
        assert_eq!(
            canonical_include("#include <vector>"),
            Some(("vector".to_owned(), "<vector>".to_owned()))
        );
        assert_eq!(canonical_include("<>"), None);
        assert_eq!(canonical_include("  "), None);
    }

    #[test]
    fn renders_single_program() {
        let parts = [
            Parts {
                includes: strings(&["string", "stdexcept"]),
                top: strings(&["struct A {};"]),
                body: strings(&["// first", "a();"]),
            },
            Parts {
                includes: strings(&["<string>", "\"stdexcept\"", "iostream", "typeinfo"]),
                top: strings(&["struct A {};", "int f() { return 1; }\n"]),
                body: strings(&["if (x) {\n    b();\n}"]),
            },
        ]
        .into_iter()
        .collect::<AggregatedParts>();

        assert_eq!(
            assemble(parts),
            "#include <iostream>\n\
             #include <string>\n\
             #include <stdexcept>\n\
             #include <typeinfo>\n\
             \n\
             using namespace std;\n\
             \n\
             struct A {};\n\
             int f() { return 1; }\n\
             \n\
             int main() {\n    \
                 // first\n    \
                 a();\n    \
                 if (x) {\n        \
                     b();\n    \
                 }\n    \
                 return 0;\n\
             }\n"
        );
    }

    #[test]
    fn empty_parts_still_form_a_program() {
        assert_eq!(
            assemble(AggregatedParts::default()),
            "#include <iostream>\n\nusing namespace std;\n\nint main() {\n    return 0;\n}\n"
        );
    }
}

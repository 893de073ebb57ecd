use anyhow::Result;

use crate::core::*;

pub struct Expressions;

impl Module for Expressions {
    fn init(&self, d: &mut Dictionary) -> Result<()> {
        d.define_recipe(&["static_cast"], &STATIC_CAST)?;
        d.define_recipe(&["dynamic_cast"], &DYNAMIC_CAST)?;
        d.define_recipe(&["const_cast"], &CONST_CAST)?;
        d.define_recipe(&["reinterpret_cast"], &REINTERPRET_CAST)?;
        d.define_recipe(&["new", "delete"], &ALLOCATION)?;
        d.define_recipe(&["try", "catch", "throw"], &EXCEPTIONS)?;
        d.define_recipe(&["sizeof", "typeid"], &INTROSPECTION)?;
        d.define_native(&["operator"], interpret_operator)
    }
}

static STATIC_CAST: Recipe = Recipe {
    title: "Demonstrate static_cast",
    prompts: &[
        Prompt {
            key: "from",
            label: "Source expression (e.g., 3.14)",
            default: Fallback::Text("3.14"),
        },
        Prompt {
            key: "to",
            label: "Target type (e.g., int)",
            default: Fallback::Text("int"),
        },
    ],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("{to} v = static_cast<{to}>({from});"),
        Line::Text("cout << v << endl;"),
    ],
};

static DYNAMIC_CAST: Recipe = Recipe {
    title: "Demonstrate dynamic_cast",
    prompts: &[],
    effects: &[],
    includes: &[],
    top: &[
        Line::Text("struct Base { virtual ~Base() = default; };"),
        Line::Text("struct Derived : Base { int x = 42; };"),
    ],
    body: &[
        Line::Text("Base* b = new Derived();"),
        Line::Text("if (Derived* d = dynamic_cast<Derived*>(b)) {"),
        Line::Text("    cout << \"dynamic_cast succeeded: \" << d->x << endl;"),
        Line::Text("} else {"),
        Line::Text("    cout << \"dynamic_cast failed\" << endl;"),
        Line::Text("}"),
        Line::Text("delete b;"),
    ],
};

static CONST_CAST: Recipe = Recipe {
    title: "Demonstrate const_cast (illustrative)",
    prompts: &[],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("const int ci = 10;"),
        Line::Text("int &r = const_cast<int&>(ci);"),
        Line::Text("r = 20; // undefined behavior but illustrative"),
        Line::Text("cout << \"ci (after const_cast attempt) = \" << ci << endl;"),
    ],
};

static REINTERPRET_CAST: Recipe = Recipe {
    title: "Demonstrate reinterpret_cast",
    prompts: &[],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("int x = 0x12345678;"),
        Line::Text("char* p = reinterpret_cast<char*>(&x);"),
        Line::Text(
            "cout << \"First byte (interpretation): \" << static_cast<int>(p[0]) << endl;",
        ),
    ],
};

static ALLOCATION: Recipe = Recipe {
    title: "Demonstrate new/delete",
    prompts: &[
        Prompt {
            key: "ty",
            label: "Type to allocate",
            default: Fallback::Text("int"),
        },
        Prompt {
            key: "init",
            label: "Initial value",
            default: Fallback::Text("42"),
        },
    ],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("{ty}* p = new {ty}({init});"),
        Line::Text("cout << \"*p = \" << *p << endl;"),
        Line::Text("delete p;"),
    ],
};

static EXCEPTIONS: Recipe = Recipe {
    title: "Demonstrate try/catch/throw",
    prompts: &[Prompt {
        key: "message",
        label: "Exception message to throw",
        default: Fallback::Text("Something went wrong"),
    }],
    effects: &[],
    includes: &["stdexcept"],
    top: &[],
    body: &[
        Line::Text("try {"),
        Line::Text("    throw std::runtime_error(\"{message}\");"),
        Line::Text("} catch (const std::exception& e) {"),
        Line::Text("    cout << \"Caught: \" << e.what() << endl;"),
        Line::Text("}"),
    ],
};

static INTROSPECTION: Recipe = Recipe {
    title: "Demonstrate sizeof and typeid",
    prompts: &[Prompt {
        key: "expr",
        label: "Expression or type to inspect",
        default: Fallback::Text("int"),
    }],
    effects: &[],
    includes: &["typeinfo"],
    top: &[],
    body: &[
        Line::Text("cout << \"sizeof({expr}) = \" << sizeof({expr}) << endl;"),
        Line::Text("cout << \"typeid({expr}).name() = \" << typeid({expr}).name() << endl;"),
    ],
};

const POINT: &str = "struct Point { int x, y; Point(int x_, int y_):x(x_),y(y_){} };";
const POINT_PLUS: &str =
    "Point operator+(const Point& a, const Point& b) { return Point(a.x + b.x, a.y + b.y); }";
const POINT_SUM: [&str; 3] = [
    "Point a(1,2), b(3,4);",
    "Point c = a + b;",
    "cout << \"c = (\" << c.x << \",\" << c.y << \")\" << endl;",
];

/// `+` and `<<` get their own overloads; any other operator falls back to `+`.
fn interpret_operator(req: &mut Request<'_>) -> Result<Parts> {
    let op = req.ask("Operator to demonstrate/overload (e.g. +, <<)", "+")?;
    let tag = req.tag;

    let mut parts = Parts {
        top: vec![POINT.to_owned()],
        ..Default::default()
    };
    match op.trim() {
        "+" => {
            parts.top.push(POINT_PLUS.to_owned());
            parts.body.push(format!("// ({tag}) Demonstrate operator+"));
            parts.body.extend(POINT_SUM.map(str::to_owned));
        }
        "<<" => {
            parts.top.push(
                "std::ostream& operator<<(std::ostream& os, const Point& p) { return os << '(' << p.x << ',' << p.y << ')'; }"
                    .to_owned(),
            );
            parts.body.push(format!("// ({tag}) Demonstrate operator<<"));
            parts.body.push("Point a(1,2), b(3,4);".to_owned());
            parts.body.push("cout << a << \" \" << b << endl;".to_owned());
        }
        _ => {
            parts.top.push(format!(
                "// ({tag}) Operator not specially implemented; showing operator+ instead"
            ));
            parts.top.push(POINT_PLUS.to_owned());
            parts.body.extend(POINT_SUM.map(str::to_owned));
        }
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::modules::testing::{defaults, generate};

    #[test]
    fn static_cast_prompts() {
        let mut state = GenerationContext::default();
        let generated = generate(Expressions, "static_cast", &mut state, &["", "long"]);
        assert_eq!(generated.prompts, [
            "[occurrence 1 (token 1)] Source expression (e.g., 3.14) [3.14]: ",
            "[occurrence 1 (token 1)] Target type (e.g., int) [int]: ",
        ]);
        assert_eq!(generated.parts.body[1..], [
            "long v = static_cast<long>(3.14);",
            "cout << v << endl;",
        ]);
    }

    #[test]
    fn casts_without_prompts() {
        let generated = defaults(Expressions, "dynamic_cast", 0);
        assert_eq!(generated.parts.top, [
            "struct Base { virtual ~Base() = default; };",
            "struct Derived : Base { int x = 42; };",
        ]);
        assert_eq!(generated.parts.body.len(), 8);

        let generated = defaults(Expressions, "const_cast", 0);
        assert_eq!(generated.parts.body[0], "// (occurrence 1 (token 1)) Demonstrate const_cast (illustrative)");

        let generated = defaults(Expressions, "reinterpret_cast", 0);
        assert_eq!(generated.parts.body[2], "char* p = reinterpret_cast<char*>(&x);");
    }

    #[test]
    fn allocation() {
        let generated = defaults(Expressions, "delete", 2);
        assert_eq!(generated.parts.body[1..], [
            "int* p = new int(42);",
            "cout << \"*p = \" << *p << endl;",
            "delete p;",
        ]);
    }

    #[test]
    fn exception_and_typeinfo_includes() {
        let generated = defaults(Expressions, "throw", 1);
        assert_eq!(generated.prompts, ["[occurrence 1 (token 1)] Exception message to throw [Something went wrong]: "]);
        assert_eq!(generated.parts.includes, ["stdexcept"]);
        assert_eq!(generated.parts.body[2], "    throw std::runtime_error(\"Something went wrong\");");

        let mut state = GenerationContext::default();
        let generated = generate(Expressions, "typeid", &mut state, &["3.0 / 2"]);
        assert_eq!(generated.parts.includes, ["typeinfo"]);
        assert_eq!(generated.parts.body[1], "cout << \"sizeof(3.0 / 2) = \" << sizeof(3.0 / 2) << endl;");
    }

    #[test]
    fn operator_plus_and_stream() {
        let plus = defaults(Expressions, "operator", 1);
        assert_eq!(plus.parts.top, [POINT, POINT_PLUS]);
        assert_eq!(plus.parts.body[0], "// (occurrence 1 (token 1)) Demonstrate operator+");
        assert_eq!(plus.parts.body[1..], POINT_SUM);

        let mut state = GenerationContext::default();
        let stream = generate(Expressions, "operator", &mut state, &[" << "]);
        assert!(stream.parts.top[1].starts_with("std::ostream& operator<<(std::ostream& os, const Point& p)"));
        assert_eq!(stream.parts.body, [
            "// (occurrence 1 (token 1)) Demonstrate operator<<",
            "Point a(1,2), b(3,4);",
            "cout << a << \" \" << b << endl;",
        ]);
    }

    #[test]
    fn other_operators_fall_back_to_plus() {
        let mut state = GenerationContext::default();
        for op in ["=", "[]", "()", "=="] {
            let other = generate(Expressions, "operator", &mut state, &[op]);
            assert_eq!(other.parts.top, [
                POINT,
                "// (occurrence 1 (token 1)) Operator not specially implemented; showing operator+ instead",
                POINT_PLUS,
            ]);
            assert_eq!(other.parts.body, POINT_SUM);
        }
    }
}

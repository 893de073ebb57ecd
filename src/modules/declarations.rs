use std::fmt::Write;

use anyhow::Result;

use crate::core::*;

pub struct Declarations;

impl Module for Declarations {
    fn init(&self, d: &mut Dictionary) -> Result<()> {
        d.define_native(&["class", "struct", "union"], interpret_record)?;
        d.define_native(&["enum"], interpret_enum)?;
        d.define_native(&["template"], interpret_template)?;
        d.define_native(&["constexpr"], interpret_constexpr)?;
        d.define_recipe(&["static_assert"], &STATIC_ASSERT)?;
        d.define_recipe(&["alignas", "alignof"], &ALIGNMENT)?;
        d.define_recipe(&["thread_local"], &THREAD_LOCAL)?;
        d.define_recipe(&["mutable"], &MUTABLE)
    }
}

fn header(req: &Request<'_>, title: &str) -> String {
    format!("// ({}) {title}", req.tag)
}

struct Member<'a> {
    name: &'a str,
    ty: &'a str,
}

impl<'a> Member<'a> {
    fn parse(item: &'a str) -> Option<Self> {
        let (name, ty) = item.split_once(':').unwrap_or((item, ""));
        let name = name.trim();
        let ty = match ty.trim() {
            "" => "int",
            ty => ty,
        };
        (!name.is_empty()).then_some(Self { name, ty })
    }

    /// Constructor argument used by the generated `obj(...)` line.
    fn sample_value(&self) -> &'static str {
        match self.ty {
            "string" => "\"hi\"",
            "double" => "3.14",
            _ => "0",
        }
    }
}

const DEFAULT_MEMBERS: &str = "value:int";

fn interpret_record(req: &mut Request<'_>) -> Result<Parts> {
    let kw = req.keyword.to_owned();
    let default_name = if kw == "union" { "MyUnion" } else { "MyType" };
    let name = req.ask(&format!("Name for {kw}"), default_name)?;
    let members = req.ask("Comma-separated members (name:type)", DEFAULT_MEMBERS)?;

    let mut members = split_list(&members)
        .filter_map(Member::parse)
        .collect::<Vec<_>>();
    if members.is_empty() {
        members.extend(split_list(DEFAULT_MEMBERS).filter_map(Member::parse));
    }
    req.state.register_type(&name);

    let mut parts = Parts::default();
    let first = &members[0];

    if kw == "union" {
        let mut top = format!("union {name} {{");
        for member in &members {
            let _ = write!(top, "\n    {} {};", member.ty, member.name);
        }
        top.push_str("\n};");
        parts.top.push(top);

        let var = req.state.declare_variable(&name, &format!("{name}_u"));
        parts.body.push(header(req, "Demonstrate union"));
        parts.body.push(format!("{name} {var} = {{}};"));
        parts.body.push(format!("{var}.{} = 123;", first.name));
        parts.body.push(print_member(&var, first.name));
        return Ok(parts);
    }

    let mut top = format!("{kw} {name} {{\npublic:\n");
    for member in &members {
        let _ = writeln!(top, "    {} {};", member.ty, member.name);
    }
    let args = members
        .iter()
        .map(|m| format!("{} {}_", m.ty, m.name))
        .collect::<Vec<_>>()
        .join(", ");
    let inits = members
        .iter()
        .map(|m| format!("{0}({0}_)", m.name))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(top, "    {name}({args}) : {inits} {{}}\n}};");
    parts.top.push(top);

    let values = members
        .iter()
        .map(Member::sample_value)
        .collect::<Vec<_>>()
        .join(", ");
    parts.body.push(header(req, &format!("Demonstrate {kw}")));
    parts.body.push(format!("{name} obj({values});"));
    parts.body.push(print_member("obj", first.name));

    if members.iter().any(|m| m.ty.contains("string")) {
        parts.includes.push("string".to_owned());
    }
    Ok(parts)
}

fn print_member(var: &str, member: &str) -> String {
    format!("cout << \"{var}.{member} = \" << {var}.{member} << endl;")
}

const DEFAULT_ENUMERATORS: &str = "Red,Green,Blue";

fn interpret_enum(req: &mut Request<'_>) -> Result<Parts> {
    let name = req.ask("Enum name", "Color")?;
    let enumerators = req.ask("Comma-separated enumerators", DEFAULT_ENUMERATORS)?;

    let mut enumerators = split_list(&enumerators).collect::<Vec<_>>();
    if enumerators.is_empty() {
        enumerators.extend(split_list(DEFAULT_ENUMERATORS));
    }
    req.state.register_type(&name);

    Ok(Parts {
        includes: Vec::new(),
        top: vec![format!("enum class {name} {{ {} }};", enumerators.join(", "))],
        body: vec![
            header(req, "Demonstrate enum"),
            format!("{name} c = {name}::{};", enumerators[0]),
            "cout << static_cast<int>(c) << endl;".to_owned(),
        ],
    })
}

fn interpret_template(req: &mut Request<'_>) -> Result<Parts> {
    let kind = req.ask("Template kind ('function' or 'class')", "function")?;

    let mut parts = Parts::default();
    if kind.trim() == "class" {
        let name = req.ask("Template class name", "Box")?;
        let param = req.ask("Type parameter name", "T")?;
        parts.top.push(format!(
            "template <typename {param}>\n\
             struct {name} {{ {param} value; {name}({param} v) : value(v) {{}} }};"
        ));
        parts.body.push(header(req, "Demonstrate class template"));
        parts.body.push(format!("{name}<int> b(5);"));
        parts.body.push("cout << b.value << endl;".to_owned());
        req.state.register_type(&name);
    } else {
        let name = req.ask("Template function name", "add")?;
        let param = req.ask("Type parameter name", "T")?;
        parts.top.push(format!(
            "template <typename {param}>\n\
             {param} {name}({param} a, {param} b) {{ return a + b; }}"
        ));
        parts.body.push(header(req, "Demonstrate function template"));
        parts.body.push(format!("cout << {name}(2, 3) << endl;"));
    }

    Ok(parts)
}

const DEFAULT_CONSTEXPR: &str = "int square(int x){return x*x;}";

/// Anything with a body is a function definition, everything else a value.
fn interpret_constexpr(req: &mut Request<'_>) -> Result<Parts> {
    let expr = req.ask(
        "Provide either a constexpr function or a constant expression",
        DEFAULT_CONSTEXPR,
    )?;

    let mut parts = Parts::default();
    if expr.contains('{') {
        let name = function_name(&expr).unwrap_or("square");
        parts.top.push(format!("constexpr {expr}"));
        parts.body.push(header(req, "Demonstrate constexpr function"));
        parts.body.push(format!("cout << {name}(5) << endl;"));
    } else {
        parts.body.push(header(req, "Demonstrate constexpr value"));
        parts.body.push(format!("constexpr auto v = {expr};"));
        parts.body.push("cout << v << endl;".to_owned());
    }

    Ok(parts)
}

/// Name of the function declared by a definition like `int f(int x) {...}`.
fn function_name(definition: &str) -> Option<&str> {
    let (signature, _) = definition.split_once('(')?;
    let name = signature.split_whitespace().next_back()?;
    let name = name.trim_start_matches(['*', '&']);
    (!name.is_empty()).then_some(name)
}

static STATIC_ASSERT: Recipe = Recipe {
    title: "static_assert present above; runtime note:",
    prompts: &[
        Prompt {
            key: "cond",
            label: "Condition to assert at compile time",
            default: Fallback::Text("sizeof(int) >= 4"),
        },
        Prompt {
            key: "message",
            label: "Message for static_assert",
            default: Fallback::Text("int_size_ok"),
        },
    ],
    effects: &[],
    includes: &[],
    top: &[Line::Text("static_assert({cond}, \"{message}\");")],
    body: &[Line::Text(
        "cout << \"static_assert present; program compiled successfully\" << endl;",
    )],
};

static ALIGNMENT: Recipe = Recipe {
    title: "Demonstrate alignas/alignof",
    prompts: &[],
    effects: &[],
    includes: &[],
    top: &[Line::Text("struct alignas(32) Aligned { char data[64]; };")],
    body: &[
        Line::Text("Aligned a;"),
        Line::Text("cout << \"alignof(Aligned) = \" << alignof(Aligned) << endl;"),
    ],
};

static THREAD_LOCAL: Recipe = Recipe {
    title: "Demonstrate thread_local",
    prompts: &[
        Prompt {
            key: "name",
            label: "Thread-local variable name",
            default: Fallback::Text("counter"),
        },
        Prompt {
            key: "value",
            label: "Initial value",
            default: Fallback::Text("0"),
        },
    ],
    effects: &[],
    includes: &[],
    top: &[Line::Text("thread_local int {name} = {value};")],
    body: &[Line::Text("cout << \"{name} = \" << {name} << endl;")],
};

static MUTABLE: Recipe = Recipe {
    title: "Demonstrate mutable",
    prompts: &[Prompt {
        key: "member",
        label: "Mutable member name",
        default: Fallback::Text("cached"),
    }],
    effects: &[],
    includes: &[],
    top: &[Line::Text(
        "struct S { mutable int {member} = 0; int value = 0; int get() const { return {member} = value; } };",
    )],
    body: &[
        Line::Text("S s{0, 7};"),
        Line::Text("cout << \"get() = \" << s.get() << endl;"),
    ],
};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::modules::testing::{defaults, generate};

    #[test]
    fn class_with_constructor() {
        let mut state = GenerationContext::default();
        let generated = generate(Declarations, "class", &mut state, &[
            "Person",
            "age:int, name:string, height:double",
        ]);

        assert_eq!(generated.prompts, [
            "[occurrence 1 (token 1)] Name for class [MyType]: ",
            "[occurrence 1 (token 1)] Comma-separated members (name:type) [value:int]: ",
        ]);
        assert_eq!(generated.parts.includes, ["string"]);
        assert_eq!(generated.parts.top, [
            "class Person {\n\
             public:\n    \
                 int age;\n    \
                 string name;\n    \
                 double height;\n    \
                 Person(int age_, string name_, double height_) : age(age_), name(name_), height(height_) {}\n\
             };"
        ]);
        assert_eq!(generated.parts.body, [
            "// (occurrence 1 (token 1)) Demonstrate class",
            "Person obj(0, \"hi\", 3.14);",
            "cout << \"obj.age = \" << obj.age << endl;",
        ]);
        assert!(state.types.contains("Person"));
        assert_eq!(state.last_type.as_deref(), Some("Person"));
        assert_eq!(state.last_var, None);
    }

    #[test]
    fn struct_defaults() {
        let generated = defaults(Declarations, "struct", 2);
        assert_eq!(generated.parts.top, [
            "struct MyType {\npublic:\n    int value;\n    MyType(int value_) : value(value_) {}\n};"
        ]);
        assert_eq!(generated.parts.body[1..], [
            "MyType obj(0);",
            "cout << \"obj.value = \" << obj.value << endl;",
        ]);
        assert!(generated.parts.includes.is_empty());
    }

    #[test]
    fn union_declares_a_variable() {
        let mut state = GenerationContext::default();
        let generated = generate(Declarations, "union", &mut state, &["", ""]);
        assert_eq!(generated.prompts[0], "[occurrence 1 (token 1)] Name for union [MyUnion]: ");
        assert_eq!(generated.parts.top, ["union MyUnion {\n    int value;\n};"]);
        assert_eq!(generated.parts.body, [
            "// (occurrence 1 (token 1)) Demonstrate union",
            "MyUnion MyUnion_u = {};",
            "MyUnion_u.value = 123;",
            "cout << \"MyUnion_u.value = \" << MyUnion_u.value << endl;",
        ]);
        assert_eq!(state.last_var.as_deref(), Some("MyUnion_u"));
    }

    #[test]
    fn members_without_type_are_ints() {
        let mut state = GenerationContext::default();
        let generated = generate(Declarations, "union", &mut state, &["P", "x, y:double, :bool"]);
        assert_eq!(generated.parts.top, ["union P {\n    int x;\n    double y;\n};"]);

        let generated = generate(Declarations, "struct", &mut state, &["Q", " , "]);
        assert_eq!(generated.parts.body[1], "Q obj(0);");
    }

    #[test]
    fn enum_class() {
        let generated = defaults(Declarations, "enum", 2);
        assert_eq!(generated.prompts, [
            "[occurrence 1 (token 1)] Enum name [Color]: ",
            "[occurrence 1 (token 1)] Comma-separated enumerators [Red,Green,Blue]: ",
        ]);
        assert_eq!(generated.parts.top, ["enum class Color { Red, Green, Blue };"]);
        assert_eq!(generated.parts.body[1..], [
            "Color c = Color::Red;",
            "cout << static_cast<int>(c) << endl;",
        ]);

        let mut state = GenerationContext::default();
        let generated = generate(Declarations, "enum", &mut state, &["Dir", " , "]);
        assert_eq!(generated.parts.top, ["enum class Dir { Red, Green, Blue };"]);
    }

    #[test]
    fn function_and_class_templates() {
        let generated = defaults(Declarations, "template", 3);
        assert_eq!(generated.prompts[1], "[occurrence 1 (token 1)] Template function name [add]: ");
        assert_eq!(generated.parts.top, [
            "template <typename T>\nT add(T a, T b) { return a + b; }"
        ]);
        assert_eq!(generated.parts.body[1..], ["cout << add(2, 3) << endl;"]);

        let mut state = GenerationContext::default();
        let generated = generate(Declarations, "template", &mut state, &["class", "", "U"]);
        assert_eq!(generated.parts.top, [
            "template <typename U>\nstruct Box { U value; Box(U v) : value(v) {} };"
        ]);
        assert_eq!(generated.parts.body, [
            "// (occurrence 1 (token 1)) Demonstrate class template",
            "Box<int> b(5);",
            "cout << b.value << endl;",
        ]);
        assert!(state.types.contains("Box"));
    }

    #[test]
    fn constexpr_forms() {
        let generated = defaults(Declarations, "constexpr", 1);
        assert_eq!(generated.parts.top, ["constexpr int square(int x){return x*x;}"]);
        assert_eq!(generated.parts.body[1..], ["cout << square(5) << endl;"]);

        let mut state = GenerationContext::default();
        let generated = generate(Declarations, "constexpr", &mut state, &["long cube(long x) { return x * x * x; }"]);
        assert_eq!(generated.parts.top, ["constexpr long cube(long x) { return x * x * x; }"]);
        assert_eq!(generated.parts.body[1], "cout << cube(5) << endl;");

        let generated = generate(Declarations, "constexpr", &mut state, &["2 * 21"]);
        assert!(generated.parts.top.is_empty());
        assert_eq!(generated.parts.body, [
            "// (occurrence 1 (token 1)) Demonstrate constexpr value",
            "constexpr auto v = 2 * 21;",
            "cout << v << endl;",
        ]);
    }

    #[test]
    fn function_names() {
        assert_eq!(function_name(DEFAULT_CONSTEXPR), Some("square"));
        assert_eq!(function_name("const int& pick(int a) { return a; }"), Some("pick"));
        assert_eq!(function_name("{ }"), None);
        assert_eq!(function_name("(x) { }"), None);
    }

    #[test]
    fn static_assert_goes_above_main() {
        let generated = defaults(Declarations, "static_assert", 2);
        assert_eq!(generated.parts.top, ["static_assert(sizeof(int) >= 4, \"int_size_ok\");"]);
        assert_eq!(generated.parts.body, [
            "// (occurrence 1 (token 1)) static_assert present above; runtime note:",
            "cout << \"static_assert present; program compiled successfully\" << endl;",
        ]);
    }

    #[test]
    fn fixed_recipes() {
        let generated = defaults(Declarations, "alignof", 0);
        assert_eq!(generated.parts.top, ["struct alignas(32) Aligned { char data[64]; };"]);
        assert_eq!(generated.parts.body[1..], [
            "Aligned a;",
            "cout << \"alignof(Aligned) = \" << alignof(Aligned) << endl;",
        ]);

        let generated = defaults(Declarations, "mutable", 1);
        assert_eq!(generated.parts.top, [
            "struct S { mutable int cached = 0; int value = 0; int get() const { return cached = value; } };"
        ]);
        assert_eq!(generated.parts.body[1], "S s{0, 7};");

        let generated = defaults(Declarations, "thread_local", 2);
        assert_eq!(generated.prompts[0], "[occurrence 1 (token 1)] Thread-local variable name [counter]: ");
        assert_eq!(generated.parts.top, ["thread_local int counter = 0;"]);
        assert_eq!(generated.parts.body[1], "cout << \"counter = \" << counter << endl;");
    }
}

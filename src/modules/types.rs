use anyhow::Result;

use crate::core::*;

pub struct Types;

impl Module for Types {
    fn init(&self, d: &mut Dictionary) -> Result<()> {
        d.define_recipe(FUNDAMENTAL_TYPES, &FUNDAMENTAL)?;
        d.define_recipe(&["auto"], &AUTO)
    }
}

const FUNDAMENTAL_TYPES: &[&str] = &[
    "int", "double", "float", "char", "long", "short", "signed", "unsigned", "bool", "wchar_t",
    "char16_t", "char32_t",
];

static FUNDAMENTAL: Recipe = Recipe {
    title: "Demonstrate type: {kw}",
    prompts: &[
        Prompt {
            key: "name",
            label: "Variable name for type '{kw}'",
            default: Fallback::FreshVar("x"),
        },
        Prompt {
            key: "init",
            label: "Initial value for {name}",
            default: Fallback::PerKeyword(
                &[
                    ("double", "3.14"),
                    ("float", "2.5f"),
                    ("char", "'a'"),
                    ("long", "123456789L"),
                    ("short", "42"),
                    ("bool", "true"),
                    ("wchar_t", "L'a'"),
                    ("char16_t", "u'a'"),
                    ("char32_t", "U'a'"),
                ],
                "0",
            ),
        },
    ],
    effects: &[Effect::Declare {
        ty: "{kw}",
        name: "{name}",
    }],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("{kw} {var} = {init};"),
        Line::Text("cout << \"{var} = \" << {var} << endl;"),
    ],
};

static AUTO: Recipe = Recipe {
    title: "Demonstrate auto (type deduction)",
    prompts: &[
        Prompt {
            key: "init",
            label: "Initializer expression for auto variable",
            default: Fallback::LastVar {
                with: "{last_var}",
                otherwise: "42",
            },
        },
        Prompt {
            key: "name",
            label: "Variable name",
            default: Fallback::FreshVar("v"),
        },
    ],
    effects: &[Effect::Declare {
        ty: "auto",
        name: "{name}",
    }],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("auto {var} = {init};"),
        Line::Text("cout << \"{var} (deduced) = \" << {var} << endl;"),
    ],
};

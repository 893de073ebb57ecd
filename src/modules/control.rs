use anyhow::Result;

use crate::core::*;

pub struct Control;

impl Module for Control {
    fn init(&self, d: &mut Dictionary) -> Result<()> {
        d.define_recipe(&["if", "else"], &BRANCH)?;
        d.define_recipe(&["for"], &FOR_LOOP)?;
        d.define_recipe(&["while"], &WHILE_LOOP)?;
        d.define_recipe(&["do"], &DO_WHILE_LOOP)?;
        d.define_recipe(&["switch"], &SWITCH)?;
        d.define_recipe(&["return"], &RETURN)
    }
}

static BRANCH: Recipe = Recipe {
    title: "Demonstrate if/else",
    prompts: &[
        Prompt {
            key: "cond",
            label: "Condition expression for if",
            default: Fallback::LastVar {
                with: "{last_var} > 0",
                otherwise: "x > 0",
            },
        },
        Prompt {
            key: "then",
            label: "Then-branch (single statement)",
            default: Fallback::Text("cout << \"then\" << endl;"),
        },
        Prompt {
            key: "else",
            label: "Else-branch (single statement)",
            default: Fallback::Text("cout << \"else\" << endl;"),
        },
    ],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("if ({cond}) {"),
        Line::Text("    {then}"),
        Line::Text("} else {"),
        Line::Text("    {else}"),
        Line::Text("}"),
    ],
};

/// The counter is declared ahead of the loop as well, so later defaults
/// referring to it stay in scope.
static FOR_LOOP: Recipe = Recipe {
    title: "Demonstrate for loop",
    prompts: &[
        Prompt {
            key: "init",
            label: "Initializer for for-loop",
            default: Fallback::Text("int i = 0"),
        },
        Prompt {
            key: "cond",
            label: "Condition for for-loop",
            default: Fallback::Text("i < 5"),
        },
        Prompt {
            key: "step",
            label: "Increment expression",
            default: Fallback::Text("++i"),
        },
        Prompt {
            key: "body",
            label: "Body statement",
            default: Fallback::Text("cout << i << endl;"),
        },
    ],
    effects: &[Effect::Track("init")],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("{init};"),
        Line::Text("for ({init}; {cond}; {step}) {"),
        Line::Text("    {body}"),
        Line::Text("}"),
    ],
};

const INIT_PROMPT: Prompt = Prompt {
    key: "init",
    label: "Initializer (e.g., int n = 3)",
    default: Fallback::Text("int n = 3"),
};

const BODY_PROMPT: Prompt = Prompt {
    key: "body",
    label: "Loop body",
    default: Fallback::Text("cout << n << endl;"),
};

static WHILE_LOOP: Recipe = Recipe {
    title: "Demonstrate while",
    prompts: &[
        INIT_PROMPT,
        Prompt {
            key: "cond",
            label: "Condition",
            default: Fallback::Text("n-- > 0"),
        },
        BODY_PROMPT,
    ],
    effects: &[Effect::Track("init")],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("{init};"),
        Line::Text("while ({cond}) {"),
        Line::Text("    {body}"),
        Line::Text("}"),
    ],
};

static DO_WHILE_LOOP: Recipe = Recipe {
    title: "Demonstrate do/while",
    prompts: &[
        INIT_PROMPT,
        Prompt {
            key: "cond",
            label: "Condition (after body)",
            default: Fallback::Text("n-- > 0"),
        },
        BODY_PROMPT,
    ],
    effects: &[Effect::Track("init")],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("{init};"),
        Line::Text("do {"),
        Line::Text("    {body}"),
        Line::Text("} while ({cond});"),
    ],
};

static SWITCH: Recipe = Recipe {
    title: "Demonstrate switch",
    prompts: &[
        Prompt {
            key: "init",
            label: "Initializer (e.g., int n = 2)",
            default: Fallback::Text("int n = 2"),
        },
        Prompt {
            key: "expr",
            label: "Expression to switch on",
            default: Fallback::Text("n"),
        },
        Prompt {
            key: "cases",
            label: "Comma-separated case values",
            default: Fallback::Text("1,2,3"),
        },
    ],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("{init};"),
        Line::Text("switch ({expr}) {"),
        Line::Each("cases", "    case {item}: cout << \"case {item}\" << endl; break;"),
        Line::Text("    default: cout << \"default\" << endl; break;"),
        Line::Text("}"),
    ],
};

static RETURN: Recipe = Recipe {
    title: "Demonstrate return",
    prompts: &[Prompt {
        key: "expr",
        label: "Expression to return from main",
        default: Fallback::Text("0"),
    }],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[
        Line::Text("cout << \"About to return: \" << ({expr}) << endl;"),
        Line::Text("return {expr};"),
    ],
};

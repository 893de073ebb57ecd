use anyhow::Result;

use crate::core::*;

pub struct AlternativeTokens;

impl Module for AlternativeTokens {
    fn init(&self, d: &mut Dictionary) -> Result<()> {
        d.define_native(&["and", "or", "not"], interpret_logical)?;
        d.define_recipe(
            &[
                "xor", "bitand", "bitor", "compl", "not_eq", "and_eq", "or_eq", "xor_eq",
            ],
            &TOKEN,
        )
    }
}

/// Operands of the default expression, declared unless a variable of the
/// same name already exists in this program.
const OPERANDS: [(&str, &str); 2] = [("x", "1"), ("y", "2")];

fn interpret_logical(req: &mut Request<'_>) -> Result<Parts> {
    let default = match &req.state.last_var {
        Some(var) => format!("{var} > 0 and true"),
        None => "x > 0 and y > 0".to_owned(),
    };
    let expr = req.ask(
        "A simple Boolean expression (you may use alternative tokens)",
        &default,
    )?;

    let mut body = vec![format!(
        "// ({}) Demonstrate alternative tokens like 'and'/'or'/'not'",
        req.tag
    )];

    let missing = OPERANDS
        .iter()
        .filter(|(name, _)| !req.state.vars.contains_key(*name))
        .map(|(name, value)| format!("{name} = {value}"))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        body.push(format!("int {};", missing.join(", ")));
        for (name, _) in OPERANDS {
            req.state.vars.entry(name.to_owned()).or_insert_with(|| "int".to_owned());
        }
    }

    body.push(format!(
        "if ({expr}) cout << \"expression true\" << endl; else cout << \"expression false\" << endl;"
    ));

    Ok(Parts {
        body,
        ..Default::default()
    })
}

static TOKEN: Recipe = Recipe {
    title: "Demonstrate alternative token: {kw}",
    prompts: &[],
    effects: &[],
    includes: &[],
    top: &[],
    body: &[Line::Text("cout << \"Alternative token: {kw}\" << endl;")],
};

use std::io::Write;

use anyhow::Result;
use console::style;

use snipgen::Context;
use snipgen::core::store::parse_params;
use snipgen::core::{Edit, KeywordTemplate, Param, SaveStatus, catalog, normalize};
use snipgen::error::{StoreError, is_cancelled};

use crate::commands::{Command, EditKind, is_yes};
use crate::util::{columns, pad};

const PROMPT: &str = "snipgen> ";
const WORDS_PER_LINE: usize = 8;

/// Top-level command loop.
pub struct Shell<'a, W> {
    ctx: Context<'a>,
    out: W,
}

impl<'a, W: Write> Shell<'a, W> {
    pub fn new(ctx: Context<'a>, out: W) -> Self {
        Self { ctx, out }
    }

    /// Reads commands until `exit` or the end of input.
    pub fn run(&mut self) -> Result<()> {
        self.ctx.prompter.message(&format!(
            "{} Type a line with C++17 keywords, `:help` for commands or `exit` to quit.",
            style("snipgen").bold()
        ))?;

        loop {
            let Some(line) = self.ctx.prompter.read_line(PROMPT)? else {
                return Ok(());
            };

            let command = Command::parse(&line);
            if command == Command::Exit {
                return Ok(());
            }

            match self.execute(command) {
                Ok(()) => {}
                Err(e) if is_cancelled(&e) => {
                    tracing::debug!("input ended during a prompt");
                    self.ctx.prompter.message("Input ended, exiting.")?;
                    return Ok(());
                }
                Err(e) => eprintln!("{} {e:#}", style("error:").red().bold()),
            }
        }
    }

    fn execute(&mut self, command: Command<'_>) -> Result<()> {
        match command {
            Command::Empty | Command::Exit => Ok(()),
            Command::Help => self.help(),
            Command::List => self.list(),
            Command::Search(term) => self.search(term),
            Command::Define(name) => self.define(name),
            Command::Edit(name) => self.edit(name),
            Command::Remove(name) => self.remove(name),
            Command::Unknown(verb) => {
                self.ctx.prompter.message(&format!(
                    "Unknown command `:{verb}`. Type `:help` for the list of commands."
                ))?;
                Ok(())
            }
            Command::Generate(line) => match self.ctx.process_line(line)? {
                Some(program) => {
                    let heading = style("--- Generated program ---").bold();
                    self.print(&format!("\n{heading}\n{program}\n"))
                }
                None => {
                    self.ctx.prompter.message(
                        "No known keywords found in the line. Use `:add` to define a custom one.",
                    )?;
                    Ok(())
                }
            },
        }
    }

    fn help(&mut self) -> Result<()> {
        let mut text = format!(
            "{}\n\
             \x20 <line>            generate a program for every keyword of the line\n\
             \x20 :add [name]       define or replace a custom keyword (alias :define)\n\
             \x20 :list             list custom keywords\n\
             \x20 :search <term>    find custom keywords by name or snippet text\n\
             \x20 :edit [name]      change a default, add a parameter or replace the snippet\n\
             \x20 :remove [name]    delete a custom keyword\n\
             \x20 :help             show this message\n\
             \x20 exit              quit\n\n",
            style("Commands:").bold()
        );

        text.push_str(&format!("{}\n", style("C++17 keywords:").bold()));
        text.push_str(&columns(&catalog().sorted(), WORDS_PER_LINE));
        text.push_str(&format!("\n{}\n", style("Keywords with tailored examples:").bold()));
        text.push_str(&columns(&self.ctx.dictionary.words(), WORDS_PER_LINE));

        if !self.ctx.store.is_empty() {
            let custom = self.ctx.store.list().map(|(name, _)| name).collect::<Vec<_>>();
            text.push_str(&format!("\n{}\n", style("Custom keywords:").bold()));
            text.push_str(&columns(&custom, WORDS_PER_LINE));
        }

        self.print(&text)
    }

    fn list(&mut self) -> Result<()> {
        if self.ctx.store.is_empty() {
            self.ctx.prompter.message("No custom keywords defined.")?;
            return Ok(());
        }

        let table = format_table(self.ctx.store.list());
        self.print(&table)
    }

    fn search(&mut self, term: &str) -> Result<()> {
        let term = match term {
            "" => self.ctx.prompter.ask("Search term", "")?,
            term => term.to_owned(),
        };

        let matches = self.ctx.store.search(&term);
        if matches.is_empty() {
            self.ctx
                .prompter
                .message(&format!("No custom keywords match '{term}'."))?;
            return Ok(());
        }

        let table = format_table(matches);
        self.print(&table)
    }

    fn define(&mut self, name: Option<&str>) -> Result<()> {
        let name = self.keyword_name(name)?;
        let name = self.ctx.store.validate_name(&name)?;

        if self.ctx.store.contains(&name) {
            let answer = self
                .ctx
                .prompter
                .ask(&format!("Keyword '{name}' already exists. Overwrite? (y/n)"), "n")?;
            if !is_yes(&answer) {
                self.ctx.prompter.message("Kept the existing definition.")?;
                return Ok(());
            }
        }

        let params = self
            .ctx
            .prompter
            .ask("Parameters as name=default, comma separated", "")?;
        let params = parse_params(&params);
        let snippet = self.read_snippet()?;

        let defined = self.ctx.store.define(&name, params, snippet)?;
        let action = if defined.replaced { "Replaced" } else { "Defined" };
        self.report(
            defined.status,
            &format!("{action} keyword '{}'", defined.name),
        )
    }

    fn edit(&mut self, name: Option<&str>) -> Result<()> {
        let name = normalize(&self.keyword_name(name)?);
        let Some(template) = self.ctx.store.get(&name).cloned() else {
            return Err(StoreError::UnknownKeyword(name).into());
        };

        let summary = describe(&name, &template);
        self.print(&summary)?;

        let kind = self
            .ctx
            .prompter
            .ask("Edit what? (default/param/snippet)", "snippet")?;
        let edit = match EditKind::parse(&kind) {
            Some(EditKind::Default) => {
                let first = template.params.first();
                let param = self.ctx.prompter.ask(
                    "Parameter name",
                    first.map(|p| p.name.as_str()).unwrap_or_default(),
                )?;
                let current = template.param(&param).map(|p| p.default.as_str());
                let value = self.ctx.prompter.ask(
                    &format!("New default for '{param}'"),
                    current.unwrap_or_default(),
                )?;
                Edit::SetDefault {
                    param,
                    value: value.trim().to_owned(),
                }
            }
            Some(EditKind::Param) => {
                let param = self.ctx.prompter.ask("New parameter name", "")?;
                let default = self.ctx.prompter.ask("Default value", "")?;
                Edit::AddParam(Param::new(param.trim(), default.trim()))
            }
            Some(EditKind::Snippet) => Edit::ReplaceSnippet(self.read_snippet()?),
            None => {
                self.ctx
                    .prompter
                    .message(&format!("Unknown edit kind '{kind}', nothing changed."))?;
                return Ok(());
            }
        };

        let status = self.ctx.store.edit(&name, edit)?;
        self.report(status, &format!("Updated keyword '{name}'"))
    }

    fn remove(&mut self, name: Option<&str>) -> Result<()> {
        let name = normalize(&self.keyword_name(name)?);
        let status = self.ctx.store.remove(&name)?;
        self.report(status, &format!("Removed keyword '{name}'"))
    }

    fn keyword_name(&mut self, name: Option<&str>) -> Result<String> {
        match name {
            Some(name) => Ok(name.to_owned()),
            None => self.ctx.prompter.ask("Keyword name", ""),
        }
    }

    fn read_snippet(&mut self) -> Result<String> {
        let lines = self
            .ctx
            .prompter
            .read_block("Enter the snippet, use {param} for parameters. Finish with a single '.' line:")?;

        let mut snippet = lines.join("\n");
        if !snippet.is_empty() {
            snippet.push('\n');
        }
        Ok(snippet)
    }

    fn report(&mut self, status: SaveStatus, action: &str) -> Result<()> {
        match status {
            SaveStatus::Saved => self.ctx.prompter.message(&format!("{action}."))?,
            SaveStatus::Failed(e) => eprintln!(
                "{} {action}, but the store could not be saved: {e}",
                style("warning:").yellow().bold()
            ),
        }
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

fn format_table<'k, I>(keywords: I) -> String
where
    I: IntoIterator<Item = (&'k str, &'k KeywordTemplate)>,
{
    let keywords = keywords.into_iter().collect::<Vec<_>>();
    let width = keywords
        .iter()
        .map(|(name, _)| unicode_width::UnicodeWidthStr::width(*name))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    for (name, template) in keywords {
        let params = template
            .params
            .iter()
            .map(|p| format!("{}={}", p.name, p.default))
            .collect::<Vec<_>>()
            .join(", ");
        let first_line = template.snippet.lines().next().unwrap_or_default();
        out.push_str(&format!(
            "{}  ({params})  {}\n",
            pad(name, width),
            style(first_line).dim()
        ));
    }
    out
}

fn describe(name: &str, template: &KeywordTemplate) -> String {
    let mut out = format!("{}\n", style(format!("Keyword '{name}'")).bold());
    for param in &template.params {
        out.push_str(&format!("  param {} = {}\n", param.name, param.default));
    }
    for line in template.snippet.lines() {
        out.push_str(&format!("  | {line}\n"));
    }
    out
}

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use snipgen::core::Prompter;

/// Terminal prompter with line editing and history.
pub struct LineReader {
    editor: DefaultEditor,
}

impl LineReader {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()?;
        Ok(Self { editor })
    }
}

impl Prompter for LineReader {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                {
                    let line = line.trim();
                    if !line.is_empty() {
                        self.editor.add_history_entry(line.to_owned()).ok();
                    }
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)),
        }
    }

    fn message(&mut self, text: &str) -> std::io::Result<()> {
        println!("{text}");
        Ok(())
    }
}

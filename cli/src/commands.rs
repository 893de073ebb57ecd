/// One line typed at the top-level prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Exit,
    Help,
    List,
    Search(&'a str),
    Define(Option<&'a str>),
    Edit(Option<&'a str>),
    Remove(Option<&'a str>),
    Unknown(&'a str),
    Generate(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if matches!(line, "exit" | "quit") {
            return Self::Exit;
        }

        let Some(command) = line.strip_prefix(':') else {
            return Self::Generate(line);
        };

        let (verb, arg) = match command.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, Some(arg.trim()).filter(|arg| !arg.is_empty())),
            None => (command, None),
        };

        match verb {
            "help" | "h" => Self::Help,
            "list" | "ls" => Self::List,
            "search" => Self::Search(arg.unwrap_or_default()),
            "add" | "define" => Self::Define(arg),
            "edit" => Self::Edit(arg),
            "remove" | "rm" => Self::Remove(arg),
            "exit" | "quit" => Self::Exit,
            _ => Self::Unknown(verb),
        }
    }
}

/// What `:edit` changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Default,
    Param,
    Snippet,
}

impl EditKind {
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "default" | "d" => Some(Self::Default),
            "param" | "p" | "add" => Some(Self::Param),
            "snippet" | "s" => Some(Self::Snippet),
            _ => None,
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verbs() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse(" exit "), Command::Exit);
        assert_eq!(Command::parse(":quit"), Command::Exit);
        assert_eq!(Command::parse(":help"), Command::Help);
        assert_eq!(Command::parse(":ls"), Command::List);
        assert_eq!(Command::parse(":search  vec "), Command::Search("vec"));
        assert_eq!(Command::parse(":search"), Command::Search(""));
        assert_eq!(Command::parse(":add greet"), Command::Define(Some("greet")));
        assert_eq!(Command::parse(":define"), Command::Define(None));
        assert_eq!(Command::parse(":edit\tgreet"), Command::Edit(Some("greet")));
        assert_eq!(Command::parse(":rm greet"), Command::Remove(Some("greet")));
        assert_eq!(Command::parse(":frobnicate x"), Command::Unknown("frobnicate"));
    }

    #[test]
    fn everything_else_is_generated() {
        assert_eq!(Command::parse("int int"), Command::Generate("int int"));
        assert_eq!(Command::parse("exit now"), Command::Generate("exit now"));
    }

    #[test]
    fn edit_kinds_and_confirmations() {
        assert_eq!(EditKind::parse(" Default "), Some(EditKind::Default));
        assert_eq!(EditKind::parse("p"), Some(EditKind::Param));
        assert_eq!(EditKind::parse("snippet"), Some(EditKind::Snippet));
        assert_eq!(EditKind::parse("other"), None);
        assert!(is_yes(" Y"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}

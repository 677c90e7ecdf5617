//! Parsing of editor command lines.
//!
//! A command line is split on whitespace into [`Token`]s that remember their
//! byte range in the line, so every argument error can point at the token
//! that caused it. Blank lines and lines whose first token starts with `#`
//! are not commands.
//!
//! Existing methods are referenced by signature: the method name followed by
//! `type name` parameter pairs. Only the parameter types take part in the
//! lookup.

use std::{ops::Range, path::PathBuf};

use thiserror::Error;

use classweave::{Access, Parameter, RelationshipType, Signature};

/// A whitespace-delimited word of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    text: &'a str,
    span: Range<usize>,
}

impl<'a> Token<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte range of the token within its line.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// Splits `line` into tokens.
///
/// # Examples
///
/// ```
/// use classweave_cli::command::tokenize;
///
/// let tokens = tokenize("  addc   Car ");
/// assert_eq!(tokens[0].text(), "addc");
/// assert_eq!(tokens[1].span(), 9..12);
/// ```
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (idx, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                tokens.push(Token {
                    text: &line[begin..idx],
                    span: begin..idx,
                });
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(begin) = start {
        tokens.push(Token {
            text: &line[begin..],
            span: begin..line.len(),
        });
    }
    tokens
}

/// An invalid command line, located by byte span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
    span: Range<usize>,
    help: Option<String>,
}

impl CommandError {
    fn new(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            span,
            help: None,
        }
    }

    fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Moves the span by `offset` bytes, for lines taken from a larger source.
    pub fn offset(mut self, offset: usize) -> Self {
        self.span = self.span.start + offset..self.span.end + offset;
        self
    }
}

/// Reference entry for one command.
#[derive(Debug, Clone, Copy)]
pub struct CommandHelp {
    pub keyword: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

const fn entry(keyword: &'static str, usage: &'static str, summary: &'static str) -> CommandHelp {
    CommandHelp {
        keyword,
        usage,
        summary,
    }
}

/// Every command the editor understands.
pub const COMMANDS: &[CommandHelp] = &[
    entry("help", "help", "Show all commands"),
    entry("exit", "exit", "Leave the editor"),
    entry("quit", "quit", "Leave the editor"),
    entry("list", "list", "List class names"),
    entry("display", "display [class]", "Display all classes, or one class"),
    entry("addc", "addc <class>", "Create a class"),
    entry("renamec", "renamec <old> <new>", "Rename a class"),
    entry("deletec", "deletec <class>", "Delete a class and its relationships"),
    entry("addf", "addf <class> <type> <name> [access]", "Create a field"),
    entry("renamef", "renamef <class> <old> <new>", "Rename a field"),
    entry("deletef", "deletef <class> <name>", "Delete a field"),
    entry("retypef", "retypef <class> <name> <type>", "Change the type of a field"),
    entry("accessf", "accessf <class> <name> <access>", "Change the access of a field"),
    entry(
        "addm",
        "addm <class> <return> <name> [<ptype> <pname>]...",
        "Create a method",
    ),
    entry(
        "renamem",
        "renamem <class> <name> [<ptype> <pname>]... <new>",
        "Rename a method",
    ),
    entry(
        "deletem",
        "deletem <class> <name> [<ptype> <pname>]...",
        "Delete a method",
    ),
    entry(
        "retypem",
        "retypem <class> <name> [<ptype> <pname>]... <type>",
        "Change the return type of a method",
    ),
    entry(
        "accessm",
        "accessm <class> <name> [<ptype> <pname>]... <access>",
        "Change the access of a method",
    ),
    entry(
        "addp",
        "addp <class> <name> [<ptype> <pname>]... <type> <param>",
        "Append a parameter to a method",
    ),
    entry(
        "deletep",
        "deletep <class> <name> [<ptype> <pname>]... <type> <param>",
        "Remove a parameter from a method",
    ),
    entry("addr", "addr <from> <to> <kind>", "Create a relationship"),
    entry("deleter", "deleter <from> <to>", "Delete a relationship"),
    entry("save", "save [file]", "Save the diagram (reuses the last file)"),
    entry("load", "load <file>", "Load a diagram, replacing the current one"),
];

/// A parsed editor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    List,
    Display(Option<String>),

    AddClass(String),
    RenameClass {
        old: String,
        new: String,
    },
    DeleteClass(String),

    AddField {
        class: String,
        ty: String,
        name: String,
        access: Option<Access>,
    },
    RenameField {
        class: String,
        old: String,
        new: String,
    },
    DeleteField {
        class: String,
        name: String,
    },
    RetypeField {
        class: String,
        name: String,
        ty: String,
    },
    AccessField {
        class: String,
        name: String,
        access: Access,
    },

    AddMethod {
        class: String,
        return_type: String,
        name: String,
        params: Vec<Parameter>,
    },
    RenameMethod {
        class: String,
        method: Signature,
        new: String,
    },
    DeleteMethod {
        class: String,
        method: Signature,
    },
    RetypeMethod {
        class: String,
        method: Signature,
        ty: String,
    },
    AccessMethod {
        class: String,
        method: Signature,
        access: Access,
    },
    AddParameter {
        class: String,
        method: Signature,
        param: Parameter,
    },
    DeleteParameter {
        class: String,
        method: Signature,
        param: Parameter,
    },

    AddRelationship {
        from: String,
        to: String,
        kind: RelationshipType,
    },
    DeleteRelationship {
        from: String,
        to: String,
    },

    Save(Option<PathBuf>),
    Load(PathBuf),
}

impl Command {
    /// Parses one command line. Returns `Ok(None)` for blank and comment lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use classweave_cli::command::Command;
    ///
    /// let command = Command::parse("addc Car").unwrap();
    /// assert_eq!(command, Some(Command::AddClass("Car".to_string())));
    /// assert_eq!(Command::parse("# a comment").unwrap(), None);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] pointing at the offending token for unknown
    /// commands, wrong argument counts, unpaired parameter lists, invalid
    /// parameter names, and unknown access modifiers or relationship kinds.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let tokens = tokenize(line);
        let Some((keyword, rest)) = tokens.split_first() else {
            return Ok(None);
        };
        if keyword.text.starts_with('#') {
            return Ok(None);
        }

        let keyword_text = keyword.text.to_ascii_lowercase();
        let Some(help) = COMMANDS.iter().find(|entry| entry.keyword == keyword_text) else {
            return Err(CommandError::new(
                format!("unknown command `{}`", keyword.text),
                keyword.span(),
            )
            .with_help("type `help` to list the available commands"));
        };
        let args = ArgList {
            tokens: rest,
            end: line.trim_end().len(),
            usage: help.usage,
        };

        let command = match help.keyword {
            "help" => {
                args.exactly(0)?;
                Self::Help
            }
            "exit" | "quit" => {
                args.exactly(0)?;
                Self::Exit
            }
            "list" => {
                args.exactly(0)?;
                Self::List
            }
            "display" => {
                let t = args.between(0, 1)?;
                Self::Display(t.first().map(|tok| tok.text.to_string()))
            }
            "addc" => {
                let t = args.exactly(1)?;
                Self::AddClass(owned(&t[0]))
            }
            "renamec" => {
                let t = args.exactly(2)?;
                Self::RenameClass {
                    old: owned(&t[0]),
                    new: owned(&t[1]),
                }
            }
            "deletec" => {
                let t = args.exactly(1)?;
                Self::DeleteClass(owned(&t[0]))
            }
            "addf" => {
                let t = args.between(3, 4)?;
                Self::AddField {
                    class: owned(&t[0]),
                    ty: owned(&t[1]),
                    name: owned(&t[2]),
                    access: t.get(3).map(parse_access).transpose()?,
                }
            }
            "renamef" => {
                let t = args.exactly(3)?;
                Self::RenameField {
                    class: owned(&t[0]),
                    old: owned(&t[1]),
                    new: owned(&t[2]),
                }
            }
            "deletef" => {
                let t = args.exactly(2)?;
                Self::DeleteField {
                    class: owned(&t[0]),
                    name: owned(&t[1]),
                }
            }
            "retypef" => {
                let t = args.exactly(3)?;
                Self::RetypeField {
                    class: owned(&t[0]),
                    name: owned(&t[1]),
                    ty: owned(&t[2]),
                }
            }
            "accessf" => {
                let t = args.exactly(3)?;
                Self::AccessField {
                    class: owned(&t[0]),
                    name: owned(&t[1]),
                    access: parse_access(&t[2])?,
                }
            }
            "addm" => {
                let t = args.at_least(3)?;
                Self::AddMethod {
                    class: owned(&t[0]),
                    return_type: owned(&t[1]),
                    name: owned(&t[2]),
                    params: args.parameters(&t[3..])?,
                }
            }
            "renamem" => {
                let (class, method, last) = args.method_then_one()?;
                Self::RenameMethod {
                    class,
                    method,
                    new: owned(last),
                }
            }
            "deletem" => {
                let t = args.at_least(2)?;
                Self::DeleteMethod {
                    class: owned(&t[0]),
                    method: args.signature(&t[1..])?,
                }
            }
            "retypem" => {
                let (class, method, last) = args.method_then_one()?;
                Self::RetypeMethod {
                    class,
                    method,
                    ty: owned(last),
                }
            }
            "accessm" => {
                let (class, method, last) = args.method_then_one()?;
                Self::AccessMethod {
                    class,
                    method,
                    access: parse_access(last)?,
                }
            }
            "addp" | "deletep" => {
                let t = args.at_least(4)?;
                let split = t.len() - 2;
                let class = owned(&t[0]);
                let method = args.signature(&t[1..split])?;
                let param = parse_parameter(&t[split], &t[split + 1])?;
                if help.keyword == "addp" {
                    Self::AddParameter {
                        class,
                        method,
                        param,
                    }
                } else {
                    Self::DeleteParameter {
                        class,
                        method,
                        param,
                    }
                }
            }
            "addr" => {
                let t = args.exactly(3)?;
                Self::AddRelationship {
                    from: owned(&t[0]),
                    to: owned(&t[1]),
                    kind: t[2].text.parse().map_err(|err: classweave::ModelError| {
                        CommandError::new(err.to_string(), t[2].span())
                    })?,
                }
            }
            "deleter" => {
                let t = args.exactly(2)?;
                Self::DeleteRelationship {
                    from: owned(&t[0]),
                    to: owned(&t[1]),
                }
            }
            "save" => {
                let t = args.between(0, 1)?;
                Self::Save(t.first().map(|tok| PathBuf::from(tok.text)))
            }
            "load" => {
                let t = args.exactly(1)?;
                Self::Load(PathBuf::from(t[0].text))
            }
            other => {
                return Err(CommandError::new(
                    format!("command `{other}` is not available"),
                    keyword.span(),
                ));
            }
        };
        Ok(Some(command))
    }
}

fn owned(token: &Token<'_>) -> String {
    token.text.to_string()
}

fn parse_access(token: &Token<'_>) -> Result<Access, CommandError> {
    token
        .text
        .parse()
        .map_err(|err: classweave::ModelError| CommandError::new(err.to_string(), token.span()))
}

fn parse_parameter(ty: &Token<'_>, name: &Token<'_>) -> Result<Parameter, CommandError> {
    Parameter::new(ty.text, name.text)
        .map_err(|err| CommandError::new(err.to_string(), name.span()))
}

/// The arguments following a command keyword.
struct ArgList<'t, 'a> {
    tokens: &'t [Token<'a>],
    /// End of the meaningful text, where missing arguments are reported.
    end: usize,
    usage: &'static str,
}

impl<'t, 'a> ArgList<'t, 'a> {
    fn usage_help(&self) -> String {
        format!("usage: {}", self.usage)
    }

    fn missing(&self) -> CommandError {
        CommandError::new("missing arguments", self.end..self.end).with_help(self.usage_help())
    }

    fn unexpected(&self, token: &Token<'_>) -> CommandError {
        CommandError::new(format!("unexpected argument `{}`", token.text), token.span())
            .with_help(self.usage_help())
    }

    fn exactly(&self, count: usize) -> Result<&'t [Token<'a>], CommandError> {
        self.between(count, count)
    }

    fn between(&self, min: usize, max: usize) -> Result<&'t [Token<'a>], CommandError> {
        if self.tokens.len() < min {
            return Err(self.missing());
        }
        if let Some(extra) = self.tokens.get(max) {
            return Err(self.unexpected(extra));
        }
        Ok(self.tokens)
    }

    fn at_least(&self, min: usize) -> Result<&'t [Token<'a>], CommandError> {
        if self.tokens.len() < min {
            return Err(self.missing());
        }
        Ok(self.tokens)
    }

    /// Splits `<class> <name> [<ptype> <pname>]... <last>`.
    fn method_then_one(&self) -> Result<(String, Signature, &'t Token<'a>), CommandError> {
        let t = self.at_least(3)?;
        let last = &t[t.len() - 1];
        let method = self.signature(&t[1..t.len() - 1])?;
        Ok((owned(&t[0]), method, last))
    }

    /// Reads `<name> [<ptype> <pname>]...` as a method signature.
    fn signature(&self, tokens: &[Token<'_>]) -> Result<Signature, CommandError> {
        let Some((name, pairs)) = tokens.split_first() else {
            return Err(self.missing());
        };
        self.check_pairs(pairs)?;
        Ok(Signature::new(
            name.text,
            pairs.chunks(2).map(|pair| pair[0].text),
        ))
    }

    fn parameters(&self, tokens: &[Token<'_>]) -> Result<Vec<Parameter>, CommandError> {
        self.check_pairs(tokens)?;
        tokens
            .chunks(2)
            .map(|pair| parse_parameter(&pair[0], &pair[1]))
            .collect()
    }

    fn check_pairs(&self, tokens: &[Token<'_>]) -> Result<(), CommandError> {
        if tokens.len() % 2 == 0 {
            return Ok(());
        }
        let dangling = &tokens[tokens.len() - 1];
        Err(CommandError::new(
            format!("parameter type `{}` has no name", dangling.text),
            dangling.span(),
        )
        .with_help(self.usage_help()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    fn parse_err(line: &str) -> CommandError {
        Command::parse(line).unwrap_err()
    }

    fn param(ty: &str, name: &str) -> Parameter {
        Parameter::new(ty, name).unwrap()
    }

    #[test]
    fn test_tokenize_spans() {
        let line = "addf Car  int speed";
        let tokens = tokenize(line);
        let texts: Vec<_> = tokens.iter().map(Token::text).collect();
        assert_eq!(texts, ["addf", "Car", "int", "speed"]);
        for token in &tokens {
            assert_eq!(&line[token.span()], token.text());
        }
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t").unwrap(), None);
        assert_eq!(Command::parse("# addc Car").unwrap(), None);
        assert_eq!(Command::parse("#addc Car").unwrap(), None);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(parse("HELP"), Command::Help);
        assert_eq!(parse("Quit"), Command::Exit);
        assert_eq!(parse("exit"), Command::Exit);
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_err("  showgui now");
        assert_eq!(err.message(), "unknown command `showgui`");
        assert_eq!(err.span(), 2..9);
        assert!(err.help().is_some());
    }

    #[test]
    fn test_argument_counts() {
        let missing = parse_err("renamec Car ");
        assert_eq!(missing.message(), "missing arguments");
        assert_eq!(missing.span(), 11..11);
        assert_eq!(missing.help(), Some("usage: renamec <old> <new>"));

        let extra = parse_err("addc Car Wheel");
        assert_eq!(extra.message(), "unexpected argument `Wheel`");
        assert_eq!(extra.span(), 9..14);
    }

    #[test]
    fn test_field_commands() {
        assert_eq!(
            parse("addf Car int speed"),
            Command::AddField {
                class: "Car".to_string(),
                ty: "int".to_string(),
                name: "speed".to_string(),
                access: None,
            }
        );
        assert_eq!(
            parse("addf Car int speed -"),
            Command::AddField {
                class: "Car".to_string(),
                ty: "int".to_string(),
                name: "speed".to_string(),
                access: Some(Access::Private),
            }
        );
        let err = parse_err("accessf Car speed friend");
        assert_eq!(err.span(), 18..24);
    }

    #[test]
    fn test_add_method_parameters() {
        assert_eq!(
            parse("addm Car void drive int km bool fast"),
            Command::AddMethod {
                class: "Car".to_string(),
                return_type: "void".to_string(),
                name: "drive".to_string(),
                params: vec![param("int", "km"), param("bool", "fast")],
            }
        );

        let err = parse_err("addm Car void drive int km bool");
        assert_eq!(err.message(), "parameter type `bool` has no name");
        assert_eq!(err.span(), 27..31);
    }

    #[test]
    fn test_method_references_use_types_only() {
        assert_eq!(
            parse("renamem Car drive int km bool fast go"),
            Command::RenameMethod {
                class: "Car".to_string(),
                method: Signature::new("drive", ["int", "bool"]),
                new: "go".to_string(),
            }
        );
        assert_eq!(
            parse("deletem Car stop"),
            Command::DeleteMethod {
                class: "Car".to_string(),
                method: Signature::new("stop", Vec::<String>::new()),
            }
        );
        assert_eq!(
            parse("accessm Car stop #"),
            Command::AccessMethod {
                class: "Car".to_string(),
                method: Signature::new("stop", Vec::<String>::new()),
                access: Access::Protected,
            }
        );
        assert!(Command::parse("retypem Car drive int int").is_err());
    }

    #[test]
    fn test_parameter_commands() {
        assert_eq!(
            parse("addp Car drive int km bool fast"),
            Command::AddParameter {
                class: "Car".to_string(),
                method: Signature::new("drive", ["int"]),
                param: param("bool", "fast"),
            }
        );
        assert_eq!(
            parse("deletep Car drive int km"),
            Command::DeleteParameter {
                class: "Car".to_string(),
                method: Signature::new("drive", Vec::<String>::new()),
                param: param("int", "km"),
            }
        );
        assert_eq!(parse_err("addp Car drive int").message(), "missing arguments");
    }

    #[test]
    fn test_relationship_commands() {
        assert_eq!(
            parse("addr Car Wheel Composition"),
            Command::AddRelationship {
                from: "Car".to_string(),
                to: "Wheel".to_string(),
                kind: RelationshipType::Composition,
            }
        );
        let err = parse_err("addr Car Wheel friendship");
        assert_eq!(err.span(), 15..25);
    }

    #[test]
    fn test_persistence_commands() {
        assert_eq!(parse("save"), Command::Save(None));
        assert_eq!(
            parse("save out.json"),
            Command::Save(Some(PathBuf::from("out.json")))
        );
        assert_eq!(parse("load in.json"), Command::Load(PathBuf::from("in.json")));
        assert!(Command::parse("load").is_err());
    }

    #[test]
    fn test_offset() {
        let err = parse_err("addc").offset(10);
        assert_eq!(err.span(), 14..14);
    }

    #[test]
    fn test_every_command_has_usage_starting_with_keyword() {
        for entry in COMMANDS {
            assert!(entry.usage.starts_with(entry.keyword), "{}", entry.keyword);
        }
    }
}

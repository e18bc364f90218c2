//! Wire encoding of a single protocol line.
//!
//! A line is a name followed by space-separated arguments. Arguments that
//! contain a space, a quote, a backslash or a newline are wrapped in single
//! quotes, with `\'`, `\\` and `\n` escapes inside.

use crate::{ProtoError, Result as ProtoResult};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    name: String,
    args: Vec<String>,
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Encode as a newline-terminated line.
    pub fn encode(&self) -> String {
        format!("{self}\n")
    }

    /// Parse one line (trailing `\r\n` / `\n` is ignored).
    #[track_caller]
    pub fn parse(line: &str) -> ProtoResult<Self> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let mut tokens = tokenize(trimmed)?.into_iter();

        let name = tokens.next().ok_or_else(ProtoError::empty)?;
        Ok(Self {
            name,
            args: tokens.collect(),
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", encode_arg(arg))?;
        }
        Ok(())
    }
}

fn encode_arg(arg: &str) -> String {
    let needs_quotes =
        arg.is_empty() || arg.contains([' ', '\t', '\'', '\\', '\n']);
    if !needs_quotes {
        return arg.to_string();
    }

    let mut out = String::with_capacity(arg.len() + 2);
    out.push('\'');
    for c in arg.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

#[track_caller]
fn tokenize(line: &str) -> ProtoResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(first) = chars.next() else {
            break;
        };

        let mut token = String::new();
        if first == '\'' {
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\'' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some('n') => token.push('\n'),
                        Some('\'') => token.push('\''),
                        Some('\\') => token.push('\\'),
                        Some(other) => {
                            token.push('\\');
                            token.push(other);
                        }
                        None => token.push('\\'),
                    },
                    other => token.push(other),
                }
            }
            if !closed {
                return Err(ProtoError::unterminated_quote(line));
            }
        } else {
            token.push(first);
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }

        tokens.push(token);
    }

    Ok(tokens)
}

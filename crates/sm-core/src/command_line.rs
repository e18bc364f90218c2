//! Turns a [`Spec`] into the command line that launches it.

use crate::Spec;

use std::fmt;

/// Executable used to run an instance as another user.
pub const SWITCH_USER_PROGRAM: &str = "su";

/// Command line of one instance.
///
/// Building it is pure: the same spec always yields the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// `path --opt=value ...`, one argument per option, no quoting.
    Direct { argv: Vec<String> },
    /// A shell script run through [`SWITCH_USER_PROGRAM`] as `user`.
    SwitchUser { user: String, script: String },
}

impl CommandLine {
    pub fn build(spec: &Spec) -> Self {
        match spec.user() {
            None => {
                let mut argv = Vec::with_capacity(spec.fields().len());
                argv.push(spec.path().to_string());
                argv.extend(
                    spec.options()
                        .map(|(option, value)| format!("{option}={value}")),
                );
                Self::Direct { argv }
            }
            Some(user) => {
                let mut script = quote_if_spaced(spec.path());
                for (option, value) in spec.options() {
                    script.push(' ');
                    script.push_str(option);
                    script.push('=');
                    script.push_str(&quote_if_spaced(value));
                }
                Self::SwitchUser {
                    user: user.to_string(),
                    script,
                }
            }
        }
    }

    pub fn program(&self) -> &str {
        match self {
            Self::Direct { argv } => argv.first().map(String::as_str).unwrap_or_default(),
            Self::SwitchUser { .. } => SWITCH_USER_PROGRAM,
        }
    }

    /// Arguments following the program.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Direct { argv } => argv.iter().skip(1).cloned().collect(),
            Self::SwitchUser { user, script } => vec![
                "-".to_string(),
                "-m".to_string(),
                user.clone(),
                "-c".to_string(),
                script.clone(),
            ],
        }
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![self.program().to_string()];
        argv.extend(self.args());
        argv
    }
}

impl From<&Spec> for CommandLine {
    fn from(spec: &Spec) -> Self {
        Self::build(spec)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

fn quote_if_spaced(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

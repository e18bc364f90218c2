//! `sm list`: every configured instance with its working directory and the
//! command line it would be launched with.

use crate::table;

use serde::Serialize;
use sm_core::{CommandLine, Spec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerListing {
    pub name: String,
    pub cwd: String,
    pub command_line: Vec<String>,
}

impl From<&Spec> for ServerListing {
    fn from(spec: &Spec) -> Self {
        Self {
            name: spec.name().to_string(),
            cwd: spec.cwd().display().to_string(),
            command_line: CommandLine::build(spec).argv(),
        }
    }
}

pub fn render(listings: &[ServerListing]) -> String {
    let rows: Vec<Vec<String>> = listings
        .iter()
        .map(|l| vec![l.name.clone(), l.cwd.clone(), l.command_line.join(" ")])
        .collect();

    table::render(&["SERVER", "CWD", "COMMAND LINE"], &rows)
}

mod fields;

use crate::{Fields, Fleet, ServerEntry, ServerTemplate};

pub(crate) const BASE_DIR: &str = "/srv/farm";

pub(crate) fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub(crate) fn template(name: &str, pairs: &[(&str, &str)]) -> ServerTemplate {
    ServerTemplate::new(name, fields(pairs))
}

pub(crate) fn entry(pairs: &[(&str, &str)]) -> ServerEntry {
    ServerEntry::new(fields(pairs)).unwrap()
}

/// Fleet shaped like a small production farm.
pub(crate) fn sample_fleet() -> Fleet {
    Fleet::new(
        vec![
            template(
                "compilox",
                &[
                    ("path", "./compilation-server"),
                    ("cwd", "compilation-server"),
                    ("--host", "127.0.0.1"),
                    ("--instance", "$(name)"),
                ],
            ),
            template(
                "experimentix",
                &[
                    ("path", "./experiment-server"),
                    ("cwd", "build/bin"),
                    ("--host", "127.0.0.1"),
                    ("--logfolder", "logs/experiment-server/$(name)"),
                ],
            ),
        ],
        vec![
            entry(&[("name", "compilox1"), ("--port", "20101")]),
            entry(&[("name", "compilox2"), ("--port", "20102")]),
            entry(&[("name", "experimentix1"), ("--port", "20201")]),
        ],
        BASE_DIR,
    )
}

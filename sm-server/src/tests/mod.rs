mod registry;
mod shutdown;

use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sm_core::{Fields, Fleet, ServerEntry, ServerTemplate, Spec};

/// Write an executable `/bin/sh` script.
pub(crate) fn script(dir: &Path, file: &str, body: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, Permissions::from_mode(0o755)).unwrap();
    path
}

/// One-server fleet running `program` from `dir`.
pub(crate) fn single_fleet(dir: &Path, name: &str, program: &Path) -> Fleet {
    let template: Fields = [
        ("path", program.to_str().unwrap()),
        ("cwd", dir.to_str().unwrap()),
    ]
    .into_iter()
    .collect();
    let entry: Fields = [("name", name)].into_iter().collect();

    Fleet::new(
        vec![ServerTemplate::new(name, template)],
        vec![ServerEntry::new(entry).unwrap()],
        dir,
    )
}

pub(crate) fn spec(dir: &Path, name: &str, program: &Path) -> Arc<Spec> {
    Arc::new(single_fleet(dir, name, program).resolve(name).unwrap())
}

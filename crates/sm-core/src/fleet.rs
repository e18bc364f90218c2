//! Fleet definition: server-type templates plus per-instance entries.

use crate::{CoreError, FIELD_NAME, Fields, Result as CoreResult, Spec};

use std::path::{Path, PathBuf};

/// Named bundle of default fields shared by every instance of a server type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTemplate {
    name: String,
    fields: Fields,
}

impl ServerTemplate {
    pub fn new(name: impl Into<String>, fields: Fields) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// One configured server instance: a `name` plus field overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    name: String,
    fields: Fields,
}

impl ServerEntry {
    #[track_caller]
    pub fn new(fields: Fields) -> CoreResult<Self> {
        let name = fields
            .get(FIELD_NAME)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| CoreError::missing_field("<unnamed>", FIELD_NAME))?
            .to_string();

        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// Immutable snapshot of the fleet definition.
///
/// Relative working directories resolve against `base_dir`, which is captured
/// when the snapshot is built so that resolution never depends on the process'
/// current directory at spawn time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fleet {
    templates: Vec<ServerTemplate>,
    entries: Vec<ServerEntry>,
    base_dir: PathBuf,
}

impl Fleet {
    pub fn new(
        templates: Vec<ServerTemplate>,
        entries: Vec<ServerEntry>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            templates,
            entries,
            base_dir: base_dir.into(),
        }
    }

    pub fn templates(&self) -> &[ServerTemplate] {
        &self.templates
    }

    pub fn entries(&self) -> &[ServerEntry] {
        &self.entries
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Distinct entry names, in declaration order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !names.contains(&entry.name()) {
                names.push(entry.name());
            }
        }
        names
    }

    /// Template whose name is the longest prefix of `name`.
    pub fn template_for(&self, name: &str) -> Option<&ServerTemplate> {
        self.templates
            .iter()
            .filter(|t| name.starts_with(t.name()))
            .max_by_key(|t| t.name().len())
    }

    /// The single entry named `name`.
    #[track_caller]
    pub fn entry(&self, name: &str) -> CoreResult<&ServerEntry> {
        let mut matches = self.entries.iter().filter(|e| e.name() == name);

        match (matches.next(), matches.count()) {
            (None, _) => Err(CoreError::entry_not_found(name)),
            (Some(entry), 0) => Ok(entry),
            (Some(_), others) => Err(CoreError::ambiguous_entry(name, others + 1)),
        }
    }

    /// Resolve the launch spec of the instance named `name`.
    #[track_caller]
    pub fn resolve(&self, name: &str) -> CoreResult<Spec> {
        let entry = self.entry(name)?;
        let template = self
            .template_for(name)
            .ok_or_else(|| CoreError::no_template(name))?;

        Spec::resolve(template, entry, &self.base_dir)
    }

    /// Resolve every distinct entry, keeping failures alongside their name.
    pub fn resolve_all(&self) -> Vec<(String, CoreResult<Spec>)> {
        self.names()
            .into_iter()
            .map(|name| (name.to_string(), self.resolve(name)))
            .collect()
    }
}

//! Resolved launch description of one server instance.

use crate::{
    CoreError, FIELD_CWD, FIELD_PATH, FIELD_USER, Fields, PLACEHOLDER_CLOSE,
    PLACEHOLDER_OPEN, Result as CoreResult, ServerEntry, ServerTemplate,
};

use std::path::{Component, Path, PathBuf};

/// Fully resolved, placeholder-free description of how to launch an instance.
///
/// A `Spec` is a pure function of `(template, entry, base_dir)`: resolving the
/// same inputs twice yields equal values, which restarts rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    name: String,
    path: String,
    cwd: PathBuf,
    user: Option<String>,
    fields: Fields,
}

impl Spec {
    /// Merge `template` with `entry` and expand placeholders.
    ///
    /// Entry fields win over template fields. Placeholders are expanded in a
    /// single left-to-right pass: a field may reference any field of the merged
    /// record, but a reference to a field that still holds a placeholder at that
    /// point is an error.
    pub fn resolve(
        template: &ServerTemplate,
        entry: &ServerEntry,
        base_dir: &Path,
    ) -> CoreResult<Self> {
        let name = entry.name().to_string();
        let mut fields = template.fields().merged_with(entry.fields());

        let keys: Vec<String> = fields.keys().map(String::from).collect();
        for key in keys {
            let Some(value) = fields.get(&key) else {
                continue;
            };
            if !has_placeholder(value) {
                continue;
            }
            let expanded = expand(&key, value, &fields)?;
            fields.set(key, expanded);
        }

        let path = fields
            .get(FIELD_PATH)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CoreError::missing_field(&name, FIELD_PATH))?
            .to_string();

        let user = fields
            .get(FIELD_USER)
            .filter(|u| !u.is_empty())
            .map(String::from);

        let cwd = absolute_dir(base_dir, fields.get(FIELD_CWD).unwrap_or("."));
        fields.set(FIELD_CWD, cwd.display().to_string());

        Ok(Self {
            name,
            path,
            cwd,
            user,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    /// Options passed on the command line, in declaration order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.options()
    }

    /// Address the instance advertises, used for connectivity probes.
    ///
    /// `--host`/`--port` take precedence; `#host`/`#port` describe servers
    /// whose address is not passed on their command line.
    pub fn advertised_address(&self) -> Option<(&str, &str)> {
        self.address_from("--host", "--port")
            .or_else(|| self.address_from("#host", "#port"))
    }

    fn address_from(&self, host: &str, port: &str) -> Option<(&str, &str)> {
        Some((self.get(host)?, self.get(port)?))
    }
}

fn has_placeholder(value: &str) -> bool {
    value
        .find(PLACEHOLDER_OPEN)
        .is_some_and(|start| value[start..].contains(PLACEHOLDER_CLOSE))
}

fn expand(field: &str, value: &str, record: &Fields) -> CoreResult<String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        let after = &rest[start + PLACEHOLDER_OPEN.len()..];
        let Some(end) = after.find(PLACEHOLDER_CLOSE) else {
            break;
        };

        let key = &after[..end];
        let replacement = record
            .get(key)
            .ok_or_else(|| CoreError::unknown_placeholder(field, key))?;

        if has_placeholder(replacement) {
            return Err(CoreError::unresolved_placeholder(field, value));
        }

        out.push_str(&rest[..start]);
        out.push_str(replacement);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn absolute_dir(base_dir: &Path, cwd: &str) -> PathBuf {
    let cwd = Path::new(cwd);
    let joined = if cwd.is_absolute() {
        cwd.to_path_buf()
    } else {
        base_dir.join(cwd)
    };

    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

mod cli;

use sm_core::{Fields, Fleet, ServerEntry, ServerTemplate, Spec};

/// Resolve `name` from a one-template fleet rooted at `/srv/farm`.
pub(crate) fn spec(template: &[(&str, &str)], entry: &[(&str, &str)]) -> Spec {
    let template: Fields = template.iter().copied().collect();
    let entry: Fields = entry.iter().copied().collect();
    let entry = ServerEntry::new(entry).unwrap();
    let name = entry.name().to_string();

    Fleet::new(
        vec![ServerTemplate::new(&name, template)],
        vec![entry],
        "/srv/farm",
    )
    .resolve(&name)
    .unwrap()
}

use cogex_cache::{Atom, intern_ident, is_identifier};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("invalid word pattern");
}

fn identifiers(raw: &str) -> Vec<Atom> {
    WORD.find_iter(raw)
        .map(|m| m.as_str())
        .filter(|token| is_identifier(token))
        .map(intern_ident)
        .collect()
}

/// Names of the stimuli the participant may click, in the order written.
///
/// Accepts any separator (`target, foil`, `[target foil]`, ...). Blank or
/// unparsable text yields no targets.
pub fn clickable_targets(raw: &str) -> Vec<Atom> {
    identifiers(raw)
}

/// Attributes copied from a clicked stimulus; `["name"]` when none parse.
pub fn clicked_attributes(raw: &str) -> Vec<Atom> {
    let attributes = identifiers(raw);
    if attributes.is_empty() {
        debug!(raw, "no clicked attributes given, recording name only");
        return vec![intern_ident("name")];
    }
    attributes
}

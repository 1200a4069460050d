use lazy_static::lazy_static;
pub use string_cache::DefaultAtom as Atom;

lazy_static! {
    /// Per-sample channels every recording mouse stores, in record order.
    pub static ref STANDARD_CHANNELS: [Atom; 6] = [
        Atom::from("x"),
        Atom::from("y"),
        Atom::from("leftButton"),
        Atom::from("midButton"),
        Atom::from("rightButton"),
        Atom::from("time"),
    ];

    /// Button channels, indexed like the pressed-button vector.
    pub static ref BUTTON_CHANNELS: [Atom; 3] = [
        Atom::from("leftButton"),
        Atom::from("midButton"),
        Atom::from("rightButton"),
    ];
}

/// Intern an identifier used in generated code
pub fn intern_ident(s: &str) -> Atom {
    Atom::from(s)
}

/// Channel holding values copied from clicked targets, e.g. `clicked_name`.
pub fn clicked_channel(attribute: &str) -> Atom {
    Atom::from(format!("clicked_{attribute}"))
}

/// True if `s` is usable as a bare identifier in both runtimes.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

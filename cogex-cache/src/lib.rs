pub mod cache;

pub use cache::{
    Atom, BUTTON_CHANNELS, STANDARD_CHANNELS, clicked_channel, intern_ident, is_identifier,
};

//! Structured chat components and their flattening into legacy strings.
//!
//! A [`Component`] is a tree of text or translatable nodes carrying a
//! [`TextColor`] and [`Decorations`]. A [`Formatter`] turns a component into
//! the flat string a command sender can display, resolving translations for a
//! [`Locale`].

mod color;
mod component;
mod format;
mod locale;

pub use color::TextColor;
pub use component::{Component, Content, Decorations};
pub use format::{Formatter, LegacyFormatter, Styling, Translations};
pub use locale::{Locale, LocaleError};

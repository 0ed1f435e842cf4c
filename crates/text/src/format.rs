use std::collections::HashMap;

use crate::{Component, Content, Decorations, Locale, TextColor};

/// Flattens a [`Component`] into a string for one locale.
pub trait Formatter: Send + Sync {
	fn format(&self, component: &Component, locale: &Locale) -> String;
}

/// Output styling for [`LegacyFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Styling {
	/// Colours and decorations rendered as `§` codes.
	#[default]
	Legacy,
	/// Styling dropped, text only.
	Plain,
}

/// Per-locale translation patterns.
///
/// Patterns reference arguments positionally with `{0}`, `{1}`, ...
#[derive(Debug, Clone, Default)]
pub struct Translations {
	tables: HashMap<Locale, HashMap<String, String>>,
}

impl Translations {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers one pattern.
	pub fn insert(&mut self, locale: Locale, key: impl Into<String>, pattern: impl Into<String>) {
		self.tables.entry(locale).or_default().insert(key.into(), pattern.into());
	}

	/// Builder form of [`Self::insert`].
	pub fn with(mut self, locale: Locale, key: impl Into<String>, pattern: impl Into<String>) -> Self {
		self.insert(locale, key, pattern);
		self
	}

	/// Looks `key` up for `locale`, falling back to its bare language and then `en_US`.
	pub fn resolve(&self, locale: &Locale, key: &str) -> Option<&str> {
		let lookup = |locale: &Locale| self.tables.get(locale).and_then(|table| table.get(key)).map(String::as_str);
		lookup(locale)
			.or_else(|| locale.language().parse().ok().and_then(|language: Locale| lookup(&language)))
			.or_else(|| lookup(&Locale::en_us()))
	}
}

/// Formatter producing legacy `§`-coded strings.
#[derive(Debug, Clone, Default)]
pub struct LegacyFormatter {
	translations: Translations,
	styling: Styling,
}

impl LegacyFormatter {
	pub fn new(translations: Translations) -> Self {
		Self {
			translations,
			styling: Styling::Legacy,
		}
	}

	pub fn with_styling(mut self, styling: Styling) -> Self {
		self.styling = styling;
		self
	}
}

impl Formatter for LegacyFormatter {
	fn format(&self, component: &Component, locale: &Locale) -> String {
		let mut writer = Writer {
			out: String::new(),
			emitted: Style::default(),
			styling: self.styling,
			translations: &self.translations,
			locale,
		};
		writer.component(component, Style::default());
		writer.out
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Style {
	color: Option<TextColor>,
	decorations: Decorations,
}

struct Writer<'a> {
	out: String,
	emitted: Style,
	styling: Styling,
	translations: &'a Translations,
	locale: &'a Locale,
}

impl Writer<'_> {
	fn component(&mut self, component: &Component, parent: Style) {
		let style = Style {
			color: component.text_color().or(parent.color),
			decorations: parent.decorations | component.decorations(),
		};
		match component.content() {
			Content::Text(text) => self.push_text(text, style),
			Content::Translatable { key, args } => self.translatable(key, args, style),
		}
		for child in component.children() {
			self.component(child, style);
		}
	}

	fn translatable(&mut self, key: &str, args: &[Component], style: Style) {
		let translations = self.translations;
		let Some(pattern) = translations.resolve(self.locale, key) else {
			self.push_text(key, style);
			return;
		};

		let mut rest = pattern;
		while let Some(open) = rest.find('{') {
			let (literal, tail) = rest.split_at(open);
			self.push_text(literal, style);
			let placeholder = tail[1..]
				.find('}')
				.and_then(|close| tail[1..1 + close].parse::<usize>().ok().map(|index| (index, close)));
			match placeholder {
				Some((index, close)) => {
					if let Some(arg) = args.get(index) {
						self.component(arg, style);
					}
					rest = &tail[close + 2..];
				}
				None => {
					self.push_text("{", style);
					rest = &tail[1..];
				}
			}
		}
		self.push_text(rest, style);
	}

	fn push_text(&mut self, text: &str, style: Style) {
		if text.is_empty() {
			return;
		}
		if self.styling == Styling::Legacy && style != self.emitted {
			self.switch(style);
		}
		self.out.push_str(text);
	}

	fn switch(&mut self, style: Style) {
		// A colour code clears decorations, so they are re-emitted after it.
		self.out.push('§');
		self.out.push(style.color.map_or('r', TextColor::code));
		for (flag, code) in Decorations::CODES {
			if style.decorations.contains(flag) {
				self.out.push('§');
				self.out.push(code);
			}
		}
		self.emitted = style;
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn locale(tag: &str) -> Locale {
		tag.parse().unwrap()
	}

	#[test]
	fn plain_text_has_no_codes() {
		let fmt = LegacyFormatter::default();
		assert_eq!(fmt.format(&Component::text("hello"), &Locale::en_us()), "hello");
	}

	#[test]
	fn colour_and_inheritance() {
		let fmt = LegacyFormatter::default();
		let msg = Component::colored("a", TextColor::Red)
			.append(Component::text("b"))
			.append(Component::colored("c", TextColor::Gray));
		assert_eq!(fmt.format(&msg, &Locale::en_us()), "§cab§7c");
	}

	#[test]
	fn decorations_follow_colour() {
		let fmt = LegacyFormatter::default();
		let msg = Component::colored("x", TextColor::Gold).decorate(Decorations::BOLD | Decorations::ITALIC);
		assert_eq!(fmt.format(&msg, &Locale::en_us()), "§6§l§ox");
	}

	#[test]
	fn dropping_colour_resets() {
		let fmt = LegacyFormatter::default();
		let msg = Component::text("").append(Component::colored("a", TextColor::Red)).append(Component::text("b"));
		assert_eq!(fmt.format(&msg, &Locale::en_us()), "§ca§rb");
	}

	#[test]
	fn plain_styling_strips_codes() {
		let fmt = LegacyFormatter::default().with_styling(Styling::Plain);
		let msg = Component::colored("a", TextColor::Red).append(Component::colored("b", TextColor::Aqua));
		assert_eq!(fmt.format(&msg, &Locale::en_us()), "ab");
	}

	#[test]
	fn translation_substitutes_arguments() {
		let translations = Translations::new().with(locale("en_US"), "greet", "Hello {0}, you have {1} blocks");
		let fmt = LegacyFormatter::new(translations).with_styling(Styling::Plain);
		let msg = Component::translatable("greet", [Component::text("cmd"), Component::text("12")]);
		assert_eq!(fmt.format(&msg, &Locale::en_us()), "Hello cmd, you have 12 blocks");
	}

	#[test]
	fn translation_falls_back_by_language_then_default() {
		let translations = Translations::new()
			.with(locale("de"), "k", "deutsch")
			.with(locale("en_US"), "k", "english")
			.with(locale("en_US"), "only_en", "fallback");
		let fmt = LegacyFormatter::new(translations);
		assert_eq!(fmt.format(&Component::translatable("k", []), &locale("de_AT")), "deutsch");
		assert_eq!(fmt.format(&Component::translatable("only_en", []), &locale("de_AT")), "fallback");
	}

	#[test]
	fn unknown_key_renders_key() {
		let fmt = LegacyFormatter::default();
		let msg = Component::translatable("worldedit.missing", []).color(TextColor::Red);
		assert_eq!(fmt.format(&msg, &Locale::en_us()), "§cworldedit.missing");
	}

	#[test]
	fn stray_braces_are_literal() {
		let translations = Translations::new().with(Locale::en_us(), "k", "{a} {9} {");
		let fmt = LegacyFormatter::new(translations);
		assert_eq!(fmt.format(&Component::translatable("k", []), &Locale::en_us()), "{a}  {");
	}
}

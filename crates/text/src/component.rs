use crate::TextColor;

bitflags::bitflags! {
	/// Text decorations applied on top of a colour.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Decorations: u8 {
		/// `§k`
		const OBFUSCATED = 1 << 0;
		/// `§l`
		const BOLD = 1 << 1;
		/// `§m`
		const STRIKETHROUGH = 1 << 2;
		/// `§n`
		const UNDERLINED = 1 << 3;
		/// `§o`
		const ITALIC = 1 << 4;
	}
}

impl Decorations {
	/// Legacy codes in emission order.
	pub(crate) const CODES: [(Decorations, char); 5] = [
		(Self::OBFUSCATED, 'k'),
		(Self::BOLD, 'l'),
		(Self::STRIKETHROUGH, 'm'),
		(Self::UNDERLINED, 'n'),
		(Self::ITALIC, 'o'),
	];
}

/// Payload of one component node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
	/// Literal text.
	Text(String),
	/// Locale-dependent message resolved by key, with positional arguments.
	Translatable {
		/// Translation key.
		key: String,
		/// Arguments substituted for `{0}`, `{1}`, ...
		args: Vec<Component>,
	},
}

/// A styled message tree.
///
/// Children inherit colour and decorations from their parent unless they set
/// their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
	content: Content,
	color: Option<TextColor>,
	decorations: Decorations,
	children: Vec<Component>,
}

impl Component {
	/// Creates a literal text component.
	pub fn text(text: impl Into<String>) -> Self {
		Self::from_content(Content::Text(text.into()))
	}

	/// Creates a literal text component with a colour.
	pub fn colored(text: impl Into<String>, color: TextColor) -> Self {
		Self::text(text).color(color)
	}

	/// Creates a translatable component.
	pub fn translatable(key: impl Into<String>, args: impl IntoIterator<Item = Component>) -> Self {
		Self::from_content(Content::Translatable {
			key: key.into(),
			args: args.into_iter().collect(),
		})
	}

	fn from_content(content: Content) -> Self {
		Self {
			content,
			color: None,
			decorations: Decorations::empty(),
			children: Vec::new(),
		}
	}

	/// Sets the colour.
	pub fn color(mut self, color: TextColor) -> Self {
		self.color = Some(color);
		self
	}

	/// Adds decorations.
	pub fn decorate(mut self, decorations: Decorations) -> Self {
		self.decorations |= decorations;
		self
	}

	/// Appends a child component.
	pub fn append(mut self, child: Component) -> Self {
		self.children.push(child);
		self
	}

	pub fn content(&self) -> &Content {
		&self.content
	}

	pub fn text_color(&self) -> Option<TextColor> {
		self.color
	}

	pub fn decorations(&self) -> Decorations {
		self.decorations
	}

	pub fn children(&self) -> &[Component] {
		&self.children
	}
}

impl From<&str> for Component {
	fn from(text: &str) -> Self {
		Self::text(text)
	}
}

impl From<String> for Component {
	fn from(text: String) -> Self {
		Self::text(text)
	}
}

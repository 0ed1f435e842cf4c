/// Named colours understood by legacy `§`-code chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
	Black,
	DarkBlue,
	DarkGreen,
	DarkAqua,
	DarkRed,
	DarkPurple,
	Gold,
	Gray,
	DarkGray,
	Blue,
	Green,
	Aqua,
	Red,
	LightPurple,
	Yellow,
	White,
}

impl TextColor {
	/// All colours in legacy code order.
	pub const ALL: [TextColor; 16] = [
		Self::Black,
		Self::DarkBlue,
		Self::DarkGreen,
		Self::DarkAqua,
		Self::DarkRed,
		Self::DarkPurple,
		Self::Gold,
		Self::Gray,
		Self::DarkGray,
		Self::Blue,
		Self::Green,
		Self::Aqua,
		Self::Red,
		Self::LightPurple,
		Self::Yellow,
		Self::White,
	];

	/// Returns the legacy format code following the `§` marker.
	pub const fn code(self) -> char {
		match self {
			Self::Black => '0',
			Self::DarkBlue => '1',
			Self::DarkGreen => '2',
			Self::DarkAqua => '3',
			Self::DarkRed => '4',
			Self::DarkPurple => '5',
			Self::Gold => '6',
			Self::Gray => '7',
			Self::DarkGray => '8',
			Self::Blue => '9',
			Self::Green => 'a',
			Self::Aqua => 'b',
			Self::Red => 'c',
			Self::LightPurple => 'd',
			Self::Yellow => 'e',
			Self::White => 'f',
		}
	}

	/// Returns the snake_case colour name.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Black => "black",
			Self::DarkBlue => "dark_blue",
			Self::DarkGreen => "dark_green",
			Self::DarkAqua => "dark_aqua",
			Self::DarkRed => "dark_red",
			Self::DarkPurple => "dark_purple",
			Self::Gold => "gold",
			Self::Gray => "gray",
			Self::DarkGray => "dark_gray",
			Self::Blue => "blue",
			Self::Green => "green",
			Self::Aqua => "aqua",
			Self::Red => "red",
			Self::LightPurple => "light_purple",
			Self::Yellow => "yellow",
			Self::White => "white",
		}
	}

	/// Looks a colour up by its snake_case name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|color| color.name() == name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn codes_are_unique() {
		let mut codes: Vec<char> = TextColor::ALL.iter().map(|c| c.code()).collect();
		codes.sort_unstable();
		codes.dedup();
		assert_eq!(codes.len(), 16);
	}

	#[test]
	fn names_round_trip() {
		assert_eq!(TextColor::from_name("light_purple"), Some(TextColor::LightPurple));
		assert_eq!(TextColor::from_name("purple"), None);
	}
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned for a malformed locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid locale tag: {0:?}")]
pub struct LocaleError(pub String);

/// A `language[_REGION]` locale tag, normalised to `en_US` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
	/// Locale used when nothing else is configured.
	pub fn en_us() -> Self {
		Self("en_US".to_string())
	}

	/// Language subtag, e.g. `en`.
	pub fn language(&self) -> &str {
		self.0.split('_').next().unwrap_or(&self.0)
	}

	/// Region subtag, e.g. `US`.
	pub fn region(&self) -> Option<&str> {
		self.0.split_once('_').map(|(_, region)| region)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for Locale {
	fn default() -> Self {
		Self::en_us()
	}
}

impl FromStr for Locale {
	type Err = LocaleError;

	/// Accepts `en`, `en_us`, `en-US` and similar.
	fn from_str(tag: &str) -> Result<Self, Self::Err> {
		let invalid = || LocaleError(tag.to_string());
		let mut parts = tag.split(['_', '-']);
		let language = parts.next().filter(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_alphabetic())).ok_or_else(invalid)?;
		let region = parts.next();
		if parts.next().is_some() {
			return Err(invalid());
		}

		let mut normalised = language.to_ascii_lowercase();
		if let Some(region) = region {
			if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
				return Err(invalid());
			}
			normalised.push('_');
			normalised.push_str(&region.to_ascii_uppercase());
		}
		Ok(Self(normalised))
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

//! Text output to the backing entity.
//!
//! Entity output belongs to the authoritative thread. Legacy string messages
//! are split into lines and sent as one blocking batch on that thread.
//! Structured messages follow [`StructuredDispatch`]: by default they are
//! formatted and sent directly from the calling thread.

use std::sync::{Arc, Weak};

use wedit_config::StructuredDispatch;
use wedit_text::{Component, Formatter, Locale, TextColor};
use wedit_worker::Dispatch;

use crate::host::CommandBlockEntity;

/// Presentation of a legacy string message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
	/// Sent verbatim.
	Raw,
	Info,
	Debug,
	Error,
}

impl Severity {
	/// Colour each line is wrapped in, `None` for verbatim output.
	pub const fn color(self) -> Option<TextColor> {
		match self {
			Self::Raw => None,
			Self::Info => Some(TextColor::LightPurple),
			Self::Debug => Some(TextColor::Gray),
			Self::Error => Some(TextColor::Red),
		}
	}

	const fn as_str(self) -> &'static str {
		match self {
			Self::Raw => "raw",
			Self::Info => "info",
			Self::Debug => "debug",
			Self::Error => "error",
		}
	}
}

/// Splits a message into the lines sent one by one.
///
/// Splits on `'\n'` and drops trailing empty lines. An empty message is one
/// empty line; a message made only of line breaks has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
	if text.is_empty() {
		return vec![""];
	}
	let mut lines: Vec<&str> = text.split('\n').collect();
	while lines.last().is_some_and(|line| line.is_empty()) {
		lines.pop();
	}
	lines
}

/// Delivers output to one backing entity with the host's threading rules.
pub struct ThreadAffineMessenger {
	sender: Weak<dyn CommandBlockEntity>,
	dispatch: Arc<dyn Dispatch>,
	formatter: Arc<dyn Formatter>,
}

impl ThreadAffineMessenger {
	pub fn new(sender: Weak<dyn CommandBlockEntity>, dispatch: Arc<dyn Dispatch>, formatter: Arc<dyn Formatter>) -> Self {
		Self {
			sender,
			dispatch,
			formatter,
		}
	}

	/// Sends every line of `text` on the authoritative thread and waits for it.
	///
	/// All lines go out in order as a single job, so they cannot interleave
	/// with other work queued on that thread.
	pub fn send_legacy(&self, severity: Severity, text: &str, locale: Locale) {
		let lines: Vec<String> = split_lines(text).into_iter().map(str::to_owned).collect();
		if lines.is_empty() {
			return;
		}
		tracing::trace!(severity = severity.as_str(), lines = lines.len(), "messenger.send_legacy");

		let sender = self.sender.clone();
		let formatter = Arc::clone(&self.formatter);
		self.dispatch.run_sync(Box::new(move || {
			let Some(sender) = sender.upgrade() else {
				tracing::debug!(severity = severity.as_str(), "messenger.sender_gone");
				return;
			};
			for line in lines {
				match severity.color() {
					None => sender.send_message(&line),
					Some(color) => sender.send_message(&formatter.format(&Component::colored(line, color), &locale)),
				}
			}
		}));
	}

	/// Formats `component` for `locale` and sends it according to `policy`.
	///
	/// With [`StructuredDispatch::Direct`] the entity is messaged from the
	/// calling thread, which may not be the authoritative one.
	pub fn send_structured(&self, component: &Component, locale: &Locale, policy: StructuredDispatch) {
		match policy {
			StructuredDispatch::Direct => {
				let Some(sender) = self.sender.upgrade() else {
					tracing::debug!("messenger.sender_gone");
					return;
				};
				tracing::trace!(authoritative = self.dispatch.is_authoritative(), "messenger.send_structured.direct");
				sender.send_message(&self.formatter.format(component, locale));
			}
			StructuredDispatch::Sync => {
				let sender = self.sender.clone();
				let formatter = Arc::clone(&self.formatter);
				let component = component.clone();
				let locale = locale.clone();
				tracing::trace!("messenger.send_structured.sync");
				self.dispatch.run_sync(Box::new(move || match sender.upgrade() {
					Some(sender) => sender.send_message(&formatter.format(&component, &locale)),
					None => tracing::debug!("messenger.sender_gone"),
				}));
			}
		}
	}
}

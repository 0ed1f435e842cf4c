//! End-to-end behaviour of command-block actors against the in-memory host.
//!
//! Tests that read or install the process-wide configuration run serially.

use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

use pretty_assertions::assert_eq;
use serial_test::serial;
use wedit_actor::host::{BlockKind, BlockPos, CommandBlockEntity};
use wedit_actor::location::{Location, Vector3};
use wedit_actor::sim::{SimCommandBlock, SimLevel};
use wedit_actor::{
	Actor, ActorError, COMMAND_BLOCK_PREFIX, CommandBlockActor, Identity, Liveness, Locatable, PermissionTable, PlatformContext,
};
use wedit_config::{Configuration, StructuredDispatch};
use wedit_text::{Component, LegacyFormatter, Locale, TextColor, Translations};
use wedit_worker::{Dispatch, DispatchExt, MainThread, MainThreadHandle};

const POS: BlockPos = BlockPos::new(12, 64, -30);

fn translations() -> Translations {
	Translations::new()
		.with(Locale::en_us(), "worldedit.selection.cleared", "Selection cleared.")
		.with("de_DE".parse().unwrap(), "worldedit.selection.cleared", "Auswahl entfernt.")
}

fn platform(dispatch: Arc<dyn Dispatch>) -> PlatformContext {
	PlatformContext::new("sim", dispatch, Arc::new(LegacyFormatter::new(translations())))
}

fn place(grants: &[&str]) -> (Arc<SimLevel>, Arc<SimCommandBlock>) {
	let level = SimLevel::new("world");
	let block = SimCommandBlock::place(&level, POS, "redstone_cmd", PermissionTable::new(grants.iter().copied()));
	(level, block)
}

struct Dedicated {
	handle: MainThreadHandle,
	main_id: ThreadId,
}

fn dedicated(name: &str) -> Dedicated {
	let handle = MainThread::spawn(name).unwrap();
	let main_id = handle.main_thread().sync_call(|| thread::current().id()).unwrap();
	Dedicated { handle, main_id }
}

fn install(config: Configuration) {
	wedit_config::install(config);
}

#[test]
fn identity_is_derived_from_construction_name_and_stable() {
	let main = MainThread::attach_current("identity");
	let platform = platform(Arc::new(main));
	let (_level, block) = place(&[]);

	let first = CommandBlockActor::new(&platform, &block);
	let second = CommandBlockActor::new(&platform, &block);
	let expected = Identity::derive(COMMAND_BLOCK_PREFIX, "redstone_cmd");
	assert_eq!(first.unique_id(), expected);
	assert_eq!(second.unique_id(), expected);
	assert_eq!(first.session_key().unique_id(), expected);

	let (_other_level, other_block) = {
		let level = SimLevel::new("elsewhere");
		let block = SimCommandBlock::place(&level, BlockPos::new(0, 0, 0), "redstone_cmd", PermissionTable::default());
		(level, block)
	};
	assert_eq!(CommandBlockActor::new(&platform, &other_block).unique_id(), expected);
}

#[test]
fn name_is_live_but_identity_is_frozen() {
	let main = MainThread::attach_current("rename");
	let (_level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main)), &block);

	block.rename("renamed_cmd");
	assert_eq!(actor.name(), "renamed_cmd");
	assert_eq!(actor.session_key().name(), "renamed_cmd");
	assert_eq!(actor.unique_id(), Identity::derive(COMMAND_BLOCK_PREFIX, "redstone_cmd"));
}

#[test]
fn unloaded_chunk_makes_session_inactive_on_authoritative_thread() {
	let main = MainThread::attach_current("unloaded");
	let (level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main)), &block);
	let key = actor.session_key();

	assert!(key.is_active());
	assert!(key.is_persistent());
	level.unload_chunk(POS.chunk());
	assert!(!key.is_active());
}

#[test]
fn off_thread_session_reads_converge_after_a_tick() {
	let main = MainThread::attach_current("converge");
	let (level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main.clone())), &block);
	let key = actor.session_key();

	level.set_block(POS, BlockKind::Other("minecraft:air_like".into()));
	let remote = Arc::clone(&key);
	assert!(thread::spawn(move || remote.is_active()).join().unwrap());
	assert_eq!(actor.block_session_key().liveness(), Liveness::Active);

	main.drain_all();
	assert_eq!(actor.block_session_key().liveness(), Liveness::Inactive);
	let remote = Arc::clone(&key);
	assert!(!thread::spawn(move || remote.is_active()).join().unwrap());
}

#[test]
fn session_key_outlives_actor_and_entity() {
	let main = MainThread::attach_current("outlive");
	let (_level, block) = place(&[]);
	let key = CommandBlockActor::new(&platform(Arc::new(main)), &block).session_key();

	assert!(key.is_active());
	drop(block);
	assert!(!key.is_active());
	assert_eq!(key.name(), "redstone_cmd");
}

#[test]
fn location_is_frozen_and_cannot_be_set() {
	let main = MainThread::attach_current("location");
	let (_level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main)), &block);

	let before = actor.location();
	assert_eq!(before.position(), Vector3::new(12.0, 64.0, -30.0));
	assert_eq!(actor.extent().name(), "world");

	let elsewhere = Location::new(Arc::clone(before.extent()), Vector3::new(0.0, 0.0, 0.0), 90.0, 0.0);
	assert!(!actor.set_location(elsewhere));
	assert_eq!(actor.location(), before);
}

#[test]
fn permissions_delegate_and_mutation_is_inert() {
	let main = MainThread::attach_current("permissions");
	let (_level, block) = place(&["worldedit.region.*"]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main)), &block);

	assert!(actor.has_permission("worldedit.region.set"));
	assert!(actor.check_permission("worldedit.region.set").is_ok());

	let denied = actor.check_permission("worldedit.generation.sphere").unwrap_err();
	assert_eq!(denied.permission(), "worldedit.generation.sphere");
	assert!(!actor.has_permission("worldedit.generation.sphere"));

	assert!(actor.toggle_permission("worldedit.generation.sphere"));
	actor.set_permission("worldedit.generation.sphere", true);
	assert!(!actor.has_permission("worldedit.generation.sphere"));
	assert!(actor.toggle_permission("worldedit.region.set"));
	assert!(actor.has_permission("worldedit.region.set"));

	assert!(!actor.can_destroy_bedrock());
	assert!(actor.groups().is_empty());
	assert!(!actor.is_player());
}

#[test]
fn bedrock_override_comes_from_grants() {
	let main = MainThread::attach_current("bedrock");
	let (_level, block) = place(&["worldedit.override.bedrock"]);
	assert!(CommandBlockActor::new(&platform(Arc::new(main)), &block).can_destroy_bedrock());
}

#[test]
#[serial(wedit_config)]
fn configured_grants_reach_the_actor() {
	install(
		Configuration::parse(
			r#"
command-block {
    grant "worldedit.region.*" "worldedit.override.bedrock"
}
"#,
		)
		.unwrap(),
	);
	let main = MainThread::attach_current("configured");
	let level = SimLevel::new("world");
	let block = SimCommandBlock::place_configured(&level, POS, "redstone_cmd");
	let actor = CommandBlockActor::new(&platform(Arc::new(main)), &block);

	assert!(actor.has_permission("worldedit.region.set"));
	assert!(actor.can_destroy_bedrock());
	assert!(actor.check_permission("worldedit.generation.sphere").is_err());
	install(Configuration::default());
}

#[test]
fn construction_from_vanished_entity_is_rejected() {
	let main = MainThread::attach_current("vanished");
	let platform = platform(Arc::new(main));
	let (_level, block) = place(&[]);
	let weak = Arc::downgrade(&block) as Weak<dyn CommandBlockEntity>;

	assert!(CommandBlockActor::from_weak(&platform, weak.clone()).is_ok());
	drop(block);
	assert_eq!(CommandBlockActor::from_weak(&platform, weak).unwrap_err(), ActorError::SenderUnavailable);
}

#[test]
#[serial(wedit_config)]
fn multi_line_print_blocks_and_delivers_in_order_on_main_thread() {
	install(Configuration::default());
	let main = dedicated("print.multiline");
	let (_level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main.handle.main_thread().clone())), &block);

	actor.print_raw("a\nb\nc");

	let deliveries = block.deliveries();
	assert_eq!(block.messages(), vec!["a", "b", "c"]);
	assert!(deliveries.iter().all(|d| d.thread == main.main_id));
}

#[test]
#[serial(wedit_config)]
fn severities_are_styled_per_line() {
	install(Configuration::default());
	let main = dedicated("print.severity");
	let (_level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main.handle.main_thread().clone())), &block);

	actor.print("info\nmore");
	actor.print_debug("debug");
	actor.print_error("error");
	assert_eq!(block.messages(), vec!["§dinfo", "§dmore", "§7debug", "§cerror"]);
}

#[test]
#[serial(wedit_config)]
fn concurrent_prints_do_not_interleave() {
	install(Configuration::default());
	let main = dedicated("print.concurrent");
	let (_level, block) = place(&[]);
	let actor = Arc::new(CommandBlockActor::new(&platform(Arc::new(main.handle.main_thread().clone())), &block));

	let writers: Vec<_> = (0..4)
		.map(|n| {
			let actor = Arc::clone(&actor);
			thread::spawn(move || {
				for _ in 0..10 {
					actor.print_raw(&format!("{n}:1\n{n}:2\n{n}:3"));
				}
			})
		})
		.collect();
	for writer in writers {
		writer.join().unwrap();
	}

	let messages = block.messages();
	assert_eq!(messages.len(), 4 * 10 * 3);
	for batch in messages.chunks(3) {
		let owner = batch[0].split(':').next().unwrap();
		assert_eq!(batch, [format!("{owner}:1"), format!("{owner}:2"), format!("{owner}:3")]);
	}
}

#[test]
#[serial(wedit_config)]
fn structured_print_is_direct_by_default() {
	install(Configuration::default());
	let main = dedicated("structured.direct");
	let (_level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main.handle.main_thread().clone())), &block);

	actor.print_component(&Component::colored("done", TextColor::Green));

	let deliveries = block.deliveries();
	assert_eq!(deliveries.len(), 1);
	assert_eq!(deliveries[0].message, "§adone");
	assert_eq!(deliveries[0].thread, thread::current().id());
	assert_ne!(deliveries[0].thread, main.main_id);
}

#[test]
#[serial(wedit_config)]
fn structured_print_can_be_marshalled() {
	let mut config = Configuration::default();
	config.structured_dispatch = StructuredDispatch::Sync;
	install(config);
	let main = dedicated("structured.sync");
	let (_level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main.handle.main_thread().clone())), &block);

	actor.print_component(&Component::text("done"));

	let deliveries = block.deliveries();
	assert_eq!(deliveries.len(), 1);
	assert_eq!(deliveries[0].thread, main.main_id);
	install(Configuration::default());
}

#[test]
#[serial(wedit_config)]
fn locale_is_resolved_from_configuration_on_demand() {
	let main = MainThread::attach_current("locale");
	let (_level, block) = place(&[]);
	let actor = CommandBlockActor::new(&platform(Arc::new(main)), &block);
	let message = Component::translatable("worldedit.selection.cleared", []);

	install(Configuration::default());
	assert_eq!(actor.locale(), Locale::en_us());
	actor.print_component(&message);

	install(Configuration::parse("locale \"de_DE\"").unwrap());
	assert_eq!(actor.locale().as_str(), "de_DE");
	actor.print_component(&message);

	assert_eq!(block.messages(), vec!["Selection cleared.", "Auswahl entfernt."]);
	install(Configuration::default());
}

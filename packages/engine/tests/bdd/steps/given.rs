//! Given step definitions
//!
//! Steps that set up the rule document for a scenario.

use cucumber::{gherkin::Step, given};

use crate::world::VersemapWorld;

#[given("the rule set:")]
fn set_rule_set(world: &mut VersemapWorld, step: &Step) {
    world.document = step
        .docstring
        .clone()
        .expect("the rule set step needs a YAML docstring");
    world.service = None;
    world.error = None;
}

#[given("the shipped KJV to Synodal rule set")]
fn set_shipped_rule_set(world: &mut VersemapWorld) {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../rules/kjv_rst.yaml");
    world.document = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    world.service = None;
    world.error = None;
}

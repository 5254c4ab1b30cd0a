//! When step definitions
//!
//! Steps that load rule sets and run queries.

use cucumber::when;
use versemap_engine::{parse_reference, LoadOptions};

use crate::world::VersemapWorld;

#[when("the rule set is loaded")]
fn load_rule_set(world: &mut VersemapWorld) {
    world.load(LoadOptions::default());
}

#[when("the rule set is loaded strictly")]
fn load_rule_set_strictly(world: &mut VersemapWorld) {
    world.load(LoadOptions { strict: true });
}

#[when(expr = "{word} {string} is matched")]
fn match_verse(world: &mut VersemapWorld, tx: String, reference: String) {
    let tx = VersemapWorld::translation(&tx);
    let key = parse_reference(&reference).expect("valid reference in feature file");
    world.mapped = world.service().match_to_other(&tx, &key);
}

#[when(expr = "the cluster of {word} {string} is computed")]
fn compute_cluster(world: &mut VersemapWorld, tx: String, reference: String) {
    let tx = VersemapWorld::translation(&tx);
    let key = parse_reference(&reference).expect("valid reference in feature file");
    let service = world.service();
    let members = service.cluster_members(&tx, &key);
    let id = service.cluster_id(&tx, &key);
    let siblings = service.same_translation_siblings(&tx, &key);
    world.members = members;
    world.cluster_id = Some(id);
    world.siblings = siblings;
}

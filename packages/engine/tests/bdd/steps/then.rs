//! Then step definitions
//!
//! Steps that verify outcomes and assertions.

use cucumber::{gherkin::Step, then};
use versemap_engine::{parse_reference, Location};

use crate::helpers::table_conversion::{parse_location_table, parse_reference_list};
use crate::world::VersemapWorld;

#[then(expr = "the result is {string}")]
fn assert_result(world: &mut VersemapWorld, expected: String) {
    assert_eq!(world.mapped, parse_reference_list(&expected));
}

#[then("the verse has no counterpart")]
fn assert_no_counterpart(world: &mut VersemapWorld) {
    assert!(
        world.mapped.is_empty(),
        "Expected no counterpart, got {:?}",
        world.mapped
    );
}

#[then(expr = "the cluster id is {string}")]
fn assert_cluster_id(world: &mut VersemapWorld, expected: String) {
    assert_eq!(world.cluster_id.as_deref(), Some(expected.as_str()));
}

#[then("the cluster members are:")]
fn assert_cluster_members(world: &mut VersemapWorld, step: &Step) {
    let table = step.table.as_ref().expect("members step needs a table");
    assert_eq!(world.members, parse_location_table(table));
}

#[then(expr = "the cluster contains {word} {string}")]
fn assert_cluster_contains(world: &mut VersemapWorld, tx: String, reference: String) {
    let location = member(&tx, &reference);
    assert!(
        world.members.contains(&location),
        "Expected {location} in {:?}",
        world.members
    );
}

#[then(expr = "the cluster does not contain {word} {string}")]
fn assert_cluster_excludes(world: &mut VersemapWorld, tx: String, reference: String) {
    let location = member(&tx, &reference);
    assert!(
        !world.members.contains(&location),
        "Did not expect {location} in {:?}",
        world.members
    );
}

#[then(expr = "the same-translation siblings are {string}")]
fn assert_siblings(world: &mut VersemapWorld, expected: String) {
    assert_eq!(world.siblings, parse_reference_list(&expected));
}

#[then("every member reports the same cluster id")]
fn assert_symmetric(world: &mut VersemapWorld) {
    let expected = world.cluster_id.clone().expect("a cluster was computed");
    let members = world.members.clone();
    let service = world.service();
    for member in &members {
        assert_eq!(
            service.cluster_id(&member.translation, &member.key),
            expected,
            "member {member}"
        );
    }
}

#[then("loading succeeds")]
fn assert_load_success(world: &mut VersemapWorld) {
    assert!(
        world.service.is_some(),
        "Expected rule set to load, got error: {:?}",
        world.error_message()
    );
}

#[then(expr = "loading fails with {string}")]
fn assert_load_failure(world: &mut VersemapWorld, fragment: String) {
    let message = world
        .error_message()
        .unwrap_or_else(|| panic!("Expected load failure containing '{fragment}'"));
    assert!(
        message.contains(&fragment),
        "Expected error containing '{fragment}', got '{message}'"
    );
}

#[then(expr = "{int} overlap(s) is/are reported")]
fn assert_overlap_count(world: &mut VersemapWorld, count: usize) {
    let overlaps = world.service().rules().overlaps();
    assert_eq!(overlaps.len(), count, "overlaps: {overlaps:?}");
}

fn member(tx: &str, reference: &str) -> Location {
    let key = parse_reference(reference).expect("valid reference in feature file");
    Location::new(VersemapWorld::translation(tx), key)
}

//! Integration tests against the shipped KJV <-> Russian Synodal rule document.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::path::PathBuf;
use versemap_engine::{LoadOptions, Location, Translation, VerseKey, VerseMapService};

fn rules_path() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join("rules").join("kjv_rst.yaml"))
        .expect("Could not find rules directory")
}

fn service() -> VerseMapService {
    VerseMapService::from_yaml_file(rules_path(), LoadOptions { strict: true })
        .expect("Failed to load shipped rules")
}

fn kjv() -> Translation {
    Translation::new("kjv")
}

fn rst() -> Translation {
    Translation::new("rst")
}

fn key(book: &str, chapter: u32, verse: u32) -> VerseKey {
    VerseKey::new(book, chapter, verse)
}

fn loc(tx: &str, book: &str, chapter: u32, verse: u32) -> Location {
    Location::new(Translation::new(tx), key(book, chapter, verse))
}

#[test]
fn test_shipped_rules_load_strict() {
    let service = service();
    assert_eq!(service.pair().a(), &kjv());
    assert_eq!(service.pair().b(), &rst());
    assert_eq!(service.rules().len(), 20);
    assert!(service.rules().overlaps().is_empty());
}

#[test]
fn test_every_variant_is_exercised() {
    let service = service();
    let variants: BTreeSet<&str> = service
        .rules()
        .rules()
        .iter()
        .map(|rule| rule.kind.name())
        .collect();
    assert_eq!(
        variants.into_iter().collect::<Vec<_>>(),
        vec!["chapter_remap", "merge", "point", "span", "split", "title_offset"]
    );
}

#[test]
fn test_old_testament_shifts() {
    let service = service();
    let cases = [
        (kjv(), key("Numbers", 16, 36), vec![key("Numbers", 17, 1)]),
        (kjv(), key("Numbers", 17, 13), vec![key("Numbers", 17, 28)]),
        (rst(), key("Numbers", 17, 16), vec![key("Numbers", 17, 1)]),
        (rst(), key("1 Kings", 5, 1), vec![key("1 Kings", 4, 21)]),
        (kjv(), key("Daniel", 4, 4), vec![key("Daniel", 4, 1)]),
        (rst(), key("Daniel", 3, 31), vec![key("Daniel", 4, 1)]),
        (kjv(), key("Joel", 2, 28), vec![key("Joel", 3, 1)]),
        (rst(), key("Joel", 4, 21), vec![key("Joel", 3, 21)]),
        (kjv(), key("Joel", 3, 1), vec![key("Joel", 4, 1)]),
        (kjv(), key("Jonah", 1, 17), vec![key("Jonah", 2, 1)]),
        (rst(), key("Jonah", 2, 11), vec![key("Jonah", 2, 10)]),
        (kjv(), key("Song of Songs", 6, 13), vec![key("Song of Solomon", 7, 1)]),
    ];
    for (tx, verse, expected) in cases {
        assert_eq!(service.match_to_other(&tx, &verse), expected, "{tx} {verse}");
    }
}

#[test]
fn test_new_testament_shifts() {
    let service = service();
    assert_eq!(
        service.match_to_other(&kjv(), &key("Rom", 16, 26)),
        vec![key("Romans", 14, 25)]
    );
    assert_eq!(
        service.match_to_other(&rst(), &key("2 Cor", 13, 12)),
        vec![key("2 Corinthians", 13, 12), key("2 Corinthians", 13, 13)]
    );
    assert_eq!(
        service.match_to_other(&rst(), &key("2 Corinthians", 13, 13)),
        vec![key("2 Corinthians", 13, 14)]
    );
    assert_eq!(
        service.match_to_other(&kjv(), &key("3 John", 1, 14)),
        vec![key("3 John", 1, 14), key("3 John", 1, 15)]
    );
}

#[test]
fn test_psalm_titles() {
    let service = service();
    assert_eq!(
        service.match_to_other(&kjv(), &key("Psalm", 3, 1)),
        vec![key("Psalms", 3, 2)]
    );
    assert_eq!(
        service.match_to_other(&kjv(), &key("Psalms", 51, 1)),
        vec![key("Psalms", 51, 3)]
    );
    assert_eq!(
        service.match_to_other(&rst(), &key("Psalms", 51, 21)),
        vec![key("Psalms", 51, 19)]
    );
    for title in [key("Psalms", 3, 1), key("Psalms", 51, 1), key("Psalms", 51, 2)] {
        assert!(!service.exists_in_other(&rst(), &title), "{title}");
    }
    // untitled psalms keep their numbering
    assert_eq!(
        service.match_to_other(&rst(), &key("Ps.", 23, 1)),
        vec![key("Psalms", 23, 1)]
    );
}

#[test]
fn test_unmapped_and_unknown_books_use_identity() {
    let service = service();
    for verse in [key("John", 3, 16), key("Tobit", 1, 1)] {
        assert_eq!(service.match_to_other(&kjv(), &verse), vec![verse.clone()]);
    }
}

#[test]
fn test_jonah_cluster() {
    let service = service();
    assert_eq!(
        service.cluster_members(&rst(), &key("Jonah", 2, 1)),
        vec![
            loc("kjv", "Jonah", 1, 17),
            loc("rst", "Jonah", 1, 17),
            loc("rst", "Jonah", 2, 1),
        ]
    );
    assert_eq!(
        service.cluster_members(&kjv(), &key("Jonah", 2, 1)),
        vec![loc("kjv", "Jonah", 2, 1), loc("rst", "Jonah", 2, 2)]
    );
}

#[test]
fn test_merge_cluster_and_siblings() {
    let service = service();
    assert_eq!(
        service.cluster_members(&rst(), &key("2 Corinthians", 13, 12)),
        vec![
            loc("kjv", "2 Corinthians", 13, 12),
            loc("kjv", "2 Corinthians", 13, 13),
            loc("rst", "2 Corinthians", 13, 12),
        ]
    );
    assert_eq!(
        service.same_translation_siblings(&kjv(), &key("2 Corinthians", 13, 13)),
        vec![key("2 Corinthians", 13, 12)]
    );
}

#[test]
fn test_cluster_ids_are_symmetric() {
    let service = service();
    let seeds = [
        (kjv(), key("Jonah", 1, 17)),
        (kjv(), key("Jonah", 2, 5)),
        (kjv(), key("Numbers", 16, 40)),
        (kjv(), key("Daniel", 4, 2)),
        (rst(), key("Joel", 4, 3)),
        (kjv(), key("Song of Solomon", 6, 13)),
        (rst(), key("Acts", 19, 40)),
        (kjv(), key("Romans", 16, 26)),
        (rst(), key("2 Corinthians", 13, 12)),
        (kjv(), key("Ephesians", 3, 17)),
        (kjv(), key("3 John", 1, 14)),
        (kjv(), key("Psalms", 51, 1)),
        (rst(), key("Psalms", 3, 1)),
        (kjv(), key("Psalms", 23, 4)),
    ];
    for (tx, verse) in seeds {
        let id = service.cluster_id(&tx, &verse);
        let members = service.cluster_members(&tx, &verse);
        assert!(members.contains(&Location::new(tx.clone(), verse.clone())));
        for member in &members {
            assert_eq!(
                service.cluster_id(&member.translation, &member.key),
                id,
                "seed {tx} {verse}, member {member}"
            );
            assert_eq!(
                service.cluster_members(&member.translation, &member.key),
                members,
                "seed {tx} {verse}, member {member}"
            );
        }
    }
}

#[test]
fn test_psalms_clusters_never_bridge() {
    let service = service();
    for chapter in [3, 4, 23, 51, 60, 119] {
        for verse in 1..=12 {
            for tx in [kjv(), rst()] {
                let members = service.cluster_members(&tx, &key("Psalms", chapter, verse));
                for side in [kjv(), rst()] {
                    let on_side = members.iter().filter(|m| m.translation == side).count();
                    assert!(
                        on_side <= 1,
                        "{tx} Psalms {chapter}:{verse} bridged {on_side} {side} verses: {members:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_psalm_title_cluster_is_singleton() {
    let service = service();
    assert_eq!(
        service.cluster_members(&rst(), &key("Psalms", 51, 2)),
        vec![loc("rst", "Psalms", 51, 2)]
    );
    assert_eq!(
        service.cluster_id(&rst(), &key("Psalms", 51, 2)),
        "rst|Psalms|51|2"
    );
}

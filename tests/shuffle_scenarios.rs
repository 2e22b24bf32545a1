use bevy::prelude::*;

use shelfstock::stocking::registry::{MemberDef, ProductGroupDef, ShelfDef};
use shelfstock::stocking::scene::{product_actor, shelf_actor, MemoryScene};
use shelfstock::stocking::{
    CompactDirection, ShelfScene, ShuffleParams, ShuffleSession, ShuffleSettings, WhitelistDoc,
};

const SHELF_SIZE: Vec3 = Vec3::new(0.6, 3.0, 2.0);
const PRODUCT_SIZE: Vec3 = Vec3::new(0.12, 0.1, 0.2);

fn shelf_def(name: &str, levels: &[f32]) -> ShelfDef {
    ShelfDef {
        name: name.into(),
        scale: 1.0,
        shelfbase: levels.to_vec(),
        shelfoffset: vec![],
        compaction: CompactDirection::TowardMinY,
    }
}

fn group_def(group: &str, shelf: &str, members: &[String], discard: bool) -> ProductGroupDef {
    ProductGroupDef {
        group_name: group.into(),
        shelf_name: shelf.into(),
        discard,
        description: None,
        members: members.iter().map(|n| MemberDef { name: n.clone(), scale: 1.0 }).collect(),
    }
}

fn names(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix}_{i:03}")).collect()
}

/// One shelf at the origin plus every product parked in a row well in front of it.
fn scene_with(levels: &[f32], products: &[String]) -> MemoryScene {
    let mut scene = MemoryScene::new();
    scene.spawn(shelf_actor("shelf_a", Vec3::ZERO, SHELF_SIZE, levels, 0.02));
    for (i, name) in products.iter().enumerate() {
        scene.spawn(product_actor(name.as_str(), Vec3::new(-5.0, i as f32 * 0.5, 0.0), PRODUCT_SIZE));
    }
    scene
}

fn settings(seed: u64) -> ShuffleSettings {
    ShuffleSettings { end_margin: 0.1, ..ShuffleSettings::default().with_seed(seed) }
}

fn snapshot(scene: &MemoryScene) -> Vec<(Vec3, Vec3, bool)> {
    scene.actors().iter().map(|a| (a.position, a.scale, a.visible)).collect()
}

#[test]
fn two_products_on_an_empty_three_level_shelf() {
    let members = names("can", 2);
    let mut scene = scene_with(&[0.0, 0.5, 1.0], &members);
    let doc = WhitelistDoc::new(vec![shelf_def("shelf_a", &[0.0, 0.5, 1.0])], vec![group_def("cans", "shelf_a", &members, false)]);
    let mut session = ShuffleSession::new(&mut scene, doc, settings(1));

    let report = session.run_shuffle(ShuffleParams::new(1.0, 0.0)).unwrap();
    assert_eq!(report.placement.placed_random, 2);
    assert_eq!(report.placement.placed_clustered, 0);
    assert_eq!(report.placement.exhausted, 0);
    assert_eq!(report.discarded, 0);
    for p in session.catalog().products() {
        assert!(p.on_shelf && !p.discarded, "{} not seated", p.name);
    }
}

#[test]
fn fixed_seed_repeats_the_same_layout() {
    let members = names("box", 12);
    let mut scene = scene_with(&[0.1, 0.4, 0.7], &members);
    let doc = WhitelistDoc::new(vec![shelf_def("shelf_a", &[0.1, 0.4, 0.7])], vec![group_def("boxes", "shelf_a", &members, false)]);
    let mut session = ShuffleSession::new(&mut scene, doc, settings(42));
    let params = ShuffleParams { density: 0.7, proximity: 0.5, organize: true, per_group: false };

    let first = session.run_shuffle(params).unwrap();
    let layout = snapshot(session.scene());
    let second = session.run_shuffle(params).unwrap();

    assert_eq!(first, second);
    assert_eq!(layout, snapshot(session.scene()));
}

#[test]
fn zero_density_discards_everything() {
    let members = names("box", 6);
    let mut scene = scene_with(&[0.5], &members);
    let doc = WhitelistDoc::new(vec![shelf_def("shelf_a", &[0.5])], vec![group_def("boxes", "shelf_a", &members, false)]);
    let region = ShuffleSettings::default().discard_region;
    let mut session = ShuffleSession::new(&mut scene, doc, settings(3));

    let report = session.run_shuffle(ShuffleParams::new(0.0, 0.5)).unwrap();
    assert_eq!(report.placement.thinned, 6);
    assert_eq!(report.discarded, 6);
    for p in session.catalog().products() {
        assert!(p.discarded && !p.on_shelf);
        assert_eq!(session.scene().position(p.actor), region);
    }
}

#[test]
fn configured_discard_group_is_never_placed() {
    let keep = names("keep", 3);
    let drop = names("drop", 3);
    let all: Vec<String> = keep.iter().chain(&drop).cloned().collect();
    let mut scene = scene_with(&[0.5], &all);
    let doc = WhitelistDoc::new(
        vec![shelf_def("shelf_a", &[0.5])],
        vec![group_def("keep", "shelf_a", &keep, false), group_def("drop", "shelf_a", &drop, true)],
    );
    let region = ShuffleSettings::default().discard_region;
    let mut session = ShuffleSession::new(&mut scene, doc, settings(8));

    let report = session.run_shuffle(ShuffleParams::new(1.0, 1.0)).unwrap();
    assert_eq!(report.placement.placed(), 3);
    let dropped = &session.catalog().groups[1];
    assert!(dropped.discarded);
    for p in &dropped.members {
        assert!(p.discarded && !p.on_shelf);
        assert_eq!(session.scene().position(p.actor), region);
    }
}

#[test]
fn seated_products_never_overlap_and_never_outgrow_target() {
    let members = names("box", 40);
    let mut scene = scene_with(&[0.0, 0.25, 0.5, 0.75], &members);
    let doc = WhitelistDoc::new(
        vec![shelf_def("shelf_a", &[0.0, 0.25, 0.5, 0.75])],
        vec![group_def("a", "shelf_a", &members[..20], false), group_def("b", "shelf_a", &members[20..], false)],
    );
    let mut session = ShuffleSession::new(&mut scene, doc, settings(2024));

    session
        .run_shuffle(ShuffleParams { density: 1.0, proximity: 0.5, organize: true, per_group: false })
        .unwrap();

    let scene = session.scene();
    for p in session.catalog().products().filter(|p| p.on_shelf) {
        assert!(scene.overlapping(p.actor).is_empty(), "{} overlaps {:?}", p.name, scene.overlapping(p.actor));
        let applied = scene.actor(p.actor).unwrap().scale;
        assert!(applied.max_element() <= p.scale + 1e-6, "{} grew to {applied}", p.name);
    }
}

#[test]
fn full_proximity_always_clusters() {
    let members = names("box", 8);
    let mut scene = scene_with(&[0.5], &members);
    let doc = WhitelistDoc::new(vec![shelf_def("shelf_a", &[0.5])], vec![group_def("boxes", "shelf_a", &members, false)]);
    let mut session = ShuffleSession::new(&mut scene, doc, settings(5));

    let report = session.run_shuffle(ShuffleParams::new(1.0, 1.0)).unwrap();
    assert_eq!(report.placement.placed_random, 0);
    assert_eq!(report.placement.placed_clustered + report.placement.exhausted, 8);
}

#[test]
fn per_group_density_keeps_or_drops_whole_groups() {
    let members = names("box", 24);
    let mut scene = scene_with(&[0.2, 0.6], &members);
    let groups = members
        .chunks(3)
        .enumerate()
        .map(|(i, chunk)| group_def(&format!("g{i}"), "shelf_a", chunk, false))
        .collect();
    let doc = WhitelistDoc::new(vec![shelf_def("shelf_a", &[0.2, 0.6])], groups);
    let mut session = ShuffleSession::new(&mut scene, doc, settings(77));

    let report = session
        .run_shuffle(ShuffleParams { density: 0.5, proximity: 0.0, organize: false, per_group: true })
        .unwrap();
    assert_eq!(report.placement.thinned % 3, 0);
    for g in &session.catalog().groups {
        let discarded = g.members.iter().filter(|m| m.discarded).count();
        assert!(discarded == 0 || discarded == g.members.len(), "group {} split", g.name);
    }
}

#[test]
fn unresolved_names_shrink_the_catalog() {
    let members = names("box", 3);
    let mut scene = scene_with(&[0.5], &members);
    let mut listed = members.clone();
    listed.push("box_999".into());
    let doc = WhitelistDoc::new(
        vec![shelf_def("shelf_a", &[0.5]), shelf_def("shelf_missing", &[0.5])],
        vec![group_def("boxes", "shelf_a", &listed, false)],
    );
    let mut session = ShuffleSession::new(&mut scene, doc, settings(1));

    let catalog = session.read_whitelist().unwrap();
    assert_eq!(catalog.shelves.len(), 1);
    assert_eq!(catalog.product_count(), 3);
}

#[test]
fn occlusion_hides_products_behind_others() {
    let mut scene = MemoryScene::new();
    scene.spawn(shelf_actor("shelf_a", Vec3::ZERO, SHELF_SIZE, &[0.25], 0.02));
    scene.spawn(product_actor("front", Vec3::new(0.1, 1.0, 0.5), Vec3::new(0.1, 0.5, 0.5)));
    scene.spawn(product_actor("behind", Vec3::new(0.4, 1.0, 0.5), Vec3::new(0.1, 0.2, 0.2)));
    scene.spawn(product_actor("aside", Vec3::new(0.4, 2.2, 0.5), Vec3::new(0.1, 0.2, 0.2)));
    let doc = WhitelistDoc::new(
        vec![shelf_def("shelf_a", &[0.25])],
        vec![group_def("g", "shelf_a", &["front".into(), "behind".into(), "aside".into()], false)],
    );
    let mut session = ShuffleSession::new(&mut scene, doc, ShuffleSettings::default());

    let report = session.run_occlusion_pass(0.5).unwrap();
    assert_eq!(report.get("behind").unwrap().ratio, 0.0);
    assert_eq!(report.get("aside").unwrap().ratio, 1.0);
    assert_eq!(report.get("front").unwrap().ratio, 1.0);
    assert_eq!(report.hidden, 1);

    let scene = session.scene();
    assert!(!scene.actor_named("behind").unwrap().visible);
    assert!(scene.actor_named("aside").unwrap().visible);
}

#[test]
fn reshuffle_reveals_products_hidden_by_occlusion() {
    let mut scene = MemoryScene::new();
    scene.spawn(shelf_actor("shelf_a", Vec3::ZERO, SHELF_SIZE, &[0.25], 0.02));
    scene.spawn(product_actor("front", Vec3::new(0.1, 1.0, 0.5), Vec3::new(0.1, 0.5, 0.5)));
    scene.spawn(product_actor("behind", Vec3::new(0.4, 1.0, 0.5), Vec3::new(0.1, 0.2, 0.2)));
    let doc = WhitelistDoc::new(
        vec![shelf_def("shelf_a", &[0.25])],
        vec![group_def("g", "shelf_a", &["front".into(), "behind".into()], false)],
    );
    let mut session = ShuffleSession::new(&mut scene, doc, settings(6));

    assert_eq!(session.run_occlusion_pass(0.5).unwrap().hidden, 1);
    assert!(!session.scene().actor_named("behind").unwrap().visible);

    session.run_shuffle(ShuffleParams::new(1.0, 0.0)).unwrap();
    for p in session.catalog().products() {
        assert!(session.scene().actor_named(&p.name).unwrap().visible, "{} still hidden", p.name);
    }
}

#[test]
fn group_on_unknown_shelf_is_discarded_untouched() {
    let members = names("box", 2);
    let orphans = names("orphan", 2);
    let all: Vec<String> = members.iter().chain(&orphans).cloned().collect();
    let mut scene = scene_with(&[0.5], &all);
    let doc = WhitelistDoc::new(
        vec![shelf_def("shelf_a", &[0.5])],
        vec![group_def("boxes", "shelf_a", &members, false), group_def("lost", "shelf_typo", &orphans, false)],
    );
    let region = ShuffleSettings::default().discard_region;
    let mut session = ShuffleSession::new(&mut scene, doc, settings(4));

    let report = session.run_shuffle(ShuffleParams::new(1.0, 0.0)).unwrap();
    assert_eq!(report.staged, 2);
    assert_eq!(report.discarded, 2 + report.placement.exhausted);
    for p in &session.catalog().groups[1].members {
        assert!(p.discarded && !p.on_shelf);
        let actor = session.scene().actor(p.actor).unwrap();
        assert_eq!(actor.position, region);
        assert_eq!(actor.scale, Vec3::ONE);
    }
}

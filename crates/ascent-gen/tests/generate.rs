// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used, clippy::panic)]
//! End-to-end runs over small synthetic worlds.
//!
//! Every fixture hops in place: trajectories are all zeros, so each
//! placement lands one actor diameter below the previous one and jumps never
//! cross earlier platforms.

use ascent_gen::{
    AreaKind, CountRange, GenerateError, GeneratorConfig, Generator, JumpData, JumpMetadata, Level,
    MemoryJumpSource, SceneEvent, SegmentKind, StageLinks, Trajectory, WorldDataset,
};
use ascent_geom::{encode_kcl, CollisionCache, MemoryMeshSource, Prng, Triangle, Vec3};

const FLAT: &str = "Flat";
const GIANT: &str = "Giant";

fn quad(half: f32, y: f32, up: bool) -> Vec<Triangle> {
    let (a, b, c, d) = (
        Vec3::new(-half, y, -half),
        Vec3::new(-half, y, half),
        Vec3::new(half, y, -half),
        Vec3::new(half, y, half),
    );
    if up {
        vec![Triangle::new(a, b, c), Triangle::new(c, b, d)]
    } else {
        vec![Triangle::new(a, c, b), Triangle::new(c, d, b)]
    }
}

/// A large slab with a ceiling low enough to block earlier jumps.
fn giant() -> Vec<Triangle> {
    let mut tris = quad(20_000.0, 0.0, true);
    tris.extend(quad(20_000.0, 600.0, false));
    tris
}

fn cache() -> CollisionCache {
    CollisionCache::new(
        MemoryMeshSource::new()
            .with(FLAT, encode_kcl(&[quad(50.0, 0.0, true)]).unwrap().to_vec())
            .with(GIANT, encode_kcl(&[giant()]).unwrap().to_vec()),
    )
}

fn hop(name: &str) -> JumpData {
    let still = Trajectory::new(vec![Vec3::ZERO; 10]).unwrap();
    JumpData { name: name.to_owned(), metadata: JumpMetadata::default(), leading: still.clone(), following: still }
}

fn jumps() -> MemoryJumpSource {
    MemoryJumpSource::new().with("Default", vec![hop("hop-a"), hop("hop-b")]).with("Pokio", vec![hop("poke")])
}

fn config(count: u32) -> GeneratorConfig {
    let mut cfg = GeneratorConfig {
        leading_radius: 10.0,
        following_radius: 5.0,
        moving_platform_chance: 0.0,
        final_object: FLAT.to_owned(),
        timer_excluded_worlds: vec!["FlatWorld".to_owned()],
        ..GeneratorConfig::default()
    };
    cfg.segment_counts.default = CountRange::new(count, count);
    cfg
}

fn world(target: usize) -> WorldDataset {
    let mut w = WorldDataset::new("FlatWorld", vec![FLAT.to_owned()]);
    w.start_object = FLAT.to_owned();
    w.target_object_count = target;
    w
}

fn run(cfg: &GeneratorConfig, world: &WorldDataset, seed: u64) -> Result<Level, GenerateError> {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let cache = cache();
    let jumps = jumps();
    Generator::new(cfg, &cache, &jumps).generate(Vec3::new(0.0, 10_000.0, 0.0), world, &mut Prng::from_seed_u64(seed))
}

#[test]
fn flat_hops_fill_one_segment_without_reverts() {
    let level = run(&config(3), &world(4), 7).unwrap();
    assert_eq!(level.placements.len(), 4);
    assert_eq!(level.jumps.len(), 3);
    assert_eq!(level.stats.single_reverts, 0);
    assert_eq!(level.stats.zone_reverts, 0);
    assert_eq!(level.zones.len(), 1);
    assert_eq!(level.zones[0].name, "OnlyUpFlatWorldDefaultSegmentZone0");
    assert_eq!(level.placements[0].position, Vec3::new(0.0, 8500.0, 0.0));
    for (i, j) in level.jumps.iter().enumerate() {
        assert_eq!((j.from, j.to), (i, i + 1));
    }
    // Each hop lands one leading diameter (plus one) lower.
    for pair in level.placements.windows(2) {
        let drop = pair[0].position.y() - pair[1].position.y();
        assert!((drop - 11.0).abs() < 0.05, "drop {drop}");
    }
}

#[test]
fn same_seed_same_level() {
    let cfg = config(5);
    let w = world(6);
    let a = run(&cfg, &w, 99).unwrap();
    let b = run(&cfg, &w, 99).unwrap();
    let c = run(&cfg, &w, 100).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.jumps, c.jumps);
}

#[test]
fn blocked_final_object_reverts_single_placements() {
    // The ceiling of the giant slab sits in the path of the previous jump,
    // so the forced final object never fits and the run keeps stepping back.
    let mut cfg = config(10);
    cfg.final_object = GIANT.to_owned();
    cfg.max_reverts = Some(3);
    match run(&cfg, &world(4), 3) {
        Err(GenerateError::RevertLimit { limit, stats }) => {
            assert_eq!(limit, 3);
            assert_eq!(stats.single_reverts, 3);
            assert_eq!(stats.zone_reverts, 0);
            assert!(stats.attempts >= 4 * u64::from(cfg.max_attempts));
        }
        other => panic!("expected revert limit, got {other:?}"),
    }
}

#[test]
fn dead_end_behind_a_zone_boundary_is_stepped_back_into() {
    // Only the final object is blocked, and it is the first object of the
    // second zone; reopening that zone cannot help, so the run has to undo
    // placements of the completed first zone.
    let mut cfg = config(2);
    cfg.final_object = GIANT.to_owned();
    cfg.max_reverts = Some(50);
    match run(&cfg, &world(4), 3) {
        Err(GenerateError::RevertLimit { limit, stats }) => {
            assert_eq!(limit, 50);
            assert!(stats.single_reverts > 0, "{stats:?}");
            assert!(stats.zone_reverts > 0, "{stats:?}");
            assert_eq!(stats.single_reverts, stats.zone_reverts);
            assert_eq!(stats.single_reverts + stats.zone_reverts, 50);
        }
        other => panic!("expected revert limit, got {other:?}"),
    }
}

#[test]
fn failing_first_zone_underflows() {
    let mut cfg = config(3);
    cfg.final_object = "NoCollision".to_owned();
    match run(&cfg, &world(2), 1) {
        Err(GenerateError::RevertUnderflow { zone, object_index, object_type }) => {
            assert_eq!(zone, 0);
            assert_eq!(object_index, 0);
            assert_eq!(object_type, FLAT);
        }
        other => panic!("expected underflow, got {other:?}"),
    }
}

#[test]
fn missing_start_collision_is_fatal() {
    let mut w = world(4);
    w.start_object = "NoCollision".to_owned();
    assert!(matches!(run(&config(3), &w, 1), Err(GenerateError::StartWithoutCollision(_))));
}

#[test]
fn unplaceable_segment_zone_is_reverted_and_replaced() {
    // Poke objects have no collision, so every poke zone is dropped whole.
    let cfg = config(3);
    let mut w = world(8);
    w.special_segments = vec![SegmentKind::Poke];
    let mut completed = 0;
    for seed in 0..32 {
        match run(&cfg, &w, seed) {
            Ok(level) => {
                completed += 1;
                assert_eq!(level.stats.zone_reverts, 2);
                assert_eq!(level.stats.single_reverts, 0);
                assert_eq!(level.zones.len(), 3);
                assert!(level.zones.iter().all(|z| z.kind == SegmentKind::Default));
                assert_eq!(level.zones[2].name, "OnlyUpFlatWorldDefaultSegmentZone2");
                assert_eq!(level.placements.len(), 8);
                assert_eq!(level.jumps.len(), 7);
                for (i, j) in level.jumps.iter().enumerate() {
                    assert_eq!((j.from, j.to), (i, i + 1));
                }
            }
            // A poke segment drawn first has nothing to fall back on.
            Err(GenerateError::RevertUnderflow { zone: 0, .. }) => {}
            Err(other) => panic!("unexpected error {other}"),
        }
    }
    assert!(completed > 0);
}

#[test]
fn timer_switch_reveals_its_zone() {
    let mut cfg = config(2);
    cfg.timer_excluded_worlds.clear();
    cfg.segment_counts.timer = CountRange::new(2, 2);
    let level = run(&cfg, &world(9), 21).unwrap();
    assert_eq!(level.zones.len(), 4);
    let timers: Vec<_> = level.zones.iter().filter(|z| z.kind == SegmentKind::Timer).collect();
    assert_eq!(timers.len(), 2);
    for zone in timers {
        let trigger = zone.objects.iter().find(|o| o.parameter_config == "TrampleSwitchTimer").unwrap();
        let revealed: Vec<_> = zone.objects.iter().filter(|o| o.link_dest).map(|o| o.id).collect();
        assert_eq!(revealed.len(), 2);
        assert_eq!(trigger.links.switch_appear_target, revealed);
    }
}

#[test]
fn finished_level_streams_and_serialises() {
    let mut level = run(&config(3), &world(4), 5).unwrap();
    level.finish(&StageLinks { current: "A".into(), previous: None, next: "B".into() });

    let mut events: Vec<SceneEvent> = Vec::new();
    level.emit(&mut events);
    let first_zone = events.iter().position(|e| matches!(e, SceneEvent::BeginZone(_))).unwrap();
    assert_eq!(first_zone, level.objects.len() + level.areas.len());
    let zone_objects = events[first_zone..].iter().filter(|e| matches!(e, SceneEvent::Object(_))).count();
    assert_eq!(zone_objects, 4);
    assert!(level.areas.iter().any(|a| a.kind == AreaKind::Death));

    let json = serde_json::to_vec(&level).unwrap();
    let back: Level = serde_json::from_slice(&json).unwrap();
    assert_eq!(back, level);

    let mut obj = Vec::new();
    level.write_collision_obj(&cache(), &mut obj).unwrap();
    let text = String::from_utf8(obj).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 8);
    assert!(text.lines().any(|l| l.starts_with("v ") && l.contains("-1500")));
}

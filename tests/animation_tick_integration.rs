//! Engine tick integration tests for the animation system and world clock.

use std::sync::Arc;

use bevy_ecs::prelude::*;

use spritecycle::components::animator::{Animator, PlayForce};
use spritecycle::components::sprite::Sprite;
use spritecycle::events::animation::{AnimationMessage, ChannelListener};
use spritecycle::resources::catalog::{AnimationCatalog, AnimationClip, FrameRef};
use spritecycle::resources::worldtime::WorldTime;
use spritecycle::systems::animation::animation;
use spritecycle::systems::time::update_world_time;

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn frames(cells: std::ops::Range<u32>) -> Vec<FrameRef> {
    cells.map(|c| FrameRef::new("hero", c)).collect()
}

fn demo_catalog() -> Arc<AnimationCatalog> {
    Arc::new(
        AnimationCatalog::new(vec![
            AnimationClip::new("Idle", frames(0..2), 2.0).with_loop(),
            AnimationClip::new("Walk", frames(8..12), 8.0).with_loop(),
        ])
        .expect("valid demo catalog"),
    )
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world
}

fn tick_animation(world: &mut World, dt: f32) {
    update_world_time(world, dt);
    let mut schedule = Schedule::default();
    schedule.add_systems(animation);
    schedule.run(world);
}

fn play(world: &mut World, entity: Entity, name: &str, force: PlayForce) {
    let mut query = world.query::<(&mut Animator, &mut Sprite)>();
    let (mut animator, mut sprite) = query.get_mut(world, entity).expect("animated entity");
    animator
        .play_by_name(name, force, &mut *sprite)
        .expect("known clip name");
}

fn current_cell(world: &mut World, entity: Entity) -> Option<u32> {
    world
        .get::<Sprite>(entity)
        .and_then(|s| s.current.as_ref())
        .map(|f| f.cell)
}

#[test]
fn first_tick_activates_and_shows_fallback_frame() {
    let mut world = make_world();
    let hero = world
        .spawn((Animator::new(demo_catalog()), Sprite::default()))
        .id();

    tick_animation(&mut world, 0.0);

    let animator = world.get::<Animator>(hero).unwrap();
    assert!(animator.is_activated());
    assert_eq!(animator.current_name(), "Idle");
    assert_eq!(current_cell(&mut world, hero), Some(0));
}

#[test]
fn schedule_advances_walk_scenario() {
    let mut world = make_world();
    let (listener, notifications) = ChannelListener::new();
    let hero = world
        .spawn((
            Animator::new(demo_catalog()).with_listener(Box::new(listener)),
            Sprite::default(),
        ))
        .id();

    tick_animation(&mut world, 0.0);
    play(&mut world, hero, "Walk", PlayForce::None);
    assert_eq!(current_cell(&mut world, hero), Some(8));

    let mut seen = Vec::new();
    for _ in 0..4 {
        tick_animation(&mut world, 0.125);
        seen.push(current_cell(&mut world, hero).unwrap());
    }
    assert_eq!(seen, vec![9, 10, 11, 8]);

    let messages: Vec<AnimationMessage> = notifications.try_iter().collect();
    assert_eq!(
        messages,
        vec![
            AnimationMessage::Started {
                name: "Idle".to_owned()
            },
            AnimationMessage::Started {
                name: "Walk".to_owned()
            },
        ]
    );
}

#[test]
fn time_scale_slows_frame_stepping() {
    let mut world = make_world();
    world.insert_resource(WorldTime::default().with_time_scale(0.5));
    let hero = world
        .spawn((Animator::new(demo_catalog()), Sprite::default()))
        .id();

    // Idle needs half a second per frame; scaled ticks provide a quarter.
    tick_animation(&mut world, 0.5);
    assert_eq!(current_cell(&mut world, hero), Some(0));

    tick_animation(&mut world, 0.5);
    assert_eq!(current_cell(&mut world, hero), Some(1));

    let time = world.resource::<WorldTime>();
    assert!(approx_eq(time.elapsed, 0.5));
    assert_eq!(time.frame_count, 2);
}

#[test]
fn multiple_animators_share_one_catalog() {
    let mut world = make_world();
    let catalog = demo_catalog();
    let first = world
        .spawn((Animator::new(Arc::clone(&catalog)), Sprite::default()))
        .id();
    let second = world
        .spawn((Animator::new(Arc::clone(&catalog)), Sprite::default()))
        .id();

    tick_animation(&mut world, 0.0);
    play(&mut world, second, "Walk", PlayForce::None);
    tick_animation(&mut world, 0.125);

    // Independent playback positions over the same shared clip data.
    assert_eq!(current_cell(&mut world, first), Some(0));
    assert_eq!(current_cell(&mut world, second), Some(9));
    assert_eq!(
        world.get::<Animator>(first).unwrap().current_name(),
        "Idle"
    );
    assert_eq!(
        world.get::<Animator>(second).unwrap().current_name(),
        "Walk"
    );
}

#[test]
fn stop_clears_sprite_until_next_step() {
    let mut world = make_world();
    let hero = world
        .spawn((Animator::new(demo_catalog()), Sprite::default()))
        .id();

    tick_animation(&mut world, 0.0);
    assert_eq!(current_cell(&mut world, hero), Some(0));

    {
        let mut query = world.query::<(&mut Animator, &mut Sprite)>();
        let (mut animator, mut sprite) = query.get_mut(&mut world, hero).unwrap();
        animator.stop(&mut *sprite);
    }
    assert_eq!(current_cell(&mut world, hero), None);

    // The next full frame duration re-populates the sink from clip 0.
    tick_animation(&mut world, 0.5);
    assert_eq!(current_cell(&mut world, hero), Some(1));
}

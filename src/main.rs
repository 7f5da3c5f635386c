//! Spritecycle demo entry point.
//!
//! A frame-based sprite animation engine using:
//! - **bevy_ecs** for entity-component-system architecture
//! - **serde/serde_json** for catalog documents
//! - **crossbeam-channel** for out-of-band notification draining
//!
//! This executable wires a small demo: a hero sprite with looping idle and
//! walk clips, an unstoppable attack that refuses routine requests until it
//! completes, and a scripted driver issuing play requests over a fixed tick
//! loop.
//!
//! # Main Loop
//!
//! 1. Build the clip catalog (or load one with `--catalog`)
//! 2. Spawn the animator + sprite pair and register listeners
//! 3. Each tick: update [`WorldTime`], run the animation schedule, issue
//!    scripted play requests, drain channel notifications
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release
//! ```

#![allow(dead_code)]

mod components;
mod events;
mod resources;
mod systems;

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use clap::Parser;

use crate::components::animator::{Animator, NO_TAG, PlayForce};
use crate::components::sprite::Sprite;
use crate::events::animation::{ChannelListener, LogListener};
use crate::resources::catalog::{AnimationCatalog, AnimationClip, CatalogError, FrameRef};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation;
use crate::systems::time::update_world_time;

/// Spritecycle demo
#[derive(Parser)]
#[command(version, about = "Frame-based sprite animation engine demo")]
struct Cli {
    /// Load the animation catalog from a JSON document instead of the
    /// built-in demo clips.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Fixed tick rate in Hz.
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f32,
}

fn demo_catalog() -> Result<AnimationCatalog, CatalogError> {
    let sheet = |cell| FrameRef::new("hero", cell);
    AnimationCatalog::new(vec![
        AnimationClip::new("Idle", vec![sheet(0), sheet(1)], 2.0).with_loop(),
        AnimationClip::new("Walk", vec![sheet(8), sheet(9), sheet(10), sheet(11)], 8.0).with_loop(),
        AnimationClip::new("Attack", vec![sheet(16), sheet(17), sheet(18)], 10.0)
            .with_unstoppable()
            .with_tag(1, "hit"),
        AnimationClip::new("Die", vec![sheet(24), sheet(25), sheet(26), sheet(27)], 6.0),
    ])
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => AnimationCatalog::from_json_file(path),
        None => demo_catalog(),
    };
    let catalog = match catalog {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            eprintln!("Error loading catalog: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Catalog ready: {} clips", catalog.len());

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));

    let (channel_listener, notifications) = ChannelListener::new();
    let hero = world
        .spawn((
            Animator::new(Arc::clone(&catalog))
                .with_listener(Box::new(LogListener))
                .with_listener(Box::new(channel_listener)),
            Sprite::default(),
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(animation);

    let dt = 1.0 / cli.tick_rate;
    for tick in 0..cli.ticks {
        update_world_time(&mut world, dt);
        schedule.run(&mut world);

        // Scripted driver: walk, then an unstoppable attack that refuses
        // the routine idle request until it completes.
        match tick {
            30 => request(&mut world, hero, "Walk", PlayForce::None),
            90 => request(&mut world, hero, "Attack", PlayForce::None),
            100 => request(&mut world, hero, "Idle", PlayForce::None),
            _ => {}
        }

        for message in notifications.try_iter() {
            log::debug!("notification: {:?}", message);
        }

        if let Some(animator) = world.get::<Animator>(hero)
            && animator.current_tag() != NO_TAG
        {
            log::info!(
                "frame tag '{}' on clip '{}'",
                animator.current_tag(),
                animator.current_name()
            );
        }
    }

    if let Some(sprite) = world.get::<Sprite>(hero) {
        log::info!("Final frame: {:?}", sprite.current);
    }
}

fn request(world: &mut World, entity: Entity, name: &str, force: PlayForce) {
    let mut query = world.query::<(&mut Animator, &mut Sprite)>();
    if let Ok((mut animator, mut sprite)) = query.get_mut(world, entity)
        && let Err(e) = animator.play_by_name(name, force, &mut *sprite)
    {
        log::error!("Play request failed: {e}");
    }
}

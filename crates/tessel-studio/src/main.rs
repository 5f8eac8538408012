//! Headless scene demo.
//!
//! Builds a centred group of bouncing sprites, adds more groups from a
//! simulated touch thread through the scene's action queue, and logs what the
//! render-state cache forwarded to the (recording) backend each frame.
//!
//! `RUST_LOG=tessel_studio=debug` shows per-frame statistics.

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tessel_engine::animate::Velocity;
use tessel_engine::coords::{Rect, Vec2};
use tessel_engine::device::{CallLog, GpuCall, RecordingBackend, TextureId};
use tessel_engine::logging::{init_logging, LoggingConfig};
use tessel_engine::render::Texture;
use tessel_engine::scene::{self, NodeId, Scene, SceneConfig};
use tessel_engine::time::FrameClock;

/// Demo configuration.
#[derive(Debug, Clone)]
struct StudioConfig {
    scene_size: Vec2,
    frames: u32,
    fps: u32,
    /// Sleep one frame step between frames so taps spread across the run.
    pace: bool,
    group_size: Vec2,
    children_per_group: usize,
    /// Bouncer speed range in pixels per second.
    min_speed: f32,
    max_speed: f32,
    /// Screen-space (top-left origin) tap positions, one per `tap_interval`.
    taps: Vec<Vec2>,
    tap_interval: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            scene_size: Vec2::new(720.0, 1280.0),
            frames: 120,
            fps: 60,
            pace: true,
            group_size: Vec2::new(500.0, 500.0),
            children_per_group: 100,
            min_speed: 40.0,
            max_speed: 160.0,
            taps: vec![Vec2::new(200.0, 300.0), Vec2::new(520.0, 900.0), Vec2::new(360.0, 640.0)],
            tap_interval: Duration::from_millis(400),
        }
    }
}

/// Stand-ins for three 32px sprite textures.
const TEXTURES: [Texture; 3] = [
    Texture::new(TextureId(1), 32, 32),
    Texture::new(TextureId(2), 32, 32),
    Texture::new(TextureId(3), 32, 32),
];

/// Everything `add_group` needs, copied into tap actions.
#[derive(Debug, Copy, Clone)]
struct GroupSpec {
    size: Vec2,
    children: usize,
    min_speed: f32,
    max_speed: f32,
}

/// Low-discrepancy point in the unit square (R2 sequence).
fn scatter(i: usize) -> Vec2 {
    const G: f64 = 1.324_717_957_244_746;
    let n = i as f64;
    let x = (0.5 + n / G).fract();
    let y = (0.5 + n / (G * G)).fract();
    Vec2::new(x as f32, y as f32)
}

/// Adds a group of `spec.children` bouncing sprites centred at `at`.
fn add_group(scene: &mut Scene, texture: Texture, at: Vec2, spec: GroupSpec, seed: usize) -> scene::Result<NodeId> {
    let root = scene.root();
    let group = scene.create_container();
    scene.add_child(root, group)?;
    scene
        .node_mut(group)?
        .set_size(spec.size.x, spec.size.y)
        .set_origin_at_center()
        .set_position(at.x, at.y);

    let room = Rect::from_origin_size(Vec2::ZERO, spec.size - texture.size());
    for n in 0..spec.children {
        let i = seed * spec.children + n;
        let p = scatter(i);
        let d = scatter(i + 7919);

        let angle = d.x * std::f32::consts::TAU;
        let speed = spec.min_speed + (spec.max_speed - spec.min_speed) * d.y;
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        let obj = scene.create_sprite(Some(texture));
        scene.add_child(group, obj)?;
        scene
            .node_mut(obj)?
            .set_position(p.x * room.width(), p.y * room.height());
        scene.add_manipulator(obj, Velocity::new(velocity, room))?;
    }

    log::info!("group {group:?} added at ({:.0}, {:.0}) with {} children", at.x, at.y, spec.children);
    Ok(group)
}

#[derive(Debug, Default)]
struct Totals {
    frames: u32,
    drawn: u32,
    requested: u64,
    emitted: u64,
    draw_calls: u64,
    backend_calls: u64,
    gpu_errors: u64,
}

fn run(config: &StudioConfig) -> Result<()> {
    let backend = RecordingBackend::new();
    let calls = backend.log();

    let scene_config = SceneConfig {
        auto_update_bounds: true,
        cull_to_viewport: true,
        ..SceneConfig::sized(config.scene_size.x, config.scene_size.y)
    };
    let mut scene = Scene::new(Box::new(backend), scene_config);

    let spec = GroupSpec {
        size: config.group_size,
        children: config.children_per_group,
        min_speed: config.min_speed,
        max_speed: config.max_speed,
    };
    add_group(&mut scene, TEXTURES[0], config.scene_size * 0.5, spec, 0)
        .context("failed to build the initial group")?;

    // Touch input arrives off the render thread; it only reaches the scene
    // through the action queue.
    let sender = scene.action_sender();
    let taps = config.taps.clone();
    let interval = config.tap_interval;
    let height = config.scene_size.y;
    let tapper = thread::Builder::new()
        .name("taps".into())
        .spawn(move || {
            for (n, tap) in taps.into_iter().enumerate() {
                thread::sleep(interval);
                let seed = n + 1;
                let texture = TEXTURES[seed % TEXTURES.len()];
                // Screen y grows downwards, the scene's bottom-left y upwards.
                let at = Vec2::new(tap.x, height - tap.y);
                let queued = sender.send(move |scene| {
                    if let Err(err) = add_group(scene, texture, at, spec, seed) {
                        log::error!("tap at {at:?} dropped: {err}");
                    }
                });
                if !queued {
                    break;
                }
            }
        })
        .context("failed to spawn the tap thread")?;

    let mut clock = FrameClock::fixed_fps(config.fps);
    let step = Duration::from_secs(1) / config.fps.max(1);
    let mut totals = Totals::default();

    for _ in 0..config.frames {
        let ft = clock.tick();
        frame(&mut scene, ft.delta_ms, &calls, &mut totals);
        if config.pace {
            thread::sleep(step);
        }
    }

    tapper
        .join()
        .map_err(|_| anyhow!("tap thread panicked"))?;
    // Taps that arrived after the last frame.
    frame(&mut scene, clock.tick().delta_ms, &calls, &mut totals);

    let root = scene.root();
    let groups = scene.children(root).context("scene root vanished")?.len();
    let nodes = scene.count_descendants(root).context("scene root vanished")?;

    log::info!(
        "{} frames ({} drawn), {groups} groups, {nodes} nodes",
        totals.frames,
        totals.drawn
    );
    log::info!(
        "state changes: {} requested, {} emitted, {} absorbed by the cache",
        totals.requested,
        totals.emitted,
        totals.requested - totals.emitted
    );
    log::info!(
        "{} draw calls, {} backend calls, {} gpu errors",
        totals.draw_calls,
        totals.backend_calls,
        totals.gpu_errors
    );
    Ok(())
}

fn frame(scene: &mut Scene, delta_ms: f32, calls: &CallLog, totals: &mut Totals) {
    calls.clear();
    let report = scene.frame(delta_ms);
    let stats = report.stats;

    totals.frames += 1;
    totals.drawn += u32::from(report.drawn);
    totals.requested += u64::from(stats.requested);
    totals.emitted += u64::from(stats.emitted);
    totals.draw_calls += u64::from(stats.draw_calls);
    totals.backend_calls += calls.len() as u64;
    totals.gpu_errors += report.gpu_errors as u64;

    log::debug!(
        "frame {}: {} actions, {} draws, {}/{} state changes emitted, {} texture binds",
        report.frame_index,
        report.actions_run,
        stats.draw_calls,
        stats.emitted,
        stats.requested,
        calls.count(|c| matches!(c, GpuCall::BindTexture(_)))
    );
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    run(&StudioConfig::default())
}

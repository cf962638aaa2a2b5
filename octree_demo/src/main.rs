//! Octree Simulation Demo
//!
//! Headless counterpart of the visual octree demo:
//! - Ships drift through a cubic world, bouncing off its walls
//! - A few ships are allowed to escape and later turn back
//! - The octree re-indexes moved ships every frame and emits its node boxes
//!   to a debug draw system, which a renderer would consume
//!
//! Usage: `octree_demo [config.toml|config.ron]`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial_engine::config::Config;
use spatial_engine::core::config::SpatialConfig;
use spatial_engine::debug::{DebugDrawSystem, ObjectDebugColors};
use spatial_engine::foundation::collections::ObjectId;
use spatial_engine::foundation::logging;
use spatial_engine::foundation::math::Vec3;
use spatial_engine::foundation::time::{FrameTimings, Stopwatch};
use spatial_engine::spatial::{Octree, Placement, UpdateReport};

/// Escaping ships turn back once this far out, relative to the world half size
const ESCAPE_TURNAROUND: f32 = 1.5;

const SHIP_MARKER_SIZE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShipClass {
    Small,
    Large,
}

struct Ship {
    id: ObjectId,
    velocity: Vec3,
    escapes: bool,
}

struct OctreeSimulation {
    config: SpatialConfig,
    octree: Octree<ShipClass>,
    ships: Vec<Ship>,
    debug: DebugDrawSystem,
    colors: ObjectDebugColors,
    timings: FrameTimings,
    totals: UpdateReport,
}

impl OctreeSimulation {
    fn new(config: SpatialConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let octree = Octree::with_config(config.world_bounds, config.octree.clone())?;
        let box_duration = config.octree.debug.duration;
        Ok(Self {
            config,
            octree,
            ships: Vec::new(),
            debug: DebugDrawSystem::with_box_duration(box_duration),
            colors: ObjectDebugColors::default(),
            timings: FrameTimings::new(),
            totals: UpdateReport::default(),
        })
    }

    fn spawn_ships(&mut self, rng: &mut StdRng) {
        let demo = &self.config.demo;
        let bounds = self.config.world_bounds;

        for i in 0..demo.object_count {
            let position = Vec3::new(
                rng.gen_range(bounds.min.x..=bounds.max.x),
                rng.gen_range(bounds.min.y..=bounds.max.y),
                rng.gen_range(bounds.min.z..=bounds.max.z),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let class = if i % 4 == 0 { ShipClass::Large } else { ShipClass::Small };
            let speed = match class {
                ShipClass::Small => demo.max_speed,
                ShipClass::Large => demo.max_speed * 0.5,
            };

            let outcome = self.octree.insert(position, class);
            if outcome.placement == Placement::OutOfBounds {
                log::warn!("ship {i} spawned outside the world");
            }
            self.ships.push(Ship {
                id: outcome.id,
                velocity: direction * speed,
                escapes: rng.gen_bool(f64::from(demo.escape_ratio)),
            });
        }

        let stats = self.octree.stats();
        log::info!(
            "Spawned {} ships: {} nodes, {} leaves, deepest level {}",
            self.ships.len(),
            stats.node_count,
            stats.leaf_count,
            stats.deepest_level
        );
    }

    fn move_ships(&mut self, delta_time: f32) -> Result<(), Box<dyn std::error::Error>> {
        let bounds = self.config.world_bounds;
        let center = bounds.center();
        let half = bounds.extents();

        for ship in &mut self.ships {
            let Some(mut pos) = self.octree.position(ship.id) else {
                continue;
            };
            pos += ship.velocity * delta_time;

            for axis in 0..3 {
                let offset = pos[axis] - center[axis];
                let limit = if ship.escapes {
                    half[axis] * ESCAPE_TURNAROUND
                } else {
                    half[axis]
                };
                // Bounce off walls
                if offset.abs() > limit {
                    ship.velocity[axis] = -ship.velocity[axis];
                    pos[axis] = center[axis] + offset.clamp(-limit, limit);
                }
            }

            self.octree.set_position(ship.id, pos)?;
        }
        Ok(())
    }

    fn draw_ship_markers(&mut self) {
        for ship in &self.ships {
            let Some(position) = self.octree.position(ship.id) else {
                continue;
            };
            let outside = self.octree.homes(ship.id).is_some_and(<[_]>::is_empty);
            let color = if outside {
                self.colors.out_of_bounds
            } else {
                self.colors.indexed
            };
            self.debug.draw_point(position, color, SHIP_MARKER_SIZE, 0.0);
        }
    }

    fn step(&mut self, frame: u32) -> Result<(), Box<dyn std::error::Error>> {
        let delta_time = self.config.demo.time_step;
        self.move_ships(delta_time)?;

        let stopwatch = Stopwatch::start_new();
        let report = self.octree.update(&mut self.debug);
        self.timings.record(stopwatch.elapsed());

        self.draw_ship_markers();
        log::trace!(
            "frame {frame}: {} debug shapes queued",
            self.debug.shape_count()
        );

        self.totals.examined += report.examined;
        self.totals.relocated += report.relocated;
        self.totals.left_bounds += report.left_bounds;
        self.totals.reentered += report.reentered;
        self.totals.boxes_drawn += report.boxes_drawn;

        if report.left_bounds > 0 || report.reentered > 0 {
            log::debug!(
                "frame {frame}: {} ships left the world, {} came back",
                report.left_bounds,
                report.reentered
            );
        }

        if frame % self.config.demo.report_interval == 0 {
            self.report(frame);
        }

        // Single-frame shapes expire once the host has drawn them
        self.debug.update(delta_time);
        Ok(())
    }

    fn report(&self, frame: u32) {
        let stats = self.octree.stats();
        let crowded = self
            .octree
            .query_radius(self.config.world_bounds.center(), self.config.world_bounds.extents().min() * 0.25)
            .len();
        log::info!(
            "frame {frame}: {} nodes ({} leaves, {} terminal), deepest level {}, {} outside, {} multi-homed, {crowded} near center",
            stats.node_count,
            stats.leaf_count,
            stats.terminal_leaf_count,
            stats.deepest_level,
            stats.out_of_bounds_objects,
            stats.multi_homed_objects
        );
        log::info!(
            "update time: mean {:?}, min {:?}, max {:?}",
            self.timings.mean(),
            self.timings.min(),
            self.timings.max()
        );
    }

    fn run(mut self, rng: &mut StdRng) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_ships(rng);

        for frame in 1..=self.config.demo.frames {
            self.step(frame)?;
        }

        let counters = self.octree.counters();
        println!();
        println!("=== Simulation Summary ===");
        println!("Frames:             {}", self.timings.samples());
        println!("Ships examined:     {}", self.totals.examined);
        println!("Relocations:        {}", self.totals.relocated);
        println!("Left world:         {}", self.totals.left_bounds);
        println!("Re-entered world:   {}", self.totals.reentered);
        println!("Boxes drawn:        {}", self.totals.boxes_drawn);
        println!("Subdivisions:       {}", counters.subdivisions);
        println!("Depth-limited:      {}", counters.terminal_marks);
        println!("Mean update time:   {:?}", self.timings.mean());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SpatialConfig::load_from_file(&path)?,
        None => SpatialConfig::default(),
    };
    logging::init_with_level(&config.log_level);

    println!("=== Octree Simulation Demo ===");
    println!(
        "{} ships, {} frames, node capacity {}, depth budget {}",
        config.demo.object_count,
        config.demo.frames,
        config.octree.node_capacity,
        config.octree.max_depth
    );

    let mut rng = match config.demo.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let simulation = OctreeSimulation::new(config)?;
    simulation.run(&mut rng)
}

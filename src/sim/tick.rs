//! One frame of the fireworks display.

use super::firework::Flight;
use super::particle::Particle;
use super::state::Simulation;
use crate::surface::{BlendMode, Rgba, Surface};

/// Ambient hue drift per frame, in degrees.
pub const HUE_STEP: f32 = 0.5;
/// Particles released by one detonation.
pub const BURST_SIZE: usize = 30;
/// Translucent black erased over the whole surface each frame; leaves the
/// afterimage trails.
const FADE: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.5);

/// What happened during one [`tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub launched: usize,
    pub detonated: usize,
    pub expired: usize,
}

/// Run one animation frame: drift the hue, fade the surface, draw then
/// update every live entity, and fire whichever launch gates are due.
///
/// Spent shells and faded particles are dropped in the same pass that
/// visits them, so every entity is drawn and updated exactly once.
pub fn tick(sim: &mut Simulation, surface: &mut impl Surface) -> FrameStats {
    let mut stats = FrameStats::default();

    sim.hue = (sim.hue + HUE_STEP).rem_euclid(360.0);

    surface.set_blend_mode(BlendMode::DestinationOut);
    let (w, h) = (surface.width(), surface.height());
    surface.fill_rect(0.0, 0.0, w, h, FADE);
    surface.set_blend_mode(BlendMode::Lighter);

    let Simulation { fireworks, particles, rng, hue, .. } = sim;
    let hue = *hue;

    fireworks.retain_mut(|firework| {
        firework.draw(surface, hue);
        match firework.update(hue) {
            Flight::Climbing => true,
            Flight::Detonated { x, y, hue } => {
                log::trace!("detonation at ({x:.0}, {y:.0}) hue {hue:.1}");
                particles.extend((0..BURST_SIZE).map(|_| Particle::new(rng, x, y, hue)));
                stats.detonated += 1;
                false
            }
        }
    });

    particles.retain_mut(|particle| {
        particle.draw(surface);
        let alive = particle.update();
        if !alive {
            stats.expired += 1;
        }
        alive
    });

    if sim.timer.poll(!sim.pointer.held) {
        sim.launch_random();
        stats.launched += 1;
    }

    if sim.limiter.poll(sim.pointer.held) {
        let (x, y) = (sim.pointer.x, sim.pointer.y);
        sim.launch_toward(x, y);
        stats.launched += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::firework::Firework;
    use crate::sim::state::AUTO_LAUNCH_FRAMES;
    use crate::surface::testing::{Call, Recorder};
    use fastrand::Rng;

    fn setup(seed: u64) -> (Simulation, Recorder) {
        (
            Simulation::new(800.0, 600.0, Rng::with_seed(seed)),
            Recorder::new(800.0, 600.0),
        )
    }

    fn run(sim: &mut Simulation, surface: &mut Recorder, frames: usize) -> FrameStats {
        let mut total = FrameStats::default();
        for _ in 0..frames {
            let stats = tick(sim, surface);
            total.launched += stats.launched;
            total.detonated += stats.detonated;
            total.expired += stats.expired;
        }
        total
    }

    #[test]
    fn test_auto_launch_cadence() {
        for frames in [1, 79, 80, 81, 159, 160, 400, 1000] {
            let (mut sim, mut surface) = setup(1);
            let stats = run(&mut sim, &mut surface, frames);
            assert_eq!(stats.launched, frames / AUTO_LAUNCH_FRAMES as usize, "over {frames} frames");
        }
    }

    #[test]
    fn test_pointer_launch_cadence() {
        let (mut sim, mut surface) = setup(2);
        sim.pointer_down(100.0, 50.0);

        let mut launched_at = Vec::new();
        for frame in 1..=20 {
            let before = sim.fireworks.len();
            tick(&mut sim, &mut surface);
            if sim.fireworks.len() > before {
                launched_at.push(frame);
                assert_eq!(sim.fireworks.last().map(|f| f.target()), Some((100.0, 50.0)));
            }
        }
        assert_eq!(launched_at, vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_held_pointer_suppresses_auto_launch() {
        let (mut sim, mut surface) = setup(3);
        sim.pointer_down(400.0, 100.0);
        run(&mut sim, &mut surface, 200);
        assert_eq!(sim.timer.tick(), AUTO_LAUNCH_FRAMES);

        // Released: the parked auto gate fires on the very next frame
        sim.pointer_up();
        sim.fireworks.clear();
        let stats = tick(&mut sim, &mut surface);
        assert_eq!(stats.launched, 1);
        let (tx, ty) = sim.fireworks[0].target();
        assert!((0.0..800.0).contains(&tx) && (0.0..300.0).contains(&ty));
    }

    #[test]
    fn test_detonation_spawns_burst() {
        let (mut sim, mut surface) = setup(4);
        let mut rng = Rng::with_seed(99);
        sim.fireworks.push(Firework::new(&mut rng, 200.0, 200.0, 200.0, 200.0));

        let stats = tick(&mut sim, &mut surface);
        assert_eq!(stats.detonated, 1);
        assert!(sim.fireworks.is_empty());
        assert_eq!(sim.particles.len(), BURST_SIZE);
        for p in &sim.particles {
            assert!((p.hue() - sim.hue).abs() <= 20.0);
        }
        // The burst is drawn in the frame it appears
        assert_eq!(surface.lines(), 1 + BURST_SIZE);
    }

    #[test]
    fn test_particles_removed_only_once_faded() {
        let (mut sim, mut surface) = setup(5);
        let mut rng = Rng::with_seed(5);
        sim.particles.extend((0..BURST_SIZE).map(|_| Particle::new(&mut rng, 400.0, 300.0, 0.0)));
        // Keep the launch gates from adding anything
        sim.pointer_down(400.0, 600.0);

        let mut remaining = BURST_SIZE;
        let mut expired = 0;
        for _ in 0..100 {
            let stats = tick(&mut sim, &mut surface);
            sim.fireworks.clear();
            expired += stats.expired;
            remaining -= stats.expired;
            assert_eq!(sim.particles.len(), remaining);
            for p in &sim.particles {
                assert!(p.alpha() > p.decay());
            }
        }
        assert_eq!(expired, BURST_SIZE);
        assert!(sim.particles.is_empty());
    }

    #[test]
    fn test_frame_fades_then_draws_lighter() {
        let (mut sim, mut surface) = setup(6);
        sim.launch_toward(100.0, 100.0);
        tick(&mut sim, &mut surface);

        match &surface.calls[0] {
            Call::Fill { rect, color, blend } => {
                assert_eq!(*rect, (0.0, 0.0, 800.0, 600.0));
                assert_eq!(color.a, 0.5);
                assert_eq!(*blend, BlendMode::DestinationOut);
            }
            other => panic!("expected fade, got {other:?}"),
        }
        assert!(surface.calls[1..].iter().all(|c| match c {
            Call::Line { blend, .. } | Call::Circle { blend, .. } => *blend == BlendMode::Lighter,
            Call::Fill { .. } => false,
        }));
        assert_eq!(surface.blend, BlendMode::Lighter);
    }

    #[test]
    fn test_hue_drifts() {
        let (mut sim, mut surface) = setup(7);
        run(&mut sim, &mut surface, 10);
        assert_eq!(sim.hue, 125.0);
        run(&mut sim, &mut surface, 480);
        assert_eq!(sim.hue, 5.0);
    }

    #[test]
    fn test_resize_leaves_live_entities_alone() {
        let (mut sim, mut surface) = setup(8);
        sim.launch_toward(300.0, 100.0);
        sim.launch_random();
        let before: Vec<_> = sim.fireworks.iter().map(|f| (f.start(), f.target(), f.position())).collect();

        sim.resize(400.0, 200.0);
        surface.resize(400.0, 200.0);
        let after: Vec<_> = sim.fireworks.iter().map(|f| (f.start(), f.target(), f.position())).collect();
        assert_eq!(before, after);

        sim.launch_random();
        let newest = sim.fireworks.last().map(|f| (f.start(), f.target()));
        let (start, (tx, ty)) = newest.unwrap();
        assert_eq!(start, (200.0, 200.0));
        assert!((0.0..400.0).contains(&tx) && (0.0..100.0).contains(&ty));
    }
}

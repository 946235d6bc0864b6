//! Position update, wall bounce and color refresh.
//!
//! After velocities have been updated, positions advance by `v * dt`. Any
//! particle that ends up outside `[min, max]` is clamped onto the wall and
//! the offending velocity component is reflected and scaled by the
//! restitution. Axes are handled independently: hitting a side wall never
//! touches the vertical velocity.

use glam::{Vec2, Vec4};

use crate::config::SimulationConfig;
use crate::particle::Particle;
use crate::visuals::speed_tint;

/// Moves particles and keeps them inside the domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
    pub bounds_min: Vec2,
    pub bounds_max: Vec2,
    pub restitution: f32,
    pub base_color: Vec4,
    pub speed_cap: f32,
}

impl Integrator {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            bounds_min: config.bounds_min(),
            bounds_max: config.bounds_max(),
            restitution: config.restitution,
            base_color: config.base_color,
            speed_cap: config.speed_cap,
        }
    }

    /// Advance positions, bounce off walls and refresh colors.
    pub fn integrate(&self, particles: &mut [Particle], dt: f32) {
        for p in particles.iter_mut() {
            p.position += p.velocity * dt;
            self.bounce(p);
            p.color = speed_tint(self.base_color, p.speed(), self.speed_cap);
        }
    }

    /// Clamp one particle into the domain, reflecting per axis.
    pub fn bounce(&self, p: &mut Particle) {
        let (x, vx) = bounce_axis(p.position.x, p.velocity.x, self.bounds_min.x, self.bounds_max.x, self.restitution);
        let (y, vy) = bounce_axis(p.position.y, p.velocity.y, self.bounds_min.y, self.bounds_max.y, self.restitution);
        p.position = Vec2::new(x, y);
        p.velocity = Vec2::new(vx, vy);
    }
}

/// Resolve one axis. The velocity is forced to point back inside so a
/// particle already moving inward is not flipped outward again.
#[inline]
fn bounce_axis(pos: f32, vel: f32, min: f32, max: f32, restitution: f32) -> (f32, f32) {
    if pos < min {
        (min, vel.abs() * restitution)
    } else if pos > max {
        (max, -vel.abs() * restitution)
    } else {
        (pos, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleId;

    fn integrator() -> Integrator {
        Integrator {
            bounds_min: Vec2::new(5.0, 5.0),
            bounds_max: Vec2::new(95.0, 45.0),
            restitution: 0.5,
            base_color: Vec4::new(0.2, 0.5, 0.9, 1.0),
            speed_cap: 100.0,
        }
    }

    fn particle(position: Vec2, velocity: Vec2) -> Particle {
        Particle::new(ParticleId(0), position, velocity, 1.0, Vec4::ONE)
    }

    #[test]
    fn test_free_motion() {
        let mut particles = vec![particle(Vec2::new(50.0, 20.0), Vec2::new(10.0, -5.0))];
        integrator().integrate(&mut particles, 0.1);
        assert!((particles[0].position - Vec2::new(51.0, 19.5)).length() < 1e-5);
        assert_eq!(particles[0].velocity, Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_right_wall_bounce_only_touches_vx() {
        let mut particles = vec![particle(Vec2::new(94.0, 20.0), Vec2::new(40.0, 7.0))];
        integrator().integrate(&mut particles, 0.1);

        let p = particles[0];
        assert_eq!(p.position.x, 95.0);
        assert_eq!(p.velocity.x, -20.0);
        assert_eq!(p.velocity.y, 7.0);
        assert!((p.position.y - 20.7).abs() < 1e-5);
    }

    #[test]
    fn test_floor_bounce() {
        let mut particles = vec![particle(Vec2::new(50.0, 44.0), Vec2::new(0.0, 30.0))];
        integrator().integrate(&mut particles, 0.1);
        assert_eq!(particles[0].position.y, 45.0);
        assert_eq!(particles[0].velocity.y, -15.0);
    }

    #[test]
    fn test_corner_bounce_both_axes() {
        let mut particles = vec![particle(Vec2::new(6.0, 6.0), Vec2::new(-30.0, -30.0))];
        integrator().integrate(&mut particles, 0.1);
        assert_eq!(particles[0].position, Vec2::new(5.0, 5.0));
        assert_eq!(particles[0].velocity, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn test_outside_but_moving_inward_keeps_direction() {
        let mut p = particle(Vec2::new(2.0, 20.0), Vec2::new(8.0, 0.0));
        integrator().bounce(&mut p);
        assert_eq!(p.position.x, 5.0);
        assert_eq!(p.velocity.x, 4.0);
    }

    #[test]
    fn test_color_tracks_speed() {
        let mut particles = vec![
            particle(Vec2::new(50.0, 20.0), Vec2::ZERO),
            particle(Vec2::new(50.0, 30.0), Vec2::new(90.0, 0.0)),
        ];
        let integ = integrator();
        integ.integrate(&mut particles, 0.01);
        assert_eq!(particles[0].color, integ.base_color);
        assert!(particles[1].color.x > integ.base_color.x);
    }
}

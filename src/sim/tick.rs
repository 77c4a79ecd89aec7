//! Simulation step
//!
//! One call advances rotation, integrates the ball under gravity, and resolves
//! at most one contact.

use rand::Rng;

use super::collision::{
    Contact, bounce_velocity, deepest_contact, polygon_contact_edges, viewport_contact_edges,
};
use super::state::{ContactPhase, Rgb, Simulator};
use crate::config::BoundsMode;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Put the ball back at its spawn state before stepping
    pub reset: bool,
}

/// Apply input, then advance the simulation by `dt` seconds
pub fn tick<R: Rng>(sim: &mut Simulator<R>, input: &TickInput, dt: f32) {
    if input.reset {
        sim.reset();
    }
    sim.advance(dt);
}

impl<R: Rng> Simulator<R> {
    /// Advance the simulation by `dt` seconds
    ///
    /// Non-finite or non-positive `dt` skips the tick (the phase reads `Free`
    /// afterwards); anything above `max_dt` is clamped. A rotation or ball
    /// update that produces NaN or infinity is discarded and the previous
    /// state is kept.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            log::debug!("Skipping tick with dt={dt}");
            self.phase = ContactPhase::Free;
            self.last_contact = None;
            return;
        }
        let dt = dt.min(self.config.max_dt);

        if !self.polygon.rotate(dt) {
            log::warn!(
                "Discarding non-finite rotation at tick {} ({} deg/s over {dt} s)",
                self.time_ticks,
                self.polygon.angular_velocity
            );
        }

        let before = self.ball;
        self.ball.integrate(self.config.gravity, dt);

        let contact = if self.ball.is_finite() {
            self.find_contact()
        } else {
            None
        };
        if let Some(contact) = contact {
            self.resolve(&contact);
        }

        if !self.ball.is_finite() {
            log::warn!(
                "Discarding non-finite ball update at tick {} (pos={:?}, vel={:?})",
                self.time_ticks,
                self.ball.pos,
                self.ball.vel
            );
            self.ball = before;
            self.phase = ContactPhase::Free;
            self.last_contact = None;
            return;
        }

        self.phase = if contact.is_some() {
            ContactPhase::Colliding
        } else {
            ContactPhase::Free
        };
        self.last_contact = contact;
        self.time_ticks += 1;
        self.elapsed += f64::from(dt);
    }

    /// Deepest contact across polygon edges and, if enabled, the viewport walls
    fn find_contact(&self) -> Option<Contact> {
        let pos = self.ball.pos;
        let radius = self.ball.radius;
        let polygon_edges = polygon_contact_edges(&self.polygon);

        match self.config.bounds {
            BoundsMode::Open => deepest_contact(pos, radius, polygon_edges),
            BoundsMode::Viewport => {
                let viewport = self.config.viewport;
                let walls = viewport_contact_edges(viewport.width as f32, viewport.height as f32);
                deepest_contact(pos, radius, polygon_edges.chain(walls))
            }
        }
    }

    /// Push out, bounce if approaching, and recolor
    fn resolve(&mut self, contact: &Contact) {
        self.ball.pos += contact.normal * (contact.penetration + self.config.push_out_epsilon);

        if let Some(vel) = bounce_velocity(self.ball.vel, contact.normal, self.ball.restitution) {
            self.ball.vel = vel;
        }

        self.ball.color = Rgb::random(&mut self.rng, self.config.color_min);

        log::debug!(
            "Contact {:?} at tick {}: depth={:.3}, vel={:?}",
            contact.source,
            self.time_ticks,
            contact.penetration,
            self.ball.vel
        );
    }
}

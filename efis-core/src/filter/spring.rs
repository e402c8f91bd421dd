//! Spring-damper filter for rate gauges
//!
//! Gives a needle the inertia of a mechanical gyro: it accelerates toward
//! the input, then settles without oscillating when damping is critical.

use crate::config::{ConfigError, SpringConfig};

use super::{elapsed_ms, sanitize};

/// Longest integration step; larger gaps are subdivided
pub const MAX_STEP_S: f32 = 0.02;

/// Gaps longer than this are integrated as if only this much time passed
pub const MAX_ELAPSED_S: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpringDamper {
    stiffness: f32,
    damping: f32,
    position: f32,
    velocity: f32,
    last_ms: Option<u32>,
}

impl SpringDamper {
    pub fn new(config: SpringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stiffness: config.stiffness,
            damping: config.damping,
            position: 0.0,
            velocity: 0.0,
            last_ms: None,
        })
    }

    /// Advance by `dt_s` seconds toward `target`
    ///
    /// `a = -k·(p − x) − c·u; u += a·Δt; p += u·Δt`
    pub fn step(&mut self, target: f32, dt_s: f32) -> f32 {
        if !(dt_s.is_finite() && dt_s > 0.0) {
            return self.position;
        }
        let target = sanitize(target);
        let mut remaining = dt_s.min(MAX_ELAPSED_S);
        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP_S);
            let accel = -self.stiffness * (self.position - target) - self.damping * self.velocity;
            self.velocity += accel * dt;
            self.position += self.velocity * dt;
            remaining -= dt;
        }
        self.position
    }

    /// Feed `target` sampled at `now_ms`; the first call only starts the clock
    pub fn update(&mut self, target: f32, now_ms: u32) -> f32 {
        let dt_s = match self.last_ms {
            Some(last) => elapsed_ms(last, now_ms) as f32 / 1000.0,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.step(target, dt_s)
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Return the needle to rest at zero
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.velocity = 0.0;
        self.last_ms = None;
    }
}

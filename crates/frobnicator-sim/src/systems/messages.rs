//! Floating economy messages: rise, fade and expire.

use frobnicator_core::constants::{MESSAGE_LIFESPAN_SECS, MESSAGE_RISE_PER_TICK};
use frobnicator_core::enums::MessageKind;
use frobnicator_core::types::Vec2;

use crate::world::GameWorld;

/// A short-lived label showing a gold change.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingMessage {
    pub position: Vec2,
    pub text: String,
    pub kind: MessageKind,
    /// Seconds since the message was posted.
    pub age: f32,
}

impl FloatingMessage {
    pub fn new(position: Vec2, text: String, kind: MessageKind) -> Self {
        Self {
            position,
            text,
            kind,
            age: 0.0,
        }
    }

    /// Opacity, fading linearly over the lifespan.
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / MESSAGE_LIFESPAN_SECS).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= MESSAGE_LIFESPAN_SECS
    }

    fn tick(&mut self, dt: f32) {
        self.age += dt;
        self.position.y -= MESSAGE_RISE_PER_TICK;
    }
}

/// Age every message and drop the expired ones.
pub fn run(world: &mut GameWorld, dt: f32) {
    for message in &mut world.messages {
        message.tick(dt);
    }
    world.messages.retain(|m| !m.is_expired());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_rises_and_fades() {
        let mut msg = FloatingMessage::new(Vec2::new(10.0, 100.0), "5".into(), MessageKind::Cost);
        assert_eq!(msg.alpha(), 1.0);
        msg.tick(1.5);
        assert_eq!(msg.position, Vec2::new(10.0, 99.5));
        assert!((msg.alpha() - 0.5).abs() < 1e-6);
        assert!(!msg.is_expired());
        msg.tick(1.5);
        assert!(msg.is_expired());
        assert_eq!(msg.alpha(), 0.0);
    }
}

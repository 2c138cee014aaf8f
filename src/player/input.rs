use serde::{Deserialize, Serialize};

/// Movement intent for one tick, already decoded from whatever device produced it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Forward/backward axis in `-1..=1`
    pub forward: f32,
    /// Right/left axis in `-1..=1`
    pub strafe: f32,
    pub jump: bool,
    pub sneak: bool,
    pub sprint: bool,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walking_forward() -> Self {
        Self {
            forward: 1.0,
            ..Self::default()
        }
    }

    pub fn sneaking() -> Self {
        Self {
            sneak: true,
            ..Self::default()
        }
    }

    /// Movement axes clamped so diagonal input is not faster
    pub fn movement_axes(&self) -> (f32, f32) {
        let (f, s) = (self.forward.clamp(-1.0, 1.0), self.strafe.clamp(-1.0, 1.0));
        let len = (f * f + s * s).sqrt();
        if len > 1.0 {
            (f / len, s / len)
        } else {
            (f, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_is_normalised() {
        let input = PlayerInput { forward: 1.0, strafe: 1.0, ..Default::default() };
        let (f, s) = input.movement_axes();
        assert!(((f * f + s * s).sqrt() - 1.0).abs() < 1e-6);
        assert_eq!(PlayerInput::walking_forward().movement_axes(), (1.0, 0.0));
    }
}

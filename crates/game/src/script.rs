//! Canned input for headless runs.

use engine_core::Vec2;
use input::{FlightInput, WeaponInput};
use serde::{Deserialize, Serialize};

/// Fire level at which a step counts as pressing the trigger.
const PRESS_LEVEL: f32 = 0.5;

/// Inputs held for `frames` frames. Button events fire on the first frame only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptStep {
    pub frames: u32,
    pub fire: f32,
    pub next_weapon: bool,
    pub previous_weapon: bool,
    pub translate: Vec2,
    pub rotate: Vec2,
    pub roll: f32,
    pub up: f32,
    pub down: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    index: usize,
    frame_in_step: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        let steps = steps.into_iter().filter(|s| s.frames > 0).collect();
        Self {
            steps,
            ..Default::default()
        }
    }

    fn current(&self) -> ScriptStep {
        self.steps.get(self.index).copied().unwrap_or_default()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Move to the next frame.
    pub fn advance(&mut self) {
        if self.is_finished() {
            return;
        }
        self.frame_in_step += 1;
        if self.frame_in_step >= self.current().frames {
            self.index += 1;
            self.frame_in_step = 0;
        }
    }

    fn first_frame(&self) -> bool {
        self.frame_in_step == 0
    }
}

impl WeaponInput for ScriptedInput {
    fn fire_level(&self) -> f32 {
        self.current().fire
    }

    /// Pressed on the first frame of every firing step, even back to back.
    fn fire_performed(&self) -> bool {
        self.first_frame() && self.current().fire >= PRESS_LEVEL
    }

    fn next_weapon_performed(&self) -> bool {
        self.first_frame() && self.current().next_weapon
    }

    fn previous_weapon_performed(&self) -> bool {
        self.first_frame() && self.current().previous_weapon
    }
}

impl FlightInput for ScriptedInput {
    fn translate(&self) -> Vec2 {
        self.current().translate
    }

    fn rotate(&self) -> Vec2 {
        self.current().rotate
    }

    fn roll(&self) -> f32 {
        self.current().roll
    }

    fn up(&self) -> f32 {
        self.current().up
    }

    fn down(&self) -> f32 {
        self.current().down
    }
}

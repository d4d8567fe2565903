use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::camera::ViewerState;
use crate::world::{MapGeometry, TileMap};

/// What a key asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerCommand {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Quit,
}

pub fn command_for(key: KeyCode) -> Option<ViewerCommand> {
    use ViewerCommand::*;
    Some(match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Forward,
        KeyCode::KeyS | KeyCode::ArrowDown => Back,
        KeyCode::KeyA => StrafeLeft,
        KeyCode::KeyD => StrafeRight,
        KeyCode::KeyQ | KeyCode::ArrowLeft => TurnLeft,
        KeyCode::KeyE | KeyCode::ArrowRight => TurnRight,
        KeyCode::Escape => Quit,
        _ => return None,
    })
}

/// Commands currently held down.
#[derive(Debug, Default)]
pub struct HeldCommands {
    held: HashSet<ViewerCommand>,
}

impl HeldCommands {
    pub fn press(&mut self, cmd: ViewerCommand) {
        self.held.insert(cmd);
    }

    pub fn release(&mut self, cmd: ViewerCommand) {
        self.held.remove(&cmd);
    }

    #[inline]
    pub fn contains(&self, cmd: ViewerCommand) -> bool {
        self.held.contains(&cmd)
    }

    fn axis(&self, neg: ViewerCommand, pos: ViewerCommand) -> f32 {
        let mut v = 0.0;
        if self.contains(pos) {
            v += 1.0;
        }
        if self.contains(neg) {
            v -= 1.0;
        }
        v
    }

    /// Apply held commands for `dt_s` seconds: rotate first, then translate
    /// along the new facing.
    pub fn apply(
        &self,
        viewer: &mut ViewerState,
        turn_speed: f32,
        dt_s: f32,
        map: &TileMap,
        geo: &MapGeometry,
    ) {
        let turn = self.axis(ViewerCommand::TurnLeft, ViewerCommand::TurnRight);
        if turn != 0.0 {
            viewer.rotate(turn * turn_speed * dt_s);
        }

        let fwd = self.axis(ViewerCommand::Back, ViewerCommand::Forward);
        let strafe = self.axis(ViewerCommand::StrafeLeft, ViewerCommand::StrafeRight);
        if fwd != 0.0 || strafe != 0.0 {
            let delta = viewer.step_delta(fwd, strafe, dt_s);
            viewer.translate(delta, map, geo);
        }
    }
}

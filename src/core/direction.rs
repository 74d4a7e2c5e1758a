//! Purpose: Name the two legs of controller/module messaging.
//! Exports: `Direction`.
//! Role: Input to codec profile resolution.
//! Invariants: Exactly two variants; text forms are stable.
use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Messages from the controller to a module.
    ControllerToModule,
    /// Messages from a module back to the controller.
    ModuleToController,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::ControllerToModule, Direction::ModuleToController];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::ControllerToModule => "controller-to-module",
            Direction::ModuleToController => "module-to-controller",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.as_str() == input)
            .ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("unknown direction '{input}'"))
                    .with_hint("Use controller-to-module or module-to-controller.")
            })
    }
}

use std::fmt;
use std::str::FromStr;

use crate::error::PageError;
use crate::params;

/// The three animations on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimationKind {
    Derivative,
    Circle,
    SineWave,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 3] = [
        AnimationKind::Derivative,
        AnimationKind::Circle,
        AnimationKind::SineWave,
    ];

    /// Frame budget of one session.
    pub fn total_frames(self) -> u32 {
        match self {
            AnimationKind::Derivative => params::derivative::TOTAL_FRAMES,
            AnimationKind::Circle => params::circle::TOTAL_FRAMES,
            AnimationKind::SineWave => params::sine::TOTAL_FRAMES,
        }
    }

    /// Name used by play controls (`data-play`) and the JS export.
    pub fn name(self) -> &'static str {
        match self {
            AnimationKind::Derivative => "derivative",
            AnimationKind::Circle => "circle",
            AnimationKind::SineWave => "sine",
        }
    }

    /// Id of the card element that holds this animation's canvas.
    pub fn container_id(self) -> &'static str {
        match self {
            AnimationKind::Derivative => "derivative-animation",
            AnimationKind::Circle => "circle-animation",
            AnimationKind::SineWave => "sine-wave-animation",
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationKind {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "derivative" => Ok(AnimationKind::Derivative),
            "circle" => Ok(AnimationKind::Circle),
            "sine" => Ok(AnimationKind::SineWave),
            other => Err(PageError::UnknownAnimation(other.to_owned())),
        }
    }
}

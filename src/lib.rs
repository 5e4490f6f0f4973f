#![cfg_attr(docsrs, feature(doc_cfg))]
//! Autonomous controllers for tanks in top-down arena skirmishes.
//!
//! The engine-free core lives in [`agent`]: a Seek/Flee state machine that
//! re-plans towards the nearest reachable opponent, times its shots from a
//! ballistic prediction and retreats from targets that stand still. It talks
//! to the world through three seams: [`navigation::NavigationService`],
//! [`weapon::Weapon`] and [`body::Actuator`]. The [`plugin`] module runs the
//! controller inside a Bevy app.
pub mod agent;
pub mod ballistics;
pub mod body;
pub mod components;
pub mod config;
pub mod constants;
pub mod logging;
pub mod navigation;
pub mod plugin;
pub mod roster;
pub mod spawn;
pub mod vector_math;
pub mod weapon;

// Re-export commonly used items
pub use agent::{Agent, AgentState, Surroundings};
pub use body::{Actuator, Body, Pose};
pub use components::{Combatant, Inactive, Launcher, Navigation, Pilot};
pub use config::{AgentConfig, ConfigError, LauncherConfig, SkirmishConfig, Span};
pub use logging::init as init_logging;
pub use navigation::{NavigationService, OpenGround, Path};
pub use plugin::{ShotFired, ShotTally, SkirmishPlugin};
pub use roster::Roster;
pub use spawn::{spawn_ai_tank, spawn_combatant};
pub use weapon::{ShellLauncher, Shot, Weapon};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use skirmish::prelude::*;
    //! ```

    pub use crate::{
        spawn_ai_tank, spawn_combatant, Actuator, Agent, AgentState, Navigation,
        NavigationService, OpenGround, Pilot, ShotFired, SkirmishConfig, SkirmishPlugin,
        Surroundings, Weapon,
    };
}

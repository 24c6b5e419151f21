pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod scheduler;

pub use config::{AppConfig, Page, RollerConfig};
pub use engine::{Bounds, Completion, GestureEvent, GoOptions, MotionState, Roller};
pub use error::{Error, Result};
pub use events::{EventKind, ListenerId, PageChange, RollerEvent};
pub use scheduler::{FrameScheduler, ManualScheduler};

pub mod ai;
pub mod ball;
pub mod engine;
pub mod events;
pub mod field;
pub mod input;
pub mod keeper;
pub mod levels;
pub mod math;
pub mod player;
pub mod possession;
pub mod projection;
pub mod snapshot;

pub use ball::*;
pub use engine::*;
pub use events::*;
pub use field::*;
pub use input::*;
pub use keeper::*;
pub use levels::*;
pub use player::*;
pub use possession::*;
pub use projection::*;
pub use snapshot::*;

pub mod game_system;
pub mod scenario;
pub mod scenario_tag;
pub mod tag;

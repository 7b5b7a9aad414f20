pub mod game_session;
pub mod session_participant;

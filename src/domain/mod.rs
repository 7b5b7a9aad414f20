pub mod feedback;
pub mod health;
pub mod scenario;
pub mod session;
pub mod user;

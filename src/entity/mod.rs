pub mod applications;
pub mod broadcasts;
pub mod user_states;
pub mod users;

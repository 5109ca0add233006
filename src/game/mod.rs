pub mod constants;
pub mod encounter;
pub mod events;
pub mod state;
pub mod systems;

pub mod abilities;
pub mod attacks;
pub mod collision;
pub mod particles;
pub mod projectiles;
pub mod scheduler;

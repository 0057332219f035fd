pub mod ask;
pub mod fallback;
pub mod health;

pub mod handlers;
pub mod models;
pub mod render;
pub mod router;
pub mod services;

pub use models::*;
pub use render::{render_doctor_card, render_doctor_cards};
pub use services::*;

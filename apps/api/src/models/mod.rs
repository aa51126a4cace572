pub mod curriculum;
pub mod roadmap;
pub mod user;

#[path = "01_collectstatic.rs"]
pub mod collectstatic;

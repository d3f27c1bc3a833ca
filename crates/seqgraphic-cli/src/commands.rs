pub mod check;
pub mod wheel;

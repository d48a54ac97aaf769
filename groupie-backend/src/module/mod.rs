pub mod artist;
pub mod renderer;

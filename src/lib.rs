pub mod anim;
pub mod challenge;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod engine;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod timer;
pub mod ui;

pub mod config;
pub mod display;
pub mod interval;
pub mod pitchspace;
pub mod presets;
pub mod scale;
pub mod weighting;

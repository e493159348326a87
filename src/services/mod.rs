pub mod cache;
pub mod calibration;
pub mod fallback;
pub mod forecast;
pub mod inflight;
pub mod maintenance;
pub mod quantize;
pub mod quota;
pub mod scoring;
pub mod spots;
pub mod windy;

//! Foreground cache operations

mod get;
mod misc;
mod put;
mod remove;

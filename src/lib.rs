pub mod catalog;
pub mod cli;
pub mod coach;
pub mod config;
pub mod detector;
pub mod error;
pub mod goals;
pub mod server;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod types;

pub mod metadata {
    include!(concat!(env!("OUT_DIR"), "/pkg_info.rs"));
}

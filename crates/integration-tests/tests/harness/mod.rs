#![allow(dead_code)]

pub mod config;
pub mod mock_webhook;
pub mod server;

//! Backend for the Tavola restaurant site: menu and offer catalog, pickup
//! scheduling, per-session carts and payment proxying, served over plain
//! HTTP.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod http;
pub mod routes;
pub mod schedule;
pub mod state;
pub mod threadpool;
pub mod upstream;

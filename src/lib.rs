pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod notify;
pub mod service;
pub mod web;

pub use db::Database;

// src/lib.rs

pub mod app_state;
pub mod config;
pub mod photo;
pub mod rest;
pub mod rpc;
pub mod service;
pub mod storage;

//! HTTP API for the component library: models, routes, services and storage.

pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod storage;

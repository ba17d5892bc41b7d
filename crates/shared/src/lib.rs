//! Pure map logic shared by the web frontend: data model, coordinate space,
//! viewport fitting, layout, selection and the map surface lifecycle.

pub mod config;
pub mod crs;
pub mod engine;
pub mod error;
pub mod layout;
pub mod models;
pub mod selection;
pub mod surface;
pub mod viewport;

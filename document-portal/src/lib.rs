pub mod config;
pub mod error;
pub mod flow;
pub mod handlers;
pub mod models;
pub mod portal;
pub mod services;
pub mod startup;
pub mod views;

#[cfg(test)]
mod test_support;

use portal::Portal;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub portal: Arc<Portal>,
}

impl AppState {
    pub fn new(portal: Arc<Portal>) -> Self {
        Self { portal }
    }
}

//! Maison App - Interior-design dashboard and AR model viewer
//!
//! This crate provides the browser-based dashboard using Bevy and WebGPU.

mod app;
mod gallery;
mod network;
mod notify;
mod scene;
mod session;
mod ui;
mod viewer;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build()
    );

    // Run the Bevy app
    app::run();
}

//! WebAssembly bindings for netjson
//!
//! Browser-facing wrappers around the conversion pipeline. Errors are
//! returned as JavaScript exceptions or as an `error` field in JSON results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::core::RenderConfig;
#[cfg(target_arch = "wasm32")]
use crate::plugins::Orchestrator;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Convert a drawio document to GoJS layout JSON
///
/// Throws a JavaScript error if the document cannot be read.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn convert_drawio(input: &str, pretty: bool) -> Result<String, JsValue> {
    Orchestrator::with_config(RenderConfig::new(pretty))
        .process(input)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

/// Convert a drawio document and return JSON with output and warnings
///
/// # Returns
/// * JSON string with fields: output, warnings, error
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn convert_drawio_json(input: &str) -> String {
    match Orchestrator::with_config(RenderConfig::new(false)).process_with_report(input) {
        Ok(output) => serde_json::json!({
            "output": output.json,
            "warnings": output
                .report
                .warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>(),
            "error": null,
        }),
        Err(e) => serde_json::json!({
            "output": "",
            "warnings": [],
            "error": format!("{:#}", e),
        }),
    }
    .to_string()
}

/// Compile the shape named by a style descriptor
///
/// # Returns
/// * JSON string with fields: geometryString, ports, warnings
/// * Throws a JavaScript error if the shape cannot be resolved
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn compile_shape(style: &str) -> Result<String, JsValue> {
    let shape = crate::shapes::resolve_shape(style).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let compiled = crate::shapes::compile(&shape);

    Ok(serde_json::json!({
        "geometryString": compiled.path(),
        "ports": shape.port_names(),
        "warnings": compiled
            .warnings
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>(),
    })
    .to_string())
}

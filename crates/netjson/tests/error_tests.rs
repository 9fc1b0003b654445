//! Tests for core error types

use netjson::core::NetjsonError;

#[test]
fn test_shape_not_found() {
    let error = NetjsonError::shape_not_found("shape=mxgraph.misc.widget");
    assert_eq!(
        error.to_string(),
        "Shape not found for style: shape=mxgraph.misc.widget"
    );
    assert!(error.is_shape_failure());
}

#[test]
fn test_stencil_and_markup_errors() {
    let decode = NetjsonError::stencil_decode("base64: invalid byte");
    assert!(decode.to_string().contains("Stencil decode error"));
    assert!(decode.is_shape_failure());

    let markup = NetjsonError::shape_markup("duplicate connection port 'in'");
    assert!(markup.to_string().contains("Shape markup error"));
    assert!(markup.is_shape_failure());
}

#[test]
fn test_document_errors_are_not_shape_failures() {
    let error = NetjsonError::document_parse("<mxfile> has no <diagram>");
    assert!(error.to_string().contains("Document parse error"));
    assert!(!error.is_shape_failure());
}

#[test]
fn test_dangling_wire() {
    let error = NetjsonError::dangling_wire("w7", "n42");
    assert_eq!(error.to_string(), "Wire 'w7' references missing element 'n42'");
}

#[test]
fn test_render_error() {
    let error = NetjsonError::render_error("serialization failed");
    assert!(error.to_string().contains("Render error"));
    assert!(error.to_string().contains("serialization failed"));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
    let error: NetjsonError = io.into();
    assert!(error.to_string().contains("IO error"));
    assert!(error.to_string().contains("missing file"));
}

#[test]
fn test_errors_convert_to_anyhow() {
    fn fails() -> anyhow::Result<()> {
        Err(NetjsonError::style_parse("'=x': unexpected '='"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(err.downcast_ref::<NetjsonError>().is_some());
}

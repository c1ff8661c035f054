//! Conversion of arbitrary failures into [`CamsError`] values.
//!
//! Repositories catch whatever the storage layer raises and pass it through one of
//! these helpers so callers only ever see a `CamsError` tagged with a module name.

use crate::error::CamsError;

/// Return the `CamsError` carried by `err` unchanged, or wrap anything else as an
/// unknown error attributed to `module`.
pub fn get_cams_error(err: anyhow::Error, module: &str) -> CamsError {
    match err.downcast::<CamsError>() {
        Ok(cams) => cams,
        Err(other) => CamsError::unknown(module).with_original_error(format!("{other:#}")),
    }
}

/// Like [`get_cams_error`], but records `message` for `module`.
///
/// A `CamsError` keeps its message and status and gains a stack entry. Any other
/// failure becomes an unknown error whose message is `message`.
pub fn get_cams_error_with_stack(err: anyhow::Error, module: &str, message: &str) -> CamsError {
    match err.downcast::<CamsError>() {
        Ok(cams) => cams.with_stack_entry(module, message),
        Err(other) => CamsError::unknown(module)
            .with_message(message)
            .with_original_error(format!("{other:#}")),
    }
}

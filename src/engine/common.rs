// src/engine/common.rs
//
// Common utilities shared across engine modules.
// Backends are third-party renderers; a panic inside one must surface as an
// error on this decode instead of unwinding through the host.

use crate::error::SvgDecodeError;
use std::panic::{catch_unwind, AssertUnwindSafe};

pub type EngineResult<T> = std::result::Result<T, SvgDecodeError>;

/// Run `f`, converting a panic into `SvgDecodeError::InternalPanic` tagged with `label`.
pub fn run_with_panic_policy<T, F>(label: &'static str, f: F) -> EngineResult<T>
where
    F: FnOnce() -> EngineResult<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            tracing::warn!(label, detail = %detail, "panic caught in decode pipeline");
            Err(SvgDecodeError::internal_panic(format!(
                "{label}: panic: {detail}"
            )))
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_ok_and_err() {
        assert_eq!(run_with_panic_policy("ok", || Ok(7)).unwrap(), 7);
        let err = run_with_panic_policy::<(), _>("err", || {
            Err(SvgDecodeError::parse_failed("bad"))
        })
        .unwrap_err();
        assert!(matches!(err, SvgDecodeError::ParseFailed { .. }));
    }

    #[test]
    fn converts_panic_to_internal_error() {
        let err = run_with_panic_policy::<(), _>("render:resvg", || panic!("boom")).unwrap_err();
        match err {
            SvgDecodeError::InternalPanic { message } => {
                assert!(message.contains("render:resvg"));
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

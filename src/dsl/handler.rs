use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::description::MethodDescription;
use crate::error::ParamError;
use crate::validator::{Params, ValidationMode};

/// A handler composed with the params declared for it
///
/// [`call`](ValidatedHandler::call) checks the incoming params against the
/// committed [`MethodDescription`] and only then runs the original handler,
/// returning its result unchanged. Handlers that were not documented, or
/// defined with validation off, delegate directly.
pub struct ValidatedHandler<F> {
    handler: F,
    description: Option<Arc<MethodDescription>>,
    validate: bool,
    mode: ValidationMode,
}

impl<F> ValidatedHandler<F> {
    pub(crate) fn new(
        handler: F,
        description: Arc<MethodDescription>,
        validate: bool,
        mode: ValidationMode,
    ) -> Self {
        Self {
            handler,
            description: Some(description),
            validate,
            mode,
        }
    }

    pub(crate) fn passthrough(handler: F) -> Self {
        Self {
            handler,
            description: None,
            validate: false,
            mode: ValidationMode::Lenient,
        }
    }

    /// Description committed for this handler (its first version)
    #[must_use]
    pub fn description(&self) -> Option<&Arc<MethodDescription>> {
        self.description.as_ref()
    }

    #[must_use]
    pub fn is_validating(&self) -> bool {
        self.validate && self.description.is_some()
    }

    /// The original handler
    pub fn into_inner(self) -> F {
        self.handler
    }

    /// Validate `params`, then delegate to the original handler
    ///
    /// # Errors
    ///
    /// The first [`ParamError`] found; the handler does not run.
    pub fn call<R>(&self, params: &Params) -> Result<R, ParamError>
    where
        F: Fn(&Params) -> R,
    {
        if let (true, Some(description)) = (self.validate, &self.description) {
            trace!(method = %description.qualified_name(), params = params.len(), "validating params");
            description.validate_params(params, self.mode)?;
        }
        Ok((self.handler)(params))
    }
}

impl<F> fmt::Debug for ValidatedHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedHandler")
            .field(
                "method",
                &self.description.as_ref().map(|d| d.qualified_name()),
            )
            .field("validate", &self.validate)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::StagingBuffer;
    use crate::error::ParamError;
    use crate::validator::{ParamOptions, ParamType};
    use http::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn show_description() -> Arc<MethodDescription> {
        let mut buffer = StagingBuffer::new();
        buffer.declare_endpoint(Method::GET, "/users/:id", "");
        buffer.declare_param("id", ParamType::Integer, ParamOptions::required());
        Arc::new(MethodDescription::from_staged(
            "show",
            "users",
            "v1",
            buffer.snapshot_and_clear(),
        ))
    }

    #[test]
    fn test_handler_runs_only_after_validation() {
        let calls = AtomicUsize::new(0);
        let handler = ValidatedHandler::new(
            |_: &Params| calls.fetch_add(1, Ordering::SeqCst),
            show_description(),
            true,
            ValidationMode::Lenient,
        );

        let err = handler.call(&Params::new()).unwrap_err();
        assert!(matches!(err, ParamError::Missing { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let params = json!({"id": 5});
        assert_eq!(handler.call(params.as_object().unwrap()).unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_passthrough_never_validates() {
        let handler = ValidatedHandler::passthrough(|p: &Params| p.len());
        assert!(!handler.is_validating());
        assert_eq!(handler.call(&Params::new()).unwrap(), 0);
        assert_eq!(handler.into_inner()(&Params::new()), 0);
    }
}

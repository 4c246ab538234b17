use http::Method;
use tracing::{debug, warn};

use super::handler::ValidatedHandler;
use crate::error::RegistryError;
use crate::registry::{Application, ControllerId};
use crate::validator::{ParamOptions, ParamValidator, Params};

/// Declaration context for one controller
///
/// Method declarations are staged by chained calls and bound to the next
/// [`Dsl::define`]:
///
/// ```rust
/// use brrtdoc::registry::{Application, ControllerId};
/// use brrtdoc::validator::{ParamOptions, ParamType};
/// use http::Method;
///
/// let mut app = Application::default();
/// let users = app.declare_controller("UsersController", ControllerId::BASE);
/// let mut dsl = app.dsl(users);
/// dsl.api(Method::GET, "/users/:id", "")
///     .desc("show a user")?
///     .param("id", ParamType::Integer, ParamOptions::required());
/// let show = dsl.define("show", |params| params.len())?;
/// drop(dsl);
///
/// assert!(show.call(&serde_json::Map::new()).is_err());
/// assert!(app.get_method_description("users#show")?.is_some());
/// # Ok::<(), brrtdoc::error::RegistryError>(())
/// ```
///
/// The context borrows the registry mutably, so declarations for one
/// handler cannot interleave with another's. Anything still staged when
/// the context is dropped is discarded with a warning.
#[derive(Debug)]
pub struct Dsl<'a> {
    app: &'a mut Application,
    controller: ControllerId,
}

/// Resource-level documentation collected by [`Dsl::resource`]
#[derive(Debug, Default, Clone)]
pub struct ResourceDecl {
    short_description: Option<String>,
    full_description: Option<String>,
    formats: Option<Vec<String>>,
    api_versions: Vec<String>,
    resource_id: Option<String>,
}

impl ResourceDecl {
    pub fn short(&mut self, text: impl Into<String>) -> &mut Self {
        self.short_description = Some(text.into());
        self
    }

    pub fn full_description(&mut self, text: impl Into<String>) -> &mut Self {
        self.full_description = Some(text.into());
        self
    }

    pub fn formats<I, S>(&mut self, formats: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Versions the whole controller documents into
    pub fn api_versions<I, S>(&mut self, versions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.api_versions.extend(versions.into_iter().map(Into::into));
        self
    }

    /// Override the resource name derived from the controller
    pub fn resource_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.resource_id = Some(id.into());
        self
    }
}

impl<'a> Dsl<'a> {
    pub(crate) fn new(app: &'a mut Application, controller: ControllerId) -> Self {
        Self { app, controller }
    }

    #[must_use]
    pub fn controller(&self) -> ControllerId {
        self.controller
    }

    /// Declare resource documentation for this controller
    ///
    /// The resource id and versions are recorded first; the descriptions
    /// are then stored on the resource of every resolved version. An empty
    /// version list keeps whatever the controller already resolves to.
    /// Ignored controllers record nothing.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Configuration`] if the controller has no resource name.
    pub fn resource<F>(&mut self, block: F) -> Result<&mut Self, RegistryError>
    where
        F: FnOnce(&mut ResourceDecl),
    {
        let mut decl = ResourceDecl::default();
        block(&mut decl);

        let controller = self.app.controllers().type_name(self.controller);
        if self.app.config().is_ignored(controller, None) {
            debug!(controller = %controller, "ignored controller, resource not documented");
            return Ok(self);
        }

        if let Some(id) = decl.resource_id {
            self.app.set_resource_id(self.controller, id);
        }
        if !decl.api_versions.is_empty() {
            self.app
                .set_controller_versions(self.controller, decl.api_versions);
        }

        for version in self.app.controller_versions(self.controller) {
            let resource = self.app.define_resource(self.controller, &version)?;
            resource.short_description = decl.short_description.clone();
            resource.full_description = decl.full_description.clone();
            resource.formats = decl.formats.clone();
        }
        Ok(self)
    }

    pub fn api(&mut self, http_method: Method, path: impl Into<String>, description: impl Into<String>) -> &mut Self {
        self.app
            .staging
            .declare_endpoint(http_method, path, description);
        self
    }

    /// Describe the next method
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateDeclaration`] if a description is already
    /// staged for it.
    pub fn desc(&mut self, text: impl Into<String>) -> Result<&mut Self, RegistryError> {
        self.app.staging.declare_description(text)?;
        Ok(self)
    }

    pub fn error(&mut self, code: u16, description: impl Into<String>) -> &mut Self {
        self.app.staging.declare_error(code, description);
        self
    }

    pub fn param(
        &mut self,
        name: impl Into<String>,
        validator: impl Into<ParamValidator>,
        options: ParamOptions,
    ) -> &mut Self {
        self.app.staging.declare_param(name, validator, options);
        self
    }

    pub fn example(&mut self, text: &str) -> &mut Self {
        self.app.staging.declare_example(text);
        self
    }

    pub fn see(&mut self, reference: impl Into<String>) -> &mut Self {
        self.app.staging.declare_see(reference);
        self
    }

    pub fn formats<I, S>(&mut self, formats: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app.staging.declare_formats(formats);
        self
    }

    pub fn api_versions<I, S>(&mut self, versions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app.staging.declare_api_versions(versions);
        self
    }

    /// Bind everything staged to the handler method `name`
    ///
    /// The staging buffer is always emptied, whatever the outcome. The
    /// handler comes back unvalidated when the method is ignored by
    /// configuration, when declarations are inactive, or when no `api`
    /// endpoint was staged. Otherwise the method is committed into every
    /// version it belongs to and the returned handler validates its params
    /// before delegating.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Configuration`] if the controller has no resource name.
    pub fn define<F, R>(&mut self, name: &str, handler: F) -> Result<ValidatedHandler<F>, RegistryError>
    where
        F: Fn(&Params) -> R,
    {
        let had_declarations = !self.app.staging.is_empty();
        let has_endpoints = self.app.staging.has_endpoints();
        let staged = self.app.staging.snapshot_and_clear();

        let config = self.app.config();
        let controller = self.app.controllers().type_name(self.controller);
        if config.is_ignored(controller, Some(name)) {
            debug!(
                controller = %controller,
                method = %name,
                discarded = had_declarations,
                "ignored method, not documented"
            );
            return Ok(ValidatedHandler::passthrough(handler));
        }
        if !config.active_dsl() {
            return Ok(ValidatedHandler::passthrough(handler));
        }
        if !has_endpoints {
            if had_declarations {
                warn!(
                    controller = %controller,
                    method = %name,
                    "declarations without an api endpoint discarded"
                );
            }
            return Ok(ValidatedHandler::passthrough(handler));
        }

        let validate = config.validate;
        let mode = config.validation_mode();
        let description = self
            .app
            .define_method_description(self.controller, name, staged)?;
        Ok(ValidatedHandler::new(handler, description, validate, mode))
    }
}

impl Drop for Dsl<'_> {
    fn drop(&mut self) {
        if !self.app.staging.is_empty() {
            let staged = self.app.staging.snapshot_and_clear();
            warn!(
                controller = %self.app.controllers().type_name(self.controller),
                endpoints = staged.endpoints.len(),
                "staged declarations discarded without a method definition"
            );
        }
    }
}

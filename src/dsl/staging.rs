use http::Method;

use crate::description::{Endpoint, ErrorDescription};
use crate::error::RegistryError;
use crate::validator::{ParamOptions, ParamSet, ParamValidator};

/// Immutable snapshot of everything declared for one method
#[derive(Debug, Clone, Default)]
pub struct StagedMethod {
    pub endpoints: Vec<Endpoint>,
    pub description: Option<String>,
    pub params: ParamSet,
    pub errors: Vec<ErrorDescription>,
    pub examples: Vec<String>,
    pub see: Option<String>,
    pub formats: Option<Vec<String>>,
    pub api_versions: Vec<String>,
}

/// Scratch state for the declarations preceding one method definition
///
/// Declarations only append or replace fields; nothing is validated until
/// the buffer is committed. The buffer is consumed exclusively through
/// [`StagingBuffer::snapshot_and_clear`], so nothing staged for one method
/// can leak into the next.
///
/// Not safe for interleaved declaration streams: the declarations and the
/// method they describe must be issued back to back from one thread. The
/// [`Dsl`](super::Dsl) context enforces this by holding the registry
/// mutably for the whole declaration phase.
#[derive(Debug, Default)]
pub struct StagingBuffer {
    staged: StagedMethod,
}

impl StagingBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_endpoint(&mut self, http_method: Method, path: impl Into<String>, description: impl Into<String>) {
        self.staged
            .endpoints
            .push(Endpoint::new(http_method, path, description));
    }

    /// Stage the method description
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateDeclaration`] if a description is already
    /// staged since the last commit.
    pub fn declare_description(&mut self, text: impl Into<String>) -> Result<(), RegistryError> {
        if let Some(existing) = &self.staged.description {
            return Err(RegistryError::DuplicateDeclaration {
                existing: existing.clone(),
            });
        }
        self.staged.description = Some(text.into());
        Ok(())
    }

    pub fn declare_error(&mut self, code: u16, description: impl Into<String>) {
        self.staged.errors.push(ErrorDescription {
            code,
            description: description.into(),
        });
    }

    /// Insert or overwrite a param by name
    pub fn declare_param(&mut self, name: impl Into<String>, validator: impl Into<ParamValidator>, options: ParamOptions) {
        self.staged.params.param(name, validator, options);
    }

    /// Stage an example; the common indentation of the block is removed
    pub fn declare_example(&mut self, text: &str) {
        self.staged.examples.push(strip_indent(text));
    }

    pub fn declare_see(&mut self, reference: impl Into<String>) {
        self.staged.see = Some(reference.into());
    }

    pub fn declare_formats<I, S>(&mut self, formats: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staged.formats = Some(formats.into_iter().map(Into::into).collect());
    }

    /// Versions this method belongs to, overriding the controller's
    pub fn declare_api_versions<I, S>(&mut self, versions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staged
            .api_versions
            .extend(versions.into_iter().map(Into::into));
    }

    /// Whether any endpoint is staged, i.e. the next method is documented
    #[must_use]
    pub fn has_endpoints(&self) -> bool {
        !self.staged.endpoints.is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        let s = &self.staged;
        s.endpoints.is_empty()
            && s.description.is_none()
            && s.params.is_empty()
            && s.errors.is_empty()
            && s.examples.is_empty()
            && s.see.is_none()
            && s.formats.is_none()
            && s.api_versions.is_empty()
    }

    #[must_use]
    pub fn api_versions(&self) -> &[String] {
        &self.staged.api_versions
    }

    /// Take everything staged so far and reset the buffer
    pub fn snapshot_and_clear(&mut self) -> StagedMethod {
        std::mem::take(&mut self.staged)
    }
}

/// Remove the indentation shared by all non-blank lines, and surrounding blank lines
#[must_use]
pub fn strip_indent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect();
    let start = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    lines[start..end].join("\n")
}

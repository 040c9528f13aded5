use thiserror::Error;

/// Errors raised while turning event signatures into mock contract sources.
#[derive(Debug, Error)]
pub enum GenError {
    /// The signature could not be split into a name and a parameter list
    #[error("malformed event signature `{signature}`: {reason}")]
    MalformedSignature { signature: String, reason: String },

    /// Two synthesized structs ended up with the same name
    #[error("synthesized struct name `{0}` is not unique")]
    StructNamingConflict(String),

    /// A tuple parameter reached the generator without a struct declaration
    #[error("no struct declared for tuple parameter `{parameter}` of event `{event}`")]
    UnresolvedStruct { event: String, parameter: String },

    #[error("failed to render template `{template}`: {message}")]
    TemplateRender { template: String, message: String },

    /// The rendered source does not declare what the model describes
    #[error("generated source for `{contract}` does not reproduce its events: {reason}")]
    RoundTrip { contract: String, reason: String },
}

impl GenError {
    pub fn malformed<S: Into<String>, R: Into<String>>(signature: S, reason: R) -> Self {
        GenError::MalformedSignature {
            signature: signature.into(),
            reason: reason.into(),
        }
    }

    pub fn template<S: Into<String>, E: std::fmt::Display>(template: S, err: E) -> Self {
        GenError::TemplateRender {
            template: template.into(),
            message: err.to_string(),
        }
    }

    pub fn round_trip<S: Into<String>, R: Into<String>>(contract: S, reason: R) -> Self {
        GenError::RoundTrip {
            contract: contract.into(),
            reason: reason.into(),
        }
    }
}

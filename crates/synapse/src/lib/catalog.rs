//! # Model catalog
//!
//! The static set of hosted models a user may pick from, with one entry
//! designated as the default.

use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    #[serde(rename = "name")]
    pub identifier: &'static str,
    #[serde(rename = "label")]
    pub display_label: &'static str,
}

pub const GEMINI_FLASH: ModelDescriptor = ModelDescriptor {
    identifier: "gemini-1.5-flash-latest",
    display_label: "Gemini 1.5 Flash",
};

pub const GEMINI_PRO: ModelDescriptor = ModelDescriptor {
    identifier: "gemini-1.5-pro-latest",
    display_label: "Gemini 1.5 Pro",
};

const BUILTIN_MODELS: &[ModelDescriptor] = &[GEMINI_FLASH, GEMINI_PRO];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCatalog {
    models: &'static [ModelDescriptor],
    #[serde(serialize_with = "serialize_default")]
    default_model: &'static ModelDescriptor,
}

fn serialize_default<S: serde::Serializer>(
    model: &&'static ModelDescriptor,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(model.identifier)
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: BUILTIN_MODELS,
            default_model: &BUILTIN_MODELS[0],
        }
    }
}

impl ModelCatalog {
    /// Makes `identifier` the default model. Fails if it is not in the catalog.
    pub fn with_default(mut self, identifier: &str) -> Result<Self, Error> {
        self.default_model = self
            .get(identifier)
            .ok_or_else(|| Error::UnknownModel(identifier.to_string()))?;
        Ok(self)
    }

    pub fn models(&self) -> &'static [ModelDescriptor] {
        self.models
    }

    pub fn default_model(&self) -> &'static ModelDescriptor {
        self.default_model
    }

    pub fn get(&self, identifier: &str) -> Option<&'static ModelDescriptor> {
        self.models.iter().find(|m| m.identifier == identifier)
    }

    /// Resolves a requested model id, falling back to the default for
    /// missing or unknown ids.
    pub fn resolve(&self, identifier: Option<&str>) -> &'static ModelDescriptor {
        match identifier {
            Some(id) => self.get(id).unwrap_or_else(|| {
                tracing::warn!(requested = id, fallback = self.default_model.identifier, "Unknown model requested");
                self.default_model
            }),
            None => self.default_model,
        }
    }

    /// Display label for an id, or the id itself when it is not catalogued.
    pub fn label_for<'a>(&self, identifier: &'a str) -> &'a str {
        self.get(identifier)
            .map(|m| m.display_label)
            .unwrap_or(identifier)
    }
}

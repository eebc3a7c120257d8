//! Name-based access to every builder in this crate.

use shape_cache::{BuildError, BuildResult, Registry, Schema};
use tracing::debug;

use crate::bundle::{bundle, bundle_entry};
use crate::datatypes::{
    codeable_concept, coding, extension, human_name, identifier, period, quantity, reference,
};
use crate::resources::{observation, patient, questionnaire, questionnaire_item, resource};

type Builder = fn(&Registry) -> BuildResult<Schema>;

/// Every named shape, sorted by name.
const CATALOG: &[(&str, Builder)] = &[
    ("Bundle", any_bundle),
    ("BundleEntry", any_bundle_entry),
    ("CodeableConcept", codeable_concept),
    ("Coding", coding),
    ("Extension", extension),
    ("HumanName", human_name),
    ("Identifier", identifier),
    ("Observation", observation),
    ("Patient", patient),
    ("Period", period),
    ("Quantity", quantity),
    ("Questionnaire", questionnaire),
    ("QuestionnaireItem", questionnaire_item),
    ("Reference", reference),
    ("Resource", resource),
];

fn any_bundle(reg: &Registry) -> BuildResult<Schema> {
    bundle(reg, None)
}

fn any_bundle_entry(reg: &Registry) -> BuildResult<Schema> {
    bundle_entry(reg, None)
}

/// Concrete resources that get a typed `Bundle<R>` during warm-up.
const TYPED_BUNDLES: &[&str] = &["Patient", "Observation", "Questionnaire"];

/// Containers that take a resource parameter: `Bundle<Patient>`.
const GENERIC: &[&str] = &["Bundle", "BundleEntry"];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown shape `{name}`")]
    UnknownShape { name: String },

    #[error("`{name}` takes no type argument")]
    NotGeneric { name: String },

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Names accepted by [`build_by_name`] without a type argument.
pub fn shape_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _)| *name)
}

/// Build the shape called `name`.
///
/// Accepts plain names (`Patient`) and parameterized containers
/// (`Bundle<Patient>`, `BundleEntry<Bundle<Observation>>`).
pub fn build_by_name(reg: &Registry, name: &str) -> Result<Schema, CatalogError> {
    let name = name.trim();
    if let Some((outer, argument)) = split_generic(name) {
        if !GENERIC.contains(&outer) {
            return Err(CatalogError::NotGeneric {
                name: outer.to_owned(),
            });
        }
        let payload = build_by_name(reg, argument)?;
        let schema = match outer {
            "Bundle" => bundle(reg, Some(&payload))?,
            _ => bundle_entry(reg, Some(&payload))?,
        };
        return Ok(schema);
    }

    let (_, builder) = CATALOG
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .ok_or_else(|| CatalogError::UnknownShape {
            name: name.to_owned(),
        })?;
    Ok(builder(reg)?)
}

/// `Outer<Argument>` split into its parts.
fn split_generic(name: &str) -> Option<(&str, &str)> {
    let (outer, rest) = name.split_once('<')?;
    let argument = rest.strip_suffix('>')?;
    Some((outer.trim(), argument))
}

/// Construct every catalog shape once, plus `Bundle<R>` for each concrete
/// resource.
#[tracing::instrument(level = "debug", skip_all)]
pub fn warm_all(reg: &Registry) -> BuildResult<()> {
    for (name, builder) in CATALOG {
        builder(reg)?;
        debug!(shape = *name, "warmed");
    }
    for name in TYPED_BUNDLES {
        if let Some((_, builder)) = CATALOG.iter().find(|(candidate, _)| candidate == name) {
            let payload = builder(reg)?;
            bundle(reg, Some(&payload))?;
            debug!(shape = *name, "warmed typed bundle");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;

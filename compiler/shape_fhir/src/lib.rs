//! Validators for a slice of the FHIR clinical resource model.
//!
//! Each builder takes the registry and returns its validator through
//! [`Registry::get_or_build`](shape_cache::Registry::get_or_build), so the
//! recursive parts of the model (`Extension`, `QuestionnaireItem`, the
//! `Reference`/`Identifier` pair, bundles of resources that are bundles)
//! construct once and terminate.
//!
//! Warm the registry before serving traffic:
//!
//! ```text
//! let reg = Registry::global();
//! reg.warm(shape_fhir::warm_all)?;
//! let patient = shape_fhir::patient(reg)?;
//! patient.safe_parse(&document)?;
//! ```

mod bundle;
mod catalog;
mod datatypes;
mod resources;

pub use bundle::{bundle, bundle_entry};
pub use catalog::{build_by_name, shape_names, warm_all, CatalogError};
pub use datatypes::{
    codeable_concept, coding, extension, human_name, identifier, period, quantity, reference,
};
pub use resources::{observation, patient, questionnaire, questionnaire_item, resource};

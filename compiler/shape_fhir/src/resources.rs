//! Resource validators.
//!
//! Every resource carries a `resourceType` literal, so [`resource`] can
//! dispatch on it. `Resource` includes `Bundle`, whose entries are again
//! resources: the any-resource bundle and `Resource` form one cluster.

use shape_cache::{BuildResult, Field, Registry, Schema};

use crate::bundle::bundle;
use crate::datatypes::{
    codeable_concept, coding, extensions, human_name, identifier, period, quantity, reference,
};

fn resource_type(name: &str) -> Field {
    Field::required("resourceType", Schema::literal(name))
}

pub fn patient(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Patient", &[], || {
        Ok(Schema::object([
            resource_type("Patient"),
            Field::optional("id", Schema::string()),
            Field::optional("identifier", Schema::array(identifier(reg)?)),
            Field::optional("active", Schema::boolean()),
            Field::optional("name", Schema::array(human_name(reg)?)),
            Field::optional(
                "gender",
                Schema::enumeration(["male", "female", "other", "unknown"]),
            ),
            Field::optional("birthDate", Schema::string()),
            Field::optional("deceasedBoolean", Schema::boolean()),
            Field::optional("deceasedDateTime", Schema::string()),
            Field::optional("managingOrganization", reference(reg)?),
            extensions(reg)?,
        ]))
    })
}

pub fn observation(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Observation", &[], || {
        Ok(Schema::object([
            resource_type("Observation"),
            Field::optional("id", Schema::string()),
            Field::optional("identifier", Schema::array(identifier(reg)?)),
            Field::required(
                "status",
                Schema::enumeration([
                    "registered",
                    "preliminary",
                    "final",
                    "amended",
                    "corrected",
                    "cancelled",
                    "entered-in-error",
                    "unknown",
                ]),
            ),
            Field::optional("category", Schema::array(codeable_concept(reg)?)),
            Field::required("code", codeable_concept(reg)?),
            Field::optional("subject", reference(reg)?),
            Field::optional("effectiveDateTime", Schema::string()),
            Field::optional("effectivePeriod", period(reg)?),
            Field::optional("valueQuantity", quantity(reg)?),
            Field::optional("valueCodeableConcept", codeable_concept(reg)?),
            Field::optional("valueString", Schema::string()),
            Field::optional("valueBoolean", Schema::boolean()),
            Field::optional("hasMember", Schema::array(reference(reg)?)),
            extensions(reg)?,
        ]))
    })
}

/// One question or group; groups nest further items.
pub fn questionnaire_item(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("QuestionnaireItem", &[], || {
        let answer_option = Schema::object([
            Field::optional("valueInteger", Schema::integer()),
            Field::optional("valueString", Schema::string()),
            Field::optional("valueCoding", coding(reg)?),
            Field::optional("initialSelected", Schema::boolean()),
        ]);
        Ok(Schema::object([
            Field::required("linkId", Schema::string()),
            Field::optional("definition", Schema::string()),
            Field::optional("prefix", Schema::string()),
            Field::optional("text", Schema::string()),
            Field::required(
                "type",
                Schema::enumeration([
                    "group",
                    "display",
                    "boolean",
                    "decimal",
                    "integer",
                    "date",
                    "dateTime",
                    "time",
                    "string",
                    "text",
                    "url",
                    "choice",
                    "open-choice",
                    "attachment",
                    "reference",
                    "quantity",
                ]),
            ),
            Field::optional("required", Schema::boolean()),
            Field::optional("repeats", Schema::boolean()),
            Field::optional("readOnly", Schema::boolean()),
            Field::optional("maxLength", Schema::integer()),
            Field::optional("answerOption", Schema::array(answer_option)),
            Field::optional("item", Schema::array(questionnaire_item(reg)?)),
            extensions(reg)?,
        ]))
    })
}

pub fn questionnaire(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Questionnaire", &[], || {
        Ok(Schema::object([
            resource_type("Questionnaire"),
            Field::optional("id", Schema::string()),
            Field::optional("url", Schema::string()),
            Field::optional("identifier", Schema::array(identifier(reg)?)),
            Field::optional("title", Schema::string()),
            Field::required(
                "status",
                Schema::enumeration(["draft", "active", "retired", "unknown"]),
            ),
            Field::optional("subjectType", Schema::array(Schema::string())),
            Field::optional("item", Schema::array(questionnaire_item(reg)?)),
            extensions(reg)?,
        ]))
    })
}

/// Any concrete resource, selected by `resourceType`.
pub fn resource(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Resource", &[], || {
        Ok(Schema::tagged(
            "resourceType",
            [
                ("Patient", patient(reg)?),
                ("Observation", observation(reg)?),
                ("Questionnaire", questionnaire(reg)?),
                ("Bundle", bundle(reg, None)?),
            ],
        ))
    })
}

#[cfg(test)]
mod tests;

//! General-purpose data types shared by resources.
//!
//! `Extension` nests inside itself, and `Reference` and `Identifier` refer to
//! each other (a reference may carry an identifier, whose assigner is a
//! reference). Both cycles close through the registry's lazy cells.

use shape_cache::{BuildResult, Field, Registry, Schema};

/// Names of the `value[x]` slots an extension may carry.
const EXTENSION_VALUES: &[&str] = &[
    "valueString",
    "valueCode",
    "valueUri",
    "valueDateTime",
];

pub fn extension(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Extension", &[], || {
        let mut fields = vec![
            Field::required("url", Schema::string()),
            Field::optional("valueBoolean", Schema::boolean()),
            Field::optional("valueInteger", Schema::integer()),
            Field::optional("valueDecimal", Schema::number()),
            Field::optional("valueCoding", coding(reg)?),
            Field::optional("valueCodeableConcept", codeable_concept(reg)?),
            Field::optional("valueReference", reference(reg)?),
            Field::optional("extension", Schema::array(extension(reg)?)),
        ];
        fields.extend(
            EXTENSION_VALUES
                .iter()
                .map(|&name| Field::optional(name, Schema::string())),
        );
        Ok(Schema::object(fields))
    })
}

/// `extension` array field, present on most elements.
pub(crate) fn extensions(reg: &Registry) -> BuildResult<Field> {
    Ok(Field::optional("extension", Schema::array(extension(reg)?)))
}

pub fn coding(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Coding", &[], || {
        Ok(Schema::object([
            Field::optional("system", Schema::string()),
            Field::optional("version", Schema::string()),
            Field::optional("code", Schema::string()),
            Field::optional("display", Schema::string()),
            Field::optional("userSelected", Schema::boolean()),
        ]))
    })
}

pub fn codeable_concept(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("CodeableConcept", &[], || {
        Ok(Schema::object([
            Field::optional("coding", Schema::array(coding(reg)?)),
            Field::optional("text", Schema::string()),
        ]))
    })
}

pub fn period(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Period", &[], || {
        Ok(Schema::object([
            Field::optional("start", Schema::string()),
            Field::optional("end", Schema::string()),
        ]))
    })
}

pub fn quantity(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Quantity", &[], || {
        Ok(Schema::object([
            Field::optional("value", Schema::number()),
            Field::optional(
                "comparator",
                Schema::enumeration(["<", "<=", ">=", ">"]),
            ),
            Field::optional("unit", Schema::string()),
            Field::optional("system", Schema::string()),
            Field::optional("code", Schema::string()),
        ]))
    })
}

pub fn human_name(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("HumanName", &[], || {
        Ok(Schema::object([
            Field::optional(
                "use",
                Schema::enumeration([
                    "usual",
                    "official",
                    "temp",
                    "nickname",
                    "anonymous",
                    "old",
                    "maiden",
                ]),
            ),
            Field::optional("text", Schema::string()),
            Field::optional("family", Schema::string()),
            Field::optional("given", Schema::array(Schema::string())),
            Field::optional("prefix", Schema::array(Schema::string())),
            Field::optional("suffix", Schema::array(Schema::string())),
            Field::optional("period", period(reg)?),
        ]))
    })
}

pub fn identifier(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Identifier", &[], || {
        Ok(Schema::object([
            Field::optional(
                "use",
                Schema::enumeration(["usual", "official", "temp", "secondary", "old"]),
            ),
            Field::optional("type", codeable_concept(reg)?),
            Field::optional("system", Schema::string()),
            Field::optional("value", Schema::string()),
            Field::optional("period", period(reg)?),
            Field::optional("assigner", reference(reg)?),
        ]))
    })
}

pub fn reference(reg: &Registry) -> BuildResult<Schema> {
    reg.get_or_build("Reference", &[], || {
        Ok(Schema::object([
            Field::optional("reference", Schema::string()),
            Field::optional("type", Schema::string()),
            Field::optional("identifier", identifier(reg)?),
            Field::optional("display", Schema::string()),
            extensions(reg)?,
        ]))
    })
}

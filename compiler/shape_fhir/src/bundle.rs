//! Bundles, parameterized by the validator of their entries' resources.
//!
//! `Bundle<R>` and `BundleEntry<R>` are keyed by `R`'s identity, so a bundle
//! of patients and a bundle of observations are separate cache entries.
//! Passing `None` means any resource.

use shape_cache::{BuildResult, Field, ParamId, Registry, Schema};

use crate::resources::resource;

fn payload_param(payload: Option<&Schema>) -> ParamId {
    ParamId::of_opt(payload.map(Schema::id))
}

pub fn bundle_entry(reg: &Registry, payload: Option<&Schema>) -> BuildResult<Schema> {
    reg.get_or_build("BundleEntry", &[payload_param(payload)], || {
        let resource = match payload {
            Some(schema) => schema.clone(),
            None => resource(reg)?,
        };
        Ok(Schema::object([
            Field::optional("fullUrl", Schema::string()),
            Field::optional("resource", resource),
            Field::optional(
                "search",
                Schema::object([
                    Field::optional(
                        "mode",
                        Schema::enumeration(["match", "include", "outcome"]),
                    ),
                    Field::optional("score", Schema::number()),
                ]),
            ),
            Field::optional(
                "request",
                Schema::object([
                    Field::required(
                        "method",
                        Schema::enumeration(["GET", "HEAD", "POST", "PUT", "DELETE", "PATCH"]),
                    ),
                    Field::required("url", Schema::string()),
                ]),
            ),
            Field::optional(
                "response",
                Schema::object([
                    Field::required("status", Schema::string()),
                    Field::optional("location", Schema::string()),
                    Field::optional("etag", Schema::string()),
                ]),
            ),
        ]))
    })
}

pub fn bundle(reg: &Registry, payload: Option<&Schema>) -> BuildResult<Schema> {
    reg.get_or_build("Bundle", &[payload_param(payload)], || {
        let link = Schema::object([
            Field::required("relation", Schema::string()),
            Field::required("url", Schema::string()),
        ]);
        Ok(Schema::object([
            Field::required("resourceType", Schema::literal("Bundle")),
            Field::optional("id", Schema::string()),
            Field::required(
                "type",
                Schema::enumeration([
                    "document",
                    "message",
                    "transaction",
                    "transaction-response",
                    "batch",
                    "batch-response",
                    "history",
                    "searchset",
                    "collection",
                ]),
            ),
            Field::optional("timestamp", Schema::string()),
            Field::optional("total", Schema::integer()),
            Field::optional("link", Schema::array(link)),
            Field::optional("entry", Schema::array(bundle_entry(reg, payload)?)),
        ]))
    })
}

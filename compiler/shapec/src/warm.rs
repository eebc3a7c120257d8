use shape_cache::{BuildResult, CacheStats, Registry};

/// Construct every catalog shape in `reg`, then seal it if asked to.
pub fn warm(reg: &Registry, seal: bool) -> BuildResult<CacheStats> {
    let stats = reg.warm(shape_fhir::warm_all)?;
    if seal {
        reg.seal();
    }
    Ok(stats)
}

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Reads filter directives from `SHAPEC_LOG`, falling back to `RUST_LOG`.
/// Without either, nothing is installed and events cost a disabled check.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let Ok(directives) = std::env::var("SHAPEC_LOG").or_else(|_| std::env::var("RUST_LOG"))
        else {
            return;
        };
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
            eprintln!("warning: ignoring invalid log filter `{directives}`: {err}");
            EnvFilter::new("warn")
        });
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_bracketed_fields(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}

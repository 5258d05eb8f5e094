use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt};

#[derive(Default)]
pub struct TracerOptions {
    /// Overrides `RUST_LOG` when set.
    pub level: Option<LevelFilter>,
}

/// This object initialises the stderr tracer, given a TracerOptions struct.
pub struct TracerEngine {
    level: Option<LevelFilter>,
}

impl TracerEngine {
    /// Initialises the stderr tracer for the calling component.
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// #Returns
    /// An instance of TracerEngine, or an error if a global subscriber was already installed.
    pub fn new(options: TracerOptions) -> Result<Self, SetGlobalDefaultError> {
        let stderr_tracer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        let log_filter = match options.level {
            Some(level) => EnvFilter::default().add_directive(level.into()),
            None => EnvFilter::from_default_env(),
        };

        let subscriber =
            tracing_subscriber::Registry::default().with(stderr_tracer.with_filter(log_filter));

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(Self {
            level: options.level,
        })
    }

    pub fn level(&self) -> Option<LevelFilter> {
        self.level
    }
}

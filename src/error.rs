use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not found in environment or .env file. Please check your configuration.")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("season range is empty: start {start} is after end {end}")]
    EmptySeasonRange { start: u16, end: u16 },

    #[error("rate limit quota must be at least 1")]
    ZeroQuota,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error building HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("Error executing request for {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("Error decoding response for {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("column {column:?} of table {table} is absent from every record")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error("record for table {table} did not serialize to an object: {reason}")]
    NotAnObject { table: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Error connecting to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Error creating table {table}: {source}")]
    CreateTable {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Error inserting into {table}: {source}")]
    Insert {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Error committing load transaction: {0}")]
    Commit(#[source] sqlx::Error),

    #[error("Error writing table output: {0}")]
    Output(#[from] std::io::Error),
}

/// Any failure that aborts a run. Nothing is loaded once one of these occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

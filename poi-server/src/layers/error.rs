//! Layer loading error types.

/// Errors that can occur when loading a POI layer.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// Reading a local layer file failed
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feature service returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not a GeoJSON FeatureCollection
    #[error("GeoJSON parse error: {message}")]
    GeoJson { message: String },
}

pub use {
    anyhow,
    indexmap,
    log,
    nalgebra_sparse,
    ndarray,
    polars,
    pretty_env_logger,
    serde,
    serde_json,
};

mod operations;

pub use operations::ClusterOperations;

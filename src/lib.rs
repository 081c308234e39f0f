pub mod hosting;
pub mod remote_url;

// Re-export commonly used types
pub use hosting::{
    GitHostingProvider, OperationResult, ProviderKind, ProviderRegistry, RepositoryInfo,
};
pub use remote_url::ParsedRemote;

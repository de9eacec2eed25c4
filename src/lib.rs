// Public modules
pub mod types;
pub mod config;
pub mod parsing;
pub mod readiness;
pub mod census;
pub mod kubernetes;
pub mod reconciler;
pub mod report;
pub mod diff;
pub mod informer;
pub mod shutdown;

// Re-export commonly used items
pub use types::*;
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use parsing::{repo_version, IdentityExtractor};
pub use readiness::is_ready;
pub use census::{CensusTable, VersionTable};
pub use kubernetes::{build_client, KubePodApi, MockPodApi, PodApi, PodApiError};
pub use reconciler::Reconciler;
pub use report::{CensusSummary, Notice};
pub use diff::{diff_pods, FieldChange};
pub use informer::{InformerCache, PodEvent};

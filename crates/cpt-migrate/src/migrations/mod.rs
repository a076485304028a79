//! Concrete migrations
//!
//! - Seeds: [`SeedAdminUser`], [`SeedForecastRoot`]
//! - Tree node caches: [`AddProcessInterface`], [`RemoveProcessInterface`],
//!   [`AddProcessDependencies`], [`AddVersionNr`]
//! - Tree node versions: [`RenameVersionOwner`]

mod process_dependencies;
mod process_interface;
mod seed_admin_user;
mod seed_forecast_root;
mod version_nr;
mod version_owner;

pub use process_dependencies::{graph_model_refs, AddProcessDependencies};
pub use process_interface::{AddProcessInterface, RemoveProcessInterface};
pub use seed_admin_user::{default_settings, SeedAdminUser, ADMIN_USER_KEY};
pub use seed_forecast_root::{SeedForecastRoot, FORECAST_ROOT_KEY};
pub use version_nr::AddVersionNr;
pub use version_owner::RenameVersionOwner;

/// Process `type` of a sub-model reference
pub const GRAPH_MODEL: &str = "GRAPH_MODEL";

/// `type` of object histories tracking tree nodes
pub const TREE_NODE_HISTORY_TYPE: &str = "TreeNode";

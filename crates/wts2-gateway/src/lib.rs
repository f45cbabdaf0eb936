//! WTS2 Gateway - action dispatch, directory provisioning, and the HTTP front end

pub mod dispatch;
pub mod provision;
pub mod reply;
pub mod server;

pub use dispatch::{failure_reply, Action, ActionError, ActionForm, Dispatcher};
pub use provision::{bucket_for, DirectoryProvisioner, ProvisionOutcome};
pub use reply::Reply;
pub use server::{build_router, start_gateway, BindMode, ServeConfig};

mod manager;
mod run;

pub use manager::AccountManager;
pub use run::{create_kubeconfig, create_service_account};

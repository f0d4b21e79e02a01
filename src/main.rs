// src/main.rs
mod app;
mod cluster;
mod config;
mod discovery;
mod error;
mod kubeconfig;
mod kubectl;
mod manifest;
mod prompt;
mod types;
mod utils;

use app::AccountManager;
use clap::{Args, Parser, Subcommand};
use cluster::ClusterOperations;
use config::{FlowConfig, KubeconfigMethod, ToolDefaults};
use crossterm::style::Stylize;
use kubectl::KubectlRunner;
use prompt::TerminalPrompter;
use std::{path::PathBuf, process::ExitCode};
use utils::logging::{ConsoleLogger, FileLogger, Logger, MultiLogger};

#[derive(Parser)]
#[command(
    name = "sa-kubeconfig",
    version,
    about = "Create Kubernetes service accounts and kubeconfig files for them"
)]
struct Cli {
    /// JSON file with defaults for unset options
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Also append the run log to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// kubectl binary to invoke
    #[arg(long, global = true)]
    kubectl: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a service account (and namespace) and a kubeconfig for it
    CreateServiceAccount {
        #[command(flatten)]
        common: CommonArgs,
        /// Comma separated namespaces to grant access to instead of cluster-admin
        #[arg(short, long)]
        target_namespaces: Option<String>,
    },
    /// Create a kubeconfig for an existing service account
    CreateKubeconfig {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Kubeconfig to read the cluster from
    #[arg(short = 'i', long)]
    kubeconfig: Option<String>,
    /// Where to write the generated kubeconfig
    #[arg(short, long)]
    output: Option<String>,
    /// Context to use from the source kubeconfig
    #[arg(short, long)]
    context: Option<String>,
    #[arg(short, long)]
    namespace: Option<String>,
    #[arg(short, long = "service-account-name")]
    service_account_name: Option<String>,
    #[arg(short, long)]
    verbose: bool,
    /// How the kubeconfig is produced
    #[arg(long, value_enum)]
    method: Option<KubeconfigMethod>,
}

impl CommonArgs {
    fn into_flow_config(self, target_namespaces: Option<String>) -> FlowConfig {
        FlowConfig {
            source_kubeconfig: self.kubeconfig,
            output: self.output,
            context: self.context,
            namespace: self.namespace,
            service_account: self.service_account_name,
            target_namespaces,
            verbose: self.verbose,
            method: self.method,
        }
    }
}

fn build_logger(verbose: bool, log_file: Option<PathBuf>) -> std::io::Result<Box<dyn Logger>> {
    let console: Box<dyn Logger> = Box::new(ConsoleLogger::new(verbose));
    match log_file {
        Some(path) => {
            let file = FileLogger::new(&path, verbose)?;
            Ok(Box::new(MultiLogger::new(vec![console, Box::new(file)])))
        }
        None => Ok(console),
    }
}

fn fail(lines: &[String]) -> ExitCode {
    for line in lines {
        eprintln!("{}", line.as_str().red());
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let defaults = match &cli.config {
        Some(path) => match ToolDefaults::load_from_file(path) {
            Ok(defaults) => defaults,
            Err(e) => return fail(&["Unable to load defaults file".to_string(), e.to_string()]),
        },
        None => ToolDefaults::default(),
    };

    let (flow_config, create_account) = match cli.command {
        Commands::CreateServiceAccount {
            common,
            target_namespaces,
        } => (common.into_flow_config(target_namespaces), true),
        Commands::CreateKubeconfig { common } => (common.into_flow_config(None), false),
    };
    let flow_config = flow_config.with_defaults(&defaults);

    let log_file = cli
        .log_file
        .or_else(|| defaults.log_file.as_deref().map(|p| PathBuf::from(shellexpand::tilde(p).to_string())));
    let logger = match build_logger(flow_config.verbose, log_file) {
        Ok(logger) => logger,
        Err(e) => return fail(&["Unable to open log file".to_string(), e.to_string()]),
    };

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => return fail(&["Unable to determine current directory".to_string(), e.to_string()]),
    };

    let program = cli
        .kubectl
        .or(defaults.kubectl)
        .unwrap_or_else(|| "kubectl".to_string());
    let ops = ClusterOperations::new(Box::new(KubectlRunner::new(program)), logger);
    let mut manager = AccountManager::new(ops, Box::new(TerminalPrompter::new()), cwd);

    let result = if create_account {
        app::create_service_account(&mut manager, &flow_config)
    } else {
        app::create_kubeconfig(&mut manager, &flow_config)
    };

    match result {
        Ok(path) => {
            manager.success(&format!("Created kubeconfig file at {}", path.display()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let mut lines = e.report();
            lines.push(if create_account {
                "Creating service account failed, exiting".to_string()
            } else {
                "Creating kubeconfig failed, exiting".to_string()
            });
            fail(&lines)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_service_account() {
        let cli = Cli::try_parse_from([
            "sa-kubeconfig",
            "create-service-account",
            "-i",
            "~/.kube/prod",
            "-c",
            "prod",
            "-n",
            "spinnaker",
            "-s",
            "spinnaker-sa",
            "-t",
            "dev,qa",
            "--method",
            "minify",
            "--kubectl",
            "/opt/bin/kubectl",
        ])
        .unwrap();

        assert_eq!(cli.kubectl.as_deref(), Some("/opt/bin/kubectl"));
        match cli.command {
            Commands::CreateServiceAccount {
                common,
                target_namespaces,
            } => {
                let config = common.into_flow_config(target_namespaces);
                assert_eq!(config.source_kubeconfig.as_deref(), Some("~/.kube/prod"));
                assert_eq!(config.service_account.as_deref(), Some("spinnaker-sa"));
                assert_eq!(config.target_namespaces.as_deref(), Some("dev,qa"));
                assert_eq!(config.method(), KubeconfigMethod::Minify);
            }
            Commands::CreateKubeconfig { .. } => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_create_kubeconfig_has_no_targets() {
        assert!(Cli::try_parse_from(["sa-kubeconfig", "create-kubeconfig", "-t", "dev"]).is_err());
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pcc_policy::ProviderSettings;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    /// Manage the compliance host policy
    ComplianceHost {
        #[command(flatten)]
        state: StateArgs,

        #[command(subcommand)]
        command: ComplianceHostCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ComplianceHostCommand {
    /// Create or update the policy from a JSON configuration file
    Apply(ApplyArgs),
    /// Re-read the policy from the console into state
    Refresh(ProviderArgs),
    /// Drop the policy from state
    Destroy,
    /// Adopt the existing console policy into state
    Import(ImportArgs),
    /// Print the rules recorded in state
    Show,
    /// Print the resource schema
    Schema,
}

#[derive(clap::Args, Debug)]
pub struct StateArgs {
    /// State file (defaults to the user data directory)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Resource instance name
    #[arg(long, global = true, default_value = "this")]
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct ProviderArgs {
    #[arg(long, env = "PRISMACLOUDCOMPUTE_CONSOLE_URL")]
    pub console_url: Option<String>,

    #[arg(long, env = "PRISMACLOUDCOMPUTE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "PRISMACLOUDCOMPUTE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "PRISMACLOUDCOMPUTE_PROJECT")]
    pub project: Option<String>,

    #[arg(long, env = "PRISMACLOUDCOMPUTE_SKIP_CERT_VERIFICATION")]
    pub skip_cert_verification: Option<bool>,

    /// Seconds between visibility checks after create
    #[arg(long, env = "PRISMACLOUDCOMPUTE_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Visibility checks after create before giving up
    #[arg(long, env = "PRISMACLOUDCOMPUTE_POLL_ATTEMPTS")]
    pub poll_attempts: Option<u32>,

    /// JSON file with provider settings; flags take precedence
    #[arg(long, env = "PRISMACLOUDCOMPUTE_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

impl ProviderArgs {
    pub fn settings(&self) -> ProviderSettings {
        ProviderSettings {
            console_url: self.console_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            project: self.project.clone(),
            skip_cert_verification: self.skip_cert_verification,
            poll_interval_secs: self.poll_interval,
            poll_attempts: self.poll_attempts,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ApplyArgs {
    /// Desired policy configuration (JSON)
    #[arg(long)]
    pub policy: PathBuf,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Policy identifier, e.g. hostCompliance
    pub id: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    const PROVIDER_VARS: &[&str] = &[
        "PRISMACLOUDCOMPUTE_CONSOLE_URL",
        "PRISMACLOUDCOMPUTE_USERNAME",
        "PRISMACLOUDCOMPUTE_PASSWORD",
        "PRISMACLOUDCOMPUTE_PROJECT",
        "PRISMACLOUDCOMPUTE_SKIP_CERT_VERIFICATION",
        "PRISMACLOUDCOMPUTE_POLL_INTERVAL",
        "PRISMACLOUDCOMPUTE_POLL_ATTEMPTS",
        "PRISMACLOUDCOMPUTE_CONFIG_FILE",
    ];

    // Runs `f` with the provider env vars cleared, then restores them.
    fn without_provider_env<T>(f: impl FnOnce() -> T) -> T {
        let backup: Vec<_> = PROVIDER_VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();
        unsafe {
            for name in PROVIDER_VARS {
                std::env::remove_var(name);
            }
        }

        let result = f();

        unsafe {
            for (name, value) in backup {
                if let Some(value) = value {
                    std::env::set_var(name, value);
                }
            }
        }
        result
    }

    #[test]
    #[serial]
    fn test_apply_args_from_flags() {
        let cli = without_provider_env(|| {
            Cli::parse_from([
                "pcc-policy",
                "compliance-host",
                "apply",
                "--policy=policy.json",
                "--console-url=https://console:8083",
                "--username=admin",
                "--password=secret",
            ])
        });

        if let ResourceCommand::ComplianceHost {
            state,
            command: ComplianceHostCommand::Apply(args),
        } = cli.command
        {
            assert_eq!(args.policy, PathBuf::from("policy.json"));
            assert_eq!(args.provider.console_url.as_deref(), Some("https://console:8083"));
            assert_eq!(args.provider.username.as_deref(), Some("admin"));
            assert_eq!(args.provider.password.as_deref(), Some("secret"));
            assert_eq!(state.name, "this");
            assert!(state.state.is_none());
        } else {
            panic!("Expected ComplianceHost Apply command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_global_state_flags_after_subcommand() {
        let cli = without_provider_env(|| {
            Cli::parse_from([
                "pcc-policy",
                "compliance-host",
                "show",
                "--state=/tmp/x.tfstate",
                "--name=prod",
            ])
        });

        if let ResourceCommand::ComplianceHost {
            state,
            command: ComplianceHostCommand::Show,
        } = cli.command
        {
            assert_eq!(state.state, Some(PathBuf::from("/tmp/x.tfstate")));
            assert_eq!(state.name, "prod");
        } else {
            panic!("Expected ComplianceHost Show command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_import_takes_positional_id() {
        let cli = without_provider_env(|| {
            Cli::parse_from(["pcc-policy", "compliance-host", "import", "hostCompliance"])
        });

        if let ResourceCommand::ComplianceHost {
            command: ComplianceHostCommand::Import(args),
            ..
        } = cli.command
        {
            assert_eq!(args.id, "hostCompliance");
            assert!(args.provider.console_url.is_none());
        } else {
            panic!("Expected ComplianceHost Import command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_provider_settings_from_env() {
        let cli = without_provider_env(|| {
            unsafe {
                std::env::set_var("PRISMACLOUDCOMPUTE_CONSOLE_URL", "https://env-console");
                std::env::set_var("PRISMACLOUDCOMPUTE_SKIP_CERT_VERIFICATION", "true");
            }
            let cli = Cli::parse_from(["pcc-policy", "compliance-host", "refresh"]);
            unsafe {
                std::env::remove_var("PRISMACLOUDCOMPUTE_CONSOLE_URL");
                std::env::remove_var("PRISMACLOUDCOMPUTE_SKIP_CERT_VERIFICATION");
            }
            cli
        });

        if let ResourceCommand::ComplianceHost {
            command: ComplianceHostCommand::Refresh(args),
            ..
        } = cli.command
        {
            let settings = args.settings();
            assert_eq!(settings.console_url.as_deref(), Some("https://env-console"));
            assert_eq!(settings.skip_cert_verification, Some(true));
            assert!(settings.username.is_none());
        } else {
            panic!("Expected ComplianceHost Refresh command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_flag_takes_precedence_over_env() {
        let cli = without_provider_env(|| {
            unsafe {
                std::env::set_var("PRISMACLOUDCOMPUTE_USERNAME", "env_user");
            }
            let cli = Cli::parse_from([
                "pcc-policy",
                "compliance-host",
                "refresh",
                "--username=cli_user",
            ]);
            unsafe {
                std::env::remove_var("PRISMACLOUDCOMPUTE_USERNAME");
            }
            cli
        });

        if let ResourceCommand::ComplianceHost {
            command: ComplianceHostCommand::Refresh(args),
            ..
        } = cli.command
        {
            assert_eq!(args.username.as_deref(), Some("cli_user"));
        } else {
            panic!("Expected ComplianceHost Refresh command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_poll_flags() {
        let cli = without_provider_env(|| {
            Cli::parse_from([
                "pcc-policy",
                "compliance-host",
                "refresh",
                "--poll-interval=1",
                "--poll-attempts=3",
            ])
        });

        if let ResourceCommand::ComplianceHost {
            command: ComplianceHostCommand::Refresh(args),
            ..
        } = cli.command
        {
            let settings = args.settings();
            assert_eq!(settings.poll_interval_secs, Some(1));
            assert_eq!(settings.poll_attempts, Some(3));
        } else {
            panic!("Expected ComplianceHost Refresh command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_apply_requires_policy() {
        let result = Cli::try_parse_from(["pcc-policy", "compliance-host", "apply"]);
        assert!(result.is_err());
    }
}

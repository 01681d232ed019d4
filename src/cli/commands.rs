use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use pcc_policy::config::default_state_path;
use pcc_policy::resource::{RESOURCE_TYPE, compliance_host_schema, parse_rules};
use pcc_policy::{
    ComplianceHostResource, PccError, PrismaClient, ProviderSettings, ResourceData, StateFile,
    output,
};

use super::args::{ApplyArgs, ImportArgs, ProviderArgs, StateArgs};

struct Workspace {
    path: PathBuf,
    name: String,
    state: StateFile,
}

impl Workspace {
    fn open(args: &StateArgs) -> Result<Self, PccError> {
        let path = args.state.clone().unwrap_or_else(default_state_path);
        let state = StateFile::load(&path)?;
        tracing::debug!(path = %path.display(), serial = state.serial, "state loaded");
        Ok(Self {
            path,
            name: args.name.clone(),
            state,
        })
    }

    fn data(&self) -> Option<ResourceData> {
        self.state
            .instance(RESOURCE_TYPE, &self.name)
            .map(|instance| {
                ResourceData::from_state(&compliance_host_schema().block, instance.attributes.clone())
            })
    }

    fn require_data(&self) -> Result<ResourceData, PccError> {
        self.data().ok_or_else(|| PccError::NotInState {
            resource: RESOURCE_TYPE.to_string(),
            name: self.name.clone(),
        })
    }

    /// Persists `d`, or drops the instance when its id has been cleared.
    fn commit(mut self, d: &ResourceData) -> Result<(), PccError> {
        if d.id().is_empty() {
            if self.state.remove_instance(RESOURCE_TYPE, &self.name) {
                tracing::info!(name = %self.name, "instance removed from state");
            }
        } else {
            self.state
                .upsert_instance(RESOURCE_TYPE, &self.name, d.to_state_attributes());
        }
        self.state.save(&self.path)?;
        Ok(())
    }
}

async fn connect(args: &ProviderArgs) -> Result<ComplianceHostResource<PrismaClient>, PccError> {
    let mut settings = args.settings();
    if let Some(path) = &args.config_file {
        settings = settings.or(ProviderSettings::from_file(path)?);
    }
    let config = settings.resolve()?;
    let client = PrismaClient::connect(&config).await?;
    Ok(ComplianceHostResource::new(client).with_poll(config.poll))
}

fn load_policy_config(path: &Path) -> Result<Map<String, Value>, PccError> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| PccError::Json {
        path: path.display().to_string(),
        source,
    })?;
    compliance_host_schema().block.validate_config(&value)?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

pub async fn apply(state: &StateArgs, args: &ApplyArgs) -> Result<(), PccError> {
    let workspace = Workspace::open(state)?;
    let config = load_policy_config(&args.policy)?;
    let id = workspace
        .data()
        .map(|d| d.id().to_string())
        .unwrap_or_default();

    let resource = connect(&args.provider).await?;
    let mut d = ResourceData::from_attributes(&compliance_host_schema().block, id, config);

    if d.id().is_empty() {
        resource.create(&mut d).await?;
    } else {
        resource.update(&mut d).await?;
    }

    print_rules(&d);
    workspace.commit(&d)
}

pub async fn refresh(state: &StateArgs, args: &ProviderArgs) -> Result<(), PccError> {
    let workspace = Workspace::open(state)?;
    let mut d = workspace.require_data()?;

    let resource = connect(args).await?;
    resource.read(&mut d).await?;

    workspace.commit(&d)
}

pub async fn destroy(state: &StateArgs) -> Result<(), PccError> {
    let workspace = Workspace::open(state)?;
    let Some(mut d) = workspace.data() else {
        tracing::info!(name = %workspace.name, "no instance in state, nothing to destroy");
        return Ok(());
    };

    // No console session needed: delete never reaches the API.
    let resource = ComplianceHostResource::new(Offline);
    resource.delete(&mut d).await?;

    workspace.commit(&d)
}

pub async fn import(state: &StateArgs, args: &ImportArgs) -> Result<(), PccError> {
    let workspace = Workspace::open(state)?;
    let resource = connect(&args.provider).await?;
    let d = resource.import(&args.id).await?;

    if d.id().is_empty() {
        tracing::warn!(id = %args.id, "policy not found on console, nothing imported");
    } else {
        print_rules(&d);
    }
    workspace.commit(&d)
}

pub fn show(state: &StateArgs) -> Result<(), PccError> {
    let workspace = Workspace::open(state)?;
    let d = workspace.require_data()?;
    println!("id: {}", d.id());
    print_rules(&d);
    Ok(())
}

pub fn schema() {
    println!("{}", output::schema_tree(compliance_host_schema()));
}

fn print_rules(d: &ResourceData) {
    let rules = d
        .get("rules")
        .and_then(Value::as_array)
        .map(|items| parse_rules(items))
        .unwrap_or_default();
    println!("{}", output::rules_table(&rules));
}

/// API stand-in for operations that never leave the machine.
struct Offline;

#[async_trait::async_trait]
impl pcc_policy::PolicyApi for Offline {
    async fn create(&self, _policy: &pcc_policy::Policy) -> Result<(), pcc_policy::PrismaError> {
        Err(offline())
    }

    async fn get(&self) -> Result<pcc_policy::Policy, pcc_policy::PrismaError> {
        Err(offline())
    }

    async fn update(&self, _policy: &pcc_policy::Policy) -> Result<(), pcc_policy::PrismaError> {
        Err(offline())
    }
}

fn offline() -> pcc_policy::PrismaError {
    pcc_policy::PrismaError::Auth {
        message: "no console session".to_string(),
    }
}

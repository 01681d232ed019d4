use serde::{Deserialize, Serialize};

/// Compliance host policy as exchanged with the console.
///
/// Every field defaults to its zero value so partial responses decode cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    #[serde(rename = "_id")]
    pub policy_id: String,
    pub policy_type: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    pub action: Vec<String>,
    pub alert_threshold: Threshold,
    pub all_compliance: bool,
    pub audit_allowed: bool,
    pub block_msg: String,
    pub block_threshold: Threshold,
    pub collections: Vec<Collection>,
    pub condition: Condition,
    pub cve_rules: Vec<CveRule>,
    pub disabled: bool,
    pub effect: String,
    pub grace_days: i64,
    pub group: Vec<String>,
    pub license: License,
    pub modified: String,
    pub name: String,
    pub notes: String,
    pub only_fixed: bool,
    pub owner: String,
    pub previous_name: String,
    pub principal: Vec<String>,
    pub tags: Vec<TagRule>,
    pub verbose: bool,
}

/// Severity cutoff; `value` ranges 0 (off) to 9 (critical).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Threshold {
    pub enabled: bool,
    pub disabled: bool,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collection {
    #[serde(rename = "accountIDs")]
    pub account_ids: Vec<String>,
    #[serde(rename = "appIDs")]
    pub app_ids: Vec<String>,
    pub clusters: Vec<String>,
    pub code_repos: Vec<String>,
    pub color: String,
    pub containers: Vec<String>,
    pub description: String,
    pub functions: Vec<String>,
    pub hosts: Vec<String>,
    pub images: Vec<String>,
    pub labels: Vec<String>,
    pub modified: String,
    pub name: String,
    pub namespaces: Vec<String>,
    pub owner: String,
    pub prisma: bool,
    pub system: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub device: String,
    pub readonly: bool,
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vulnerability {
    pub block: bool,
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CveRule {
    pub description: String,
    pub effect: String,
    pub expiration: Expiration,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRule {
    pub description: String,
    pub effect: String,
    pub expiration: Expiration,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expiration {
    pub date: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct License {
    pub alert_threshold: Threshold,
    pub block_threshold: Threshold,
    pub critical: Vec<String>,
    pub high: Vec<String>,
    pub low: Vec<String>,
    pub medium: Vec<String>,
}

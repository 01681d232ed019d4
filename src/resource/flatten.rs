//! API object → attribute bag.

use serde_json::{Value, json};

use crate::prisma::{
    Collection, Condition, CveRule, Expiration, License, Policy, Rule, TagRule, Threshold,
};
use crate::terraform::ResourceData;

/// Writes the policy into `d`.
///
/// Besides the full `rules` list, rule index 0 is also exposed on its own under
/// `rule`; the attribute is cleared when the policy has no rules. Write
/// failures are logged and skipped.
pub fn save_policy(d: &mut ResourceData, policy: &Policy) {
    set_or_warn(d, "_id", json!(policy.policy_id));
    set_or_warn(d, "policytype", json!(policy.policy_type));
    set_or_warn(d, "rules", flatten_rules(&policy.rules));

    let first = policy.rules.first().map(flatten_rule).unwrap_or(Value::Null);
    set_or_warn(d, "rule", first);
}

fn set_or_warn(d: &mut ResourceData, key: &str, value: Value) {
    if let Err(e) = d.set(key, value) {
        tracing::warn!(id = %d.id(), attribute = key, error = %e, "error setting attribute");
    }
}

pub fn flatten_rules(rules: &[Rule]) -> Value {
    Value::Array(rules.iter().map(flatten_rule).collect())
}

fn flatten_rule(rule: &Rule) -> Value {
    json!({
        "action": rule.action,
        "alertthreshold": flatten_threshold(&rule.alert_threshold),
        "allcompliance": rule.all_compliance,
        "auditallowed": rule.audit_allowed,
        "blockmsg": rule.block_msg,
        "blockthreshold": flatten_threshold(&rule.block_threshold),
        "collections": rule.collections.iter().map(flatten_collection).collect::<Vec<_>>(),
        "condition": flatten_condition(&rule.condition),
        "cverules": rule.cve_rules.iter().map(flatten_cve_rule).collect::<Vec<_>>(),
        "disabled": rule.disabled,
        "effect": rule.effect,
        "gracedays": rule.grace_days,
        "group": rule.group,
        "license": flatten_license(&rule.license),
        "modified": rule.modified,
        "name": rule.name,
        "notes": rule.notes,
        "onlyfixed": rule.only_fixed,
        "owner": rule.owner,
        "previousname": rule.previous_name,
        "principal": rule.principal,
        "tags": rule.tags.iter().map(flatten_tag_rule).collect::<Vec<_>>(),
        "verbose": rule.verbose,
    })
}

fn flatten_threshold(t: &Threshold) -> Value {
    json!({
        "enabled": t.enabled,
        "disabled": t.disabled,
        "value": t.value,
    })
}

fn flatten_collection(c: &Collection) -> Value {
    json!({
        "accountids": c.account_ids,
        "appids": c.app_ids,
        "clusters": c.clusters,
        "coderepos": c.code_repos,
        "color": c.color,
        "containers": c.containers,
        "description": c.description,
        "functions": c.functions,
        "hosts": c.hosts,
        "images": c.images,
        "labels": c.labels,
        "modified": c.modified,
        "name": c.name,
        "namespaces": c.namespaces,
        "owner": c.owner,
        "prisma": c.prisma,
        "system": c.system,
    })
}

fn flatten_condition(c: &Condition) -> Value {
    let vulnerabilities: Vec<Value> = c
        .vulnerabilities
        .iter()
        .map(|v| json!({"block": v.block, "id": v.id}))
        .collect();

    json!({
        "device": c.device,
        "readonly": c.readonly,
        "vulnerabilities": vulnerabilities,
    })
}

fn flatten_expiration(e: &Expiration) -> Value {
    json!({"date": e.date, "enabled": e.enabled})
}

fn flatten_cve_rule(r: &CveRule) -> Value {
    json!({
        "description": r.description,
        "effect": r.effect,
        "expiration": flatten_expiration(&r.expiration),
        "id": r.id,
    })
}

fn flatten_tag_rule(r: &TagRule) -> Value {
    json!({
        "description": r.description,
        "effect": r.effect,
        "expiration": flatten_expiration(&r.expiration),
        "name": r.name,
    })
}

fn flatten_license(l: &License) -> Value {
    json!({
        "alertthreshold": flatten_threshold(&l.alert_threshold),
        "blockthreshold": flatten_threshold(&l.block_threshold),
        "critical": l.critical,
        "high": l.high,
        "low": l.low,
        "medium": l.medium,
    })
}

//! Attribute bag → API object.
//!
//! Every reader falls back to the zero value when a key is unset or holds an
//! unexpected shape; type enforcement is left to the schema.

use serde_json::{Map, Value};

use crate::prisma::{
    Collection, Condition, CveRule, Expiration, License, Policy, Rule, TagRule, Threshold,
    Vulnerability,
};
use crate::terraform::ResourceData;

pub fn parse_policy(d: &ResourceData, id: &str) -> Policy {
    let policy_type = d
        .get("policytype")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let rules = d
        .get("rules")
        .and_then(Value::as_array)
        .map(|items| parse_rules(items))
        .unwrap_or_default();

    Policy {
        policy_id: id.to_string(),
        policy_type,
        rules,
    }
}

pub fn parse_rules(items: &[Value]) -> Vec<Rule> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(parse_rule)
        .collect()
}

fn parse_rule(m: &Map<String, Value>) -> Rule {
    Rule {
        action: strings(m, "action"),
        alert_threshold: threshold(object(m, "alertthreshold")),
        all_compliance: boolean(m, "allcompliance"),
        audit_allowed: boolean(m, "auditallowed"),
        block_msg: string(m, "blockmsg"),
        block_threshold: threshold(object(m, "blockthreshold")),
        collections: objects(m, "collections").map(collection).collect(),
        condition: condition(object(m, "condition")),
        cve_rules: objects(m, "cverules").map(cve_rule).collect(),
        disabled: boolean(m, "disabled"),
        effect: string(m, "effect"),
        grace_days: int(m, "gracedays"),
        group: strings(m, "group"),
        license: license(object(m, "license")),
        modified: string(m, "modified"),
        name: string(m, "name"),
        notes: string(m, "notes"),
        only_fixed: boolean(m, "onlyfixed"),
        owner: string(m, "owner"),
        previous_name: string(m, "previousname"),
        principal: strings(m, "principal"),
        tags: objects(m, "tags").map(tag_rule).collect(),
        verbose: boolean(m, "verbose"),
    }
}

fn threshold(m: Option<&Map<String, Value>>) -> Threshold {
    let Some(m) = m else {
        return Threshold::default();
    };
    Threshold {
        enabled: boolean(m, "enabled"),
        disabled: boolean(m, "disabled"),
        value: int(m, "value"),
    }
}

fn collection(m: &Map<String, Value>) -> Collection {
    Collection {
        account_ids: strings(m, "accountids"),
        app_ids: strings(m, "appids"),
        clusters: strings(m, "clusters"),
        code_repos: strings(m, "coderepos"),
        color: string(m, "color"),
        containers: strings(m, "containers"),
        description: string(m, "description"),
        functions: strings(m, "functions"),
        hosts: strings(m, "hosts"),
        images: strings(m, "images"),
        labels: strings(m, "labels"),
        modified: string(m, "modified"),
        name: string(m, "name"),
        namespaces: strings(m, "namespaces"),
        owner: string(m, "owner"),
        prisma: boolean(m, "prisma"),
        system: boolean(m, "system"),
    }
}

fn condition(m: Option<&Map<String, Value>>) -> Condition {
    let Some(m) = m else {
        return Condition::default();
    };
    Condition {
        device: string(m, "device"),
        readonly: boolean(m, "readonly"),
        vulnerabilities: objects(m, "vulnerabilities")
            .map(|v| Vulnerability {
                block: boolean(v, "block"),
                id: int(v, "id"),
            })
            .collect(),
    }
}

fn expiration(m: Option<&Map<String, Value>>) -> Expiration {
    m.map(|m| Expiration {
        date: string(m, "date"),
        enabled: boolean(m, "enabled"),
    })
    .unwrap_or_default()
}

fn cve_rule(m: &Map<String, Value>) -> CveRule {
    CveRule {
        description: string(m, "description"),
        effect: string(m, "effect"),
        expiration: expiration(object(m, "expiration")),
        id: string(m, "id"),
    }
}

fn tag_rule(m: &Map<String, Value>) -> TagRule {
    TagRule {
        description: string(m, "description"),
        effect: string(m, "effect"),
        expiration: expiration(object(m, "expiration")),
        name: string(m, "name"),
    }
}

fn license(m: Option<&Map<String, Value>>) -> License {
    let Some(m) = m else {
        return License::default();
    };
    License {
        alert_threshold: threshold(object(m, "alertthreshold")),
        block_threshold: threshold(object(m, "blockthreshold")),
        critical: strings(m, "critical"),
        high: strings(m, "high"),
        low: strings(m, "low"),
        medium: strings(m, "medium"),
    }
}

fn string(m: &Map<String, Value>, key: &str) -> String {
    m.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn boolean(m: &Map<String, Value>, key: &str) -> bool {
    m.get(key).and_then(Value::as_bool).unwrap_or_default()
}

fn int(m: &Map<String, Value>, key: &str) -> i64 {
    m.get(key).and_then(Value::as_i64).unwrap_or_default()
}

fn strings(m: &Map<String, Value>, key: &str) -> Vec<String> {
    m.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn object<'a>(m: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    m.get(key).and_then(Value::as_object)
}

fn objects<'a>(
    m: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    m.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::compliance_host_schema;
    use serde_json::json;

    fn data(config: Value) -> ResourceData {
        let Value::Object(attributes) = config else {
            panic!("config must be an object");
        };
        ResourceData::from_attributes(&compliance_host_schema().block, "", attributes)
    }

    #[test]
    fn test_parse_uses_given_id() {
        let policy = parse_policy(&data(json!({"_id": "ignored"})), "hostCompliance");
        assert_eq!(policy.policy_id, "hostCompliance");
    }

    #[test]
    fn test_parse_policytype_falls_back_to_default() {
        let policy = parse_policy(&data(json!({})), "");
        assert_eq!(policy.policy_type, "hostCompliance");
        assert!(policy.rules.is_empty());
    }

    #[test]
    fn test_parse_full_rule() {
        let d = data(json!({
            "policytype": "hostCompliance",
            "rules": [{
                "name": "Default",
                "effect": "alert, block",
                "action": ["*"],
                "alertthreshold": {"enabled": true, "value": 3},
                "blockthreshold": {"disabled": true, "value": 9},
                "allcompliance": true,
                "blockmsg": "blocked",
                "collections": [{"name": "All", "hosts": ["*"], "accountids": ["42"], "system": true}],
                "condition": {"device": "/dev/sda", "vulnerabilities": [{"id": 6112, "block": true}]},
                "cverules": [{"id": "CVE-1", "effect": "ignore", "expiration": {"date": "2030-01-01", "enabled": true}}],
                "tags": [{"name": "exempt", "effect": "alert", "description": "temp"}],
                "license": {"alertthreshold": {"value": 1}, "critical": ["GPL-3.0"]},
                "gracedays": 14,
                "onlyfixed": true,
                "previousname": "Old",
                "principal": ["alice"],
                "group": ["admins"],
                "verbose": true
            }]
        }));

        let policy = parse_policy(&d, "");
        assert_eq!(policy.rules.len(), 1);
        let rule = &policy.rules[0];
        assert_eq!(rule.name, "Default");
        assert_eq!(rule.effect, "alert, block");
        assert_eq!(rule.action, vec!["*"]);
        assert_eq!(
            rule.alert_threshold,
            Threshold {
                enabled: true,
                disabled: false,
                value: 3
            }
        );
        assert!(rule.block_threshold.disabled);
        assert!(rule.all_compliance);
        assert_eq!(rule.block_msg, "blocked");
        assert_eq!(rule.collections[0].account_ids, vec!["42"]);
        assert!(rule.collections[0].system);
        assert_eq!(rule.condition.device, "/dev/sda");
        assert_eq!(rule.condition.vulnerabilities[0].id, 6112);
        assert!(rule.condition.vulnerabilities[0].block);
        assert_eq!(rule.cve_rules[0].expiration.date, "2030-01-01");
        assert_eq!(rule.tags[0].description, "temp");
        assert_eq!(rule.license.alert_threshold.value, 1);
        assert_eq!(rule.license.critical, vec!["GPL-3.0"]);
        assert_eq!(rule.grace_days, 14);
        assert!(rule.only_fixed);
        assert_eq!(rule.previous_name, "Old");
        assert_eq!(rule.principal, vec!["alice"]);
        assert_eq!(rule.group, vec!["admins"]);
        assert!(rule.verbose);
    }

    #[test]
    fn test_unset_fields_are_zero_values() {
        let policy = parse_policy(&data(json!({"rules": [{"name": "bare"}]})), "");
        let expected = Rule {
            name: "bare".to_string(),
            ..Default::default()
        };
        assert_eq!(policy.rules[0], expected);
    }

    #[test]
    fn test_parse_preserves_rule_order() {
        let d = data(json!({"rules": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}));
        let names: Vec<_> = parse_policy(&d, "")
            .rules
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}

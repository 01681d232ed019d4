use std::sync::LazyLock;
use std::time::Duration;

use crate::schema::{Attribute, Block, Importer, ResourceSchema, ResourceTimeouts};

pub const RESOURCE_TYPE: &str = "prismacloudcompute_policies_compliance_host";
pub const DEFAULT_POLICY_TYPE: &str = "hostCompliance";

static SCHEMA: LazyLock<ResourceSchema> = LazyLock::new(|| ResourceSchema {
    type_name: RESOURCE_TYPE,
    block: policy_block(),
    timeouts: ResourceTimeouts {
        create: Duration::from_secs(10 * 60),
        update: Duration::from_secs(10 * 60),
        delete: Duration::from_secs(5 * 60),
    },
    importer: Some(Importer::Passthrough),
});

pub fn compliance_host_schema() -> &'static ResourceSchema {
    &SCHEMA
}

fn policy_block() -> Block {
    Block::new()
        .with_attribute(
            "_id",
            Attribute::string().optional().describe("ID of the policy set."),
        )
        .with_attribute(
            "policytype",
            Attribute::string()
                .optional()
                .with_default(DEFAULT_POLICY_TYPE)
                .describe("Type of policy. For example: 'hostCompliance'."),
        )
        .with_attribute(
            "rules",
            Attribute::list_of_blocks(rule_block())
                .optional()
                .min_items(1)
                .describe("List of policy rules."),
        )
        .with_attribute(
            "rule",
            Attribute::object(rule_block())
                .computed()
                .describe("Flattened view of the first policy rule."),
        )
}

fn threshold_block(action: &'static [&'static str; 3]) -> Block {
    Block::new()
        .with_attribute("enabled", Attribute::bool().optional().describe(action[0]))
        .with_attribute("disabled", Attribute::bool().optional().describe(action[1]))
        .with_attribute("value", Attribute::int().optional().describe(action[2]))
}

const ALERT_TEXT: &[&str; 3] = &[
    "If set to 'true', enables alerts.",
    "If set to 'true', suppresses alerts for all compliance checks.",
    "Minimum severity to trigger alerts. Supported values range from 0 to 9, where 0=off, 1=low, and 9=critical.",
];

const BLOCK_TEXT: &[&str; 3] = &[
    "If set to 'true', enables blocking.",
    "If set to 'true', suppresses blocking for all compliance checks.",
    "Minimum severity to trigger blocking. Supported values range from 0 to 9, where 0=off, 1=low, and 9=critical.",
];

fn expiration_block() -> Block {
    Block::new()
        .with_attribute(
            "date",
            Attribute::string()
                .optional()
                .describe("Date of the exception expiration."),
        )
        .with_attribute(
            "enabled",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', the grace period is enabled."),
        )
}

fn string_list(description: &'static str) -> Attribute {
    Attribute::list_of_strings().optional().describe(description)
}

fn collection_block() -> Block {
    Block::new()
        .with_attribute("accountids", string_list("List of account IDs."))
        .with_attribute("appids", string_list("List of application IDs."))
        .with_attribute("clusters", string_list("List of Kubernetes cluster names."))
        .with_attribute("coderepos", string_list("List of code repositories."))
        .with_attribute(
            "color",
            Attribute::string()
                .optional()
                .describe("A hex color code for a collection."),
        )
        .with_attribute("containers", string_list("List of containers."))
        .with_attribute(
            "description",
            Attribute::string()
                .optional()
                .describe("A free-form text description of the collection."),
        )
        .with_attribute("functions", string_list("List of functions."))
        .with_attribute("hosts", string_list("List of hosts."))
        .with_attribute("images", string_list("List of images."))
        .with_attribute("labels", string_list("List of labels."))
        .with_attribute(
            "modified",
            Attribute::string()
                .optional()
                .describe("Date/time when the collection was last modified."),
        )
        .with_attribute(
            "name",
            Attribute::string().optional().describe("Unique collection name."),
        )
        .with_attribute("namespaces", string_list("List of Kubernetes namespaces."))
        .with_attribute(
            "owner",
            Attribute::string()
                .optional()
                .describe("User who created or last modified the collection."),
        )
        .with_attribute(
            "prisma",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', this collection originates from Prisma Cloud."),
        )
        .with_attribute(
            "system",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', this collection was created by the system."),
        )
}

fn condition_block() -> Block {
    let vulnerability = Block::new()
        .with_attribute(
            "block",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', the effect is blocked."),
        )
        .with_attribute(
            "id",
            Attribute::int().optional().describe("Compliance check ID."),
        );

    Block::new()
        .with_attribute(
            "device",
            Attribute::string()
                .optional()
                .describe("Allowed volume host device (wildcard)."),
        )
        .with_attribute(
            "readonly",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', the condition applies only to read-only commands."),
        )
        .with_attribute(
            "vulnerabilities",
            Attribute::list_of_blocks(vulnerability)
                .optional()
                .describe("Block and scan severity-based compliance conditions."),
        )
}

fn exception_block(key: &'static str, key_description: &'static str) -> Block {
    Block::new()
        .with_attribute(
            "description",
            Attribute::string()
                .optional()
                .describe("Free-form text for documenting the exception."),
        )
        .with_attribute(
            "effect",
            Attribute::string()
                .optional()
                .describe("Action for the exception. Can be set to 'ignore', 'alert', or 'block'."),
        )
        .with_attribute(
            "expiration",
            Attribute::object(expiration_block())
                .optional()
                .describe("The exception expiration date."),
        )
        .with_attribute(key, Attribute::string().optional().describe(key_description))
}

fn license_block() -> Block {
    Block::new()
        .with_attribute(
            "alertthreshold",
            Attribute::object(threshold_block(ALERT_TEXT))
                .optional()
                .describe("The license severity threshold to indicate whether to perform an alert action."),
        )
        .with_attribute(
            "blockthreshold",
            Attribute::object(threshold_block(BLOCK_TEXT))
                .optional()
                .describe("The license severity threshold to indicate whether to perform a block action."),
        )
        .with_attribute("critical", string_list("The list of licenses with critical severity."))
        .with_attribute("high", string_list("The list of licenses with high severity."))
        .with_attribute("low", string_list("The list of licenses with low severity."))
        .with_attribute("medium", string_list("The list of licenses with medium severity."))
}

fn rule_block() -> Block {
    Block::new()
        .with_attribute("action", string_list("Action to take."))
        .with_attribute(
            "alertthreshold",
            Attribute::object(threshold_block(ALERT_TEXT))
                .optional()
                .describe("The compliance policy alert threshold."),
        )
        .with_attribute(
            "allcompliance",
            Attribute::bool().optional().describe(
                "If set to 'true', reports the results of all (passed and failed) compliance checks.",
            ),
        )
        .with_attribute(
            "auditallowed",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', audits successful transactions."),
        )
        .with_attribute(
            "blockmsg",
            Attribute::string()
                .optional()
                .describe("Represents the block message in a policy."),
        )
        .with_attribute(
            "blockthreshold",
            Attribute::object(threshold_block(BLOCK_TEXT))
                .optional()
                .describe("The compliance policy block threshold."),
        )
        .with_attribute(
            "collections",
            Attribute::list_of_blocks(collection_block())
                .optional()
                .describe("List of collections. Used to scope the rule."),
        )
        .with_attribute(
            "condition",
            Attribute::object(condition_block())
                .optional()
                .describe("Rule conditions. Conditions only apply for their respective policy type."),
        )
        .with_attribute(
            "cverules",
            Attribute::list_of_blocks(exception_block("id", "CVE ID."))
                .optional()
                .describe("List of CVE IDs classified for special handling/exceptions."),
        )
        .with_attribute(
            "disabled",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', the rule is currently disabled."),
        )
        .with_attribute(
            "effect",
            Attribute::string().optional().describe(
                "The effect of evaluating the given policy. Can be set to 'allow', 'deny', 'block', or 'alert'.",
            ),
        )
        .with_attribute(
            "gracedays",
            Attribute::int()
                .optional()
                .describe("Number of days to suppress the rule's block effect."),
        )
        .with_attribute("group", string_list("Applicable groups."))
        .with_attribute(
            "license",
            Attribute::object(license_block())
                .optional()
                .describe("The configuration of the compliance policy license."),
        )
        .with_attribute(
            "modified",
            Attribute::string()
                .optional()
                .describe("Date/time when the rule was last modified."),
        )
        .with_attribute(
            "name",
            Attribute::string().optional().describe("Name of the rule."),
        )
        .with_attribute(
            "notes",
            Attribute::string().optional().describe("Free-form text notes."),
        )
        .with_attribute(
            "onlyfixed",
            Attribute::bool()
                .optional()
                .describe("If set to 'true', applies rule only when vendor fixes are available."),
        )
        .with_attribute(
            "owner",
            Attribute::string()
                .optional()
                .describe("User who created or last modified the rule."),
        )
        .with_attribute(
            "previousname",
            Attribute::string()
                .optional()
                .describe("Previous name of the rule. Required for rule renaming."),
        )
        .with_attribute("principal", string_list("Applicable users."))
        .with_attribute(
            "tags",
            Attribute::list_of_blocks(exception_block("name", "Tag name."))
                .optional()
                .describe("List of tags classified for special handling/exceptions."),
        )
        .with_attribute(
            "verbose",
            Attribute::bool().optional().describe(
                "If set to 'true', displays a detailed message when an operation is blocked.",
            ),
        )
}

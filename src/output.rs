use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::prisma::{Rule, Threshold};
use crate::schema::{AttributeType, Block, ResourceSchema};

#[derive(Debug, Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Effect")]
    effect: String,
    #[tabled(rename = "Alert")]
    alert: String,
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Collections")]
    collections: String,
    #[tabled(rename = "CVE exceptions")]
    cve_rules: usize,
    #[tabled(rename = "Tag exceptions")]
    tags: usize,
    #[tabled(rename = "Disabled")]
    disabled: bool,
}

fn threshold_label(t: &Threshold) -> String {
    if t.disabled || t.value == 0 {
        "off".to_string()
    } else {
        format!(">= {}", t.value)
    }
}

pub fn rules_table(rules: &[Rule]) -> String {
    let rows: Vec<RuleRow> = rules
        .iter()
        .enumerate()
        .map(|(index, rule)| RuleRow {
            index,
            name: rule.name.clone(),
            effect: rule.effect.clone(),
            alert: threshold_label(&rule.alert_threshold),
            block: threshold_label(&rule.block_threshold),
            collections: rule
                .collections
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            cve_rules: rule.cve_rules.len(),
            tags: rule.tags.len(),
            disabled: rule.disabled,
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Renders the attribute tree of a resource schema.
pub fn schema_tree(schema: &ResourceSchema) -> String {
    let mut root = Tree::new(schema.type_name.to_string());
    push_block(&mut root, &schema.block);
    root.to_string()
}

fn push_block(tree: &mut Tree<String>, block: &Block) {
    for (name, attribute) in block.attributes() {
        let mut flags = Vec::new();
        if attribute.optional {
            flags.push("optional");
        }
        if attribute.computed {
            flags.push("computed");
        }

        let label = format!("{}: {} [{}]", name, attribute.ty.type_name(), flags.join(", "));
        let mut node = Tree::new(label);

        match &attribute.ty {
            AttributeType::Object(inner) => push_block(&mut node, inner),
            AttributeType::List(elem) => {
                if let AttributeType::Object(inner) = elem.as_ref() {
                    push_block(&mut node, inner);
                }
            }
            _ => {}
        }

        tree.push(node);
    }
}

use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate a synthetic node library for the seiri normalizer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_library.json")]
    output: String,

    /// The number of nodes to generate
    #[arg(short, long, default_value_t = 25)]
    nodes: usize,

    /// The maximum number of plain parameters per resource
    #[arg(long, default_value_t = 6)]
    max_fields: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const SERVICES: &[&str] = &[
    "Slack", "GitHub", "Notion", "Airtable", "Stripe", "Postgres", "Google Sheets", "Jira",
    "HubSpot", "Discord", "Trello", "Twilio",
];
const RESOURCES: &[&str] = &["message", "channel", "user", "record", "issue", "file"];
const OPERATIONS: &[&str] = &["create", "get", "getAll", "update", "delete"];
const FIELD_NAMES: &[&str] = &[
    "title", "text", "url", "isPrivate", "hasAttachments", "limit", "accessToken", "email",
    "tags", "method", "webhookUrl", "returnAll",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if cli.max_fields == 0 {
        eprintln!("Error: --max-fields must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating {} nodes (up to {} fields per resource)...",
        cli.nodes, cli.max_fields
    );

    let nodes: Vec<Value> = (0..cli.nodes)
        .map(|index| generate_node(&mut rng, index, cli.max_fields))
        .collect();
    let library = json!({ "nodes": nodes });

    fs::write(&cli.output, serde_json::to_string_pretty(&library)?)?;
    println!("Successfully generated and saved library to '{}'", cli.output);
    Ok(())
}

/// One node with a resource/operation pair and fields gated on both.
fn generate_node(rng: &mut StdRng, index: usize, max_fields: usize) -> Value {
    let service = SERVICES.choose(rng).copied().unwrap_or("Service");
    let display_name = format!("{} {}", service, index + 1);
    let resource_count = rng.random_range(1..=3);
    let resources: Vec<&str> = RESOURCES
        .choose_multiple(rng, resource_count)
        .copied()
        .collect();

    let mut properties = vec![json!({
        "displayName": "Resource",
        "name": "resource",
        "type": "options",
        "default": resources[0],
        "options": resources
            .iter()
            .map(|r| json!({ "name": capitalize(r), "value": r }))
            .collect::<Vec<_>>(),
    })];

    for resource in &resources {
        let operation_count = rng.random_range(1..=OPERATIONS.len());
        let operations: Vec<&str> = OPERATIONS
            .choose_multiple(rng, operation_count)
            .copied()
            .collect();
        properties.push(json!({
            "displayName": "Operation",
            "name": "operation",
            "type": "options",
            "displayOptions": { "show": { "resource": [resource] } },
            "options": operations
                .iter()
                .map(|op| json!({ "name": capitalize(op), "value": op, "description": format!("<b>{}</b> a {}", capitalize(op), resource) }))
                .collect::<Vec<_>>(),
            "default": operations[0],
        }));

        let field_count = rng.random_range(1..=max_fields);
        let fields: Vec<&str> = FIELD_NAMES.choose_multiple(rng, field_count).copied().collect();
        for field in fields {
            properties.push(generate_field(rng, field, resource, &operations));
        }
    }

    if rng.random_bool(0.4) {
        properties.push(generate_collection(rng));
    }

    json!({
        "displayName": display_name,
        "name": format!("n8n-nodes-base.{}", service.to_lowercase().replace(' ', "")),
        "version": rng.random_range(1..=3),
        "description": format!("Consume the {} API.<br>See <a href=\"https://example.com\">docs</a>.", service),
        "properties": properties,
    })
}

fn generate_field(rng: &mut StdRng, name: &str, resource: &str, operations: &[&str]) -> Value {
    let kind = if name.starts_with("is") || name.starts_with("has") || name == "returnAll" {
        "boolean"
    } else if name == "limit" {
        "number"
    } else {
        "string"
    };
    let shown_count = rng.random_range(1..=operations.len());
    let shown_for: Vec<&str> = operations
        .choose_multiple(rng, shown_count)
        .copied()
        .collect();
    json!({
        "displayName": capitalize(name),
        "name": name,
        "type": kind,
        "required": rng.random_bool(0.3),
        "default": match kind {
            "boolean" => json!(false),
            "number" => json!(50),
            _ => json!(""),
        },
        "description": format!("The <code>{}</code> of the {}", name, resource),
        "displayOptions": {
            "show": { "resource": [resource], "operation": shown_for },
        },
    })
}

/// A `fixedCollection` whose nested fields carry their own visibility rules.
fn generate_collection(rng: &mut StdRng) -> Value {
    let hide_when = if rng.random_bool(0.5) { "getAll" } else { "delete" };
    json!({
        "displayName": "Additional Fields",
        "name": "additionalFields",
        "type": "fixedCollection",
        "default": {},
        "options": [{
            "displayName": "Headers",
            "name": "headers",
            "values": [
                { "displayName": "Header Name", "name": "headerName", "type": "string", "default": "" },
                {
                    "displayName": "Header Value",
                    "name": "headerValue",
                    "type": "string",
                    "default": "",
                    "displayOptions": { "hide": { "operation": [hide_when] } },
                },
            ],
        }],
    })
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

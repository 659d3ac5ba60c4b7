use annoscan_core::model::{EndpointCollection, EndpointRecord};
use annoscan_core::orchestrator::Orchestrator;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Method")]
    verbs: String,
    #[tabled(rename = "URI")]
    path: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    uses: String,
    #[tabled(rename = "Middleware")]
    middleware: String,
}

impl From<&EndpointRecord> for RouteRow {
    fn from(record: &EndpointRecord) -> Self {
        Self {
            verbs: record.verb_label(),
            path: match &record.domain {
                Some(domain) => format!("{}{}", domain, record.path),
                None => record.path.clone(),
            },
            name: record.name.clone().unwrap_or_default(),
            uses: record.uses.clone(),
            middleware: record.all_middleware().join(", "),
        }
    }
}

pub fn render_table(endpoints: &EndpointCollection) -> String {
    let rows: Vec<RouteRow> = endpoints.iter().map(RouteRow::from).collect();
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn run(orchestrator: &Orchestrator, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let endpoints = orchestrator.endpoints()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&endpoints)?);
    } else if endpoints.is_empty() {
        println!("No annotated routes found.");
    } else {
        println!("{}", render_table(&endpoints));
    }
    Ok(())
}

use itertools::Itertools;
use serde_json::json;
use std::io::Write;

use clap::Parser;
use rpsl_peering::models::{Direction, RouteObject};
use rpsl_peering::registry::{RegistryClient, RIPE_REST_URL};
use rpsl_peering::{ParserConfig, PolicyParser};

/// rpsl-peering is a simple cli tool that extracts the peerings of an autonomous system from
/// its RPSL routing policy.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// Path to a registry XML export, local or remote. Without it the aut-num is fetched from
    /// the registry.
    #[clap(name = "FILE")]
    file_path: Option<String>,

    /// Aut-num whose policy is analysed, e.g. AS3333
    #[clap(short, long)]
    autnum: Option<String>,

    /// Registry source to query
    #[clap(short, long, default_value = "RIPE")]
    source: String,

    /// Additional registry sources to query, can be repeated
    #[clap(long = "alt-source")]
    alt_sources: Vec<String>,

    /// Registry REST API base URL
    #[clap(long, default_value = RIPE_REST_URL)]
    url: String,

    /// Only analyse import/export rules
    #[clap(short = '4', long)]
    ipv4_only: bool,

    /// Only analyse mp-import/mp-export rules
    #[clap(short = '6', long)]
    ipv6_only: bool,

    /// Also analyse default/mp-default rules
    #[clap(long)]
    defaults: bool,

    /// Also list route objects, from FILE or fetched by origin
    #[clap(short, long)]
    routes: bool,

    /// Output as JSON objects
    #[clap(long)]
    json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,
}

fn exit_with(message: String) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let mut config = ParserConfig::default();
    match (opts.ipv4_only, opts.ipv6_only) {
        (true, true) => exit_with(
            "Error: --ipv4-only and --ipv6-only cannot be used together".to_string(),
        ),
        (true, false) => config = config.disable_ipv6(),
        (false, true) => config = config.disable_ipv4(),
        (false, false) => {}
    }
    if opts.defaults {
        config = config.enable_defaults();
    }

    let autnum = opts.autnum.clone().unwrap_or_default().to_uppercase();
    let client = RegistryClient::new(opts.url.as_str(), opts.source.as_str())
        .with_alternatives(opts.alt_sources.iter().cloned());

    let xml = match (&opts.file_path, autnum.is_empty()) {
        (Some(path), _) => match oneio::read_to_string(path) {
            Ok(content) => content,
            Err(e) => exit_with(format!("unable to read {}: {}", path, e)),
        },
        (None, false) => match client.policy_by_autnum(&autnum) {
            Some(reply) => String::from_utf8_lossy(&reply).to_string(),
            None => exit_with(format!("no policy received for {}", autnum)),
        },
        (None, true) => exit_with("Error: either FILE or --autnum is required".to_string()),
    };

    let mut parser = PolicyParser::with_config(autnum.as_str(), config);
    let summary = match parser.read_policy(&xml) {
        Ok(summary) => summary,
        Err(e) => exit_with(e.to_string()),
    };

    let routes: Vec<RouteObject> = match (opts.routes, &opts.file_path) {
        (false, _) => vec![],
        (true, Some(_)) => parser.extract_routes(&xml).unwrap_or_default(),
        (true, None) => client
            .routes_by_autnum(&autnum, config.ipv6)
            .and_then(|reply| parser.extract_routes(&String::from_utf8_lossy(&reply)).ok())
            .unwrap_or_default(),
    };

    let mut stdout = std::io::stdout();
    let output = if opts.json {
        let val = json!({
            "autnum": parser.autnum(),
            "summary": summary,
            "peers": parser.peerings(),
            "filters": parser.filters(),
            "routes": routes,
        });
        if opts.pretty {
            serde_json::to_string_pretty(&val).unwrap_or_default()
        } else {
            val.to_string()
        }
    } else {
        let mut lines = vec![format!(
            "{}: {} rules accepted, {} skipped for address family, {} failed",
            parser.autnum(),
            summary.accepted,
            summary.mismatched,
            summary.failed
        )];
        for peer in parser.peerings().iter() {
            lines.push(peer.identifier().to_string());
            for filter in peer.filters() {
                let text = parser.filters().get(&filter.fingerprint).unwrap_or_default();
                lines.push(format!("  filter {} {}", filter.fingerprint, text));
            }
            for point in peer.peering_points() {
                let addresses = match &point.addresses {
                    Some(pair) => pair.to_string(),
                    None => "-".to_string(),
                };
                lines.push(format!("  peering {}", addresses));
                for direction in [Direction::Import, Direction::Export] {
                    if let Some(actions) = point.actions(direction) {
                        lines.push(format!(
                            "    {} action {}",
                            direction,
                            actions.actions.iter().join("; ")
                        ));
                    }
                }
            }
        }
        lines.extend(routes.iter().map(|r| format!("route {}", r)));
        lines.join("\n")
    };

    if let Err(e) = writeln!(stdout, "{}", &output) {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}

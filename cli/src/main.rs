//! `httpclient [METHOD] <URL>`: send one GET or POST and print the reply.
//!
//! A thin wrapper around `httpclient_core` that handles argument parsing,
//! logger setup and output. The HTTP status never affects the exit code;
//! only a failed request (bad URL, unreachable host, malformed reply) exits
//! non-zero.

use std::process;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use httpclient_core::{ClientConfig, HttpClient, HttpResponse, ResolvePolicy};
use log::{debug, LevelFilter};

#[derive(Debug, Parser)]
#[command(name = "httpclient", version, about = "Raw-socket HTTP/1.1 GET/POST client")]
struct Cli {
    /// `<URL>` alone, or `<METHOD> <URL>`; only POST posts, any other method gets
    #[arg(value_name = "METHOD|URL")]
    first: Option<String>,

    #[arg(value_name = "URL")]
    second: Option<String>,

    /// Form field sent with POST, may be repeated
    #[arg(short, long = "data", value_name = "KEY=VALUE", value_parser = parse_pair)]
    data: Vec<(String, String)>,

    /// Connect and read deadline in seconds; 0 or unset waits forever
    #[arg(long, value_name = "SECS", env = "HTTPCLIENT_TIMEOUT")]
    timeout: Option<u64>,

    /// Resolve the host even when the URL has no explicit port
    #[arg(long)]
    resolve_always: bool,

    /// Print the response as JSON instead of raw text
    #[arg(long)]
    json: bool,

    /// Log level; overrides RUST_LOG when given
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

impl Cli {
    /// Split the positionals into (verb, url).
    fn target(&self) -> Option<(&str, &str)> {
        match (&self.first, &self.second) {
            (Some(verb), Some(url)) => Some((verb.as_str(), url.as_str())),
            (Some(url), None) => Some(("GET", url.as_str())),
            _ => None,
        }
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(secs) = self.timeout.filter(|&s| s > 0) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if self.resolve_always {
            config = config.with_resolve_policy(ResolvePolicy::Always);
        }
        config
    }
}

fn parse_pair(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got `{s}`"))?;
    Ok((key.to_string(), value.to_string()))
}

fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn render(response: &HttpResponse, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(response).context("failed to serialize response")
    } else {
        Ok(response.to_string())
    }
}

fn run(cli: &Cli, verb: &str, url: &str) -> Result<String> {
    let client = HttpClient::new(cli.client_config());
    let args = (!cli.data.is_empty()).then_some(cli.data.as_slice());
    debug!("config: {:?}", client.config());

    let response = client
        .command(url, verb, args)
        .with_context(|| format!("{verb} {url} failed"))?;
    render(&response, cli.json)
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let Some((verb, url)) = cli.target() else {
        let _ = Cli::command().print_help();
        process::exit(1);
    };

    match run(&cli, verb, url) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("httpclient error: {e:#}");
            process::exit(1);
        }
    }
}

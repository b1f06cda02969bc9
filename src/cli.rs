use crate::config::{load_settings, Platform};
use crate::console::{
    run_operation, AdminOp, ConnectionSpec, ConsoleConfig, Family, ParamValue, Verb,
};
use std::path::Path;

/// Diagnostic command-line adapter. Runs one operation and prints the JSON
/// envelope; credentials come from the environment so they never land in
/// shell history.
pub fn run(args: Vec<String>) -> Result<String, String> {
    if args.len() < 4 {
        return Err(usage());
    }
    let settings = load_settings(Path::new(&args[0])).map_err(|err| err.to_string())?;
    let conn = parse_connection(&args[1])?;
    let family = Family::parse(&args[2])?;
    let verb = Verb::parse(&args[3])?;

    let mut op = AdminOp::new(family, verb);
    for pair in &args[4..] {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{pair}`"))?;
        match key {
            "cluster" => op = op.with_cluster(value),
            "entity" => op = op.with_entity(value),
            _ => op = op.with_param(key, parse_value(value)),
        }
    }

    let config =
        ConsoleConfig::from_settings(&settings, Platform::current()).map_err(|err| err.to_string())?;
    let envelope = run_operation(&config, &conn, &op);
    serde_json::to_string_pretty(&envelope).map_err(|err| err.to_string())
}

fn usage() -> String {
    [
        "usage: farmgate <settings.yaml> <host:port> <family> <verb> [key=value ...]",
        "",
        "families: cluster, server, process, session, infobase, rule,",
        "          cluster-admin, agent-admin",
        "verbs:    list, info, insert, update, remove, terminate, register, apply",
        "",
        "selectors: cluster=<id> entity=<id>",
        "credentials are read from FARMGATE_CLUSTER_USER, FARMGATE_CLUSTER_PWD,",
        "FARMGATE_AGENT_USER and FARMGATE_AGENT_PWD",
    ]
    .join("\n")
}

fn parse_connection(raw: &str) -> Result<ConnectionSpec, String> {
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected host:port, got `{raw}`"))?;
    let port: u16 = port
        .parse()
        .map_err(|_| format!("invalid port in `{raw}`"))?;
    let mut conn = ConnectionSpec::new(host, port);
    conn.cluster_user = env_credential("FARMGATE_CLUSTER_USER");
    conn.cluster_pwd = env_credential("FARMGATE_CLUSTER_PWD");
    conn.agent_user = env_credential("FARMGATE_AGENT_USER");
    conn.agent_pwd = env_credential("FARMGATE_AGENT_PWD");
    Ok(conn)
}

fn env_credential(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_value(raw: &str) -> ParamValue {
    match raw {
        "true" => ParamValue::Toggle(true),
        "false" => ParamValue::Toggle(false),
        _ => raw
            .parse::<i64>()
            .map(ParamValue::Number)
            .unwrap_or_else(|_| ParamValue::text(raw)),
    }
}

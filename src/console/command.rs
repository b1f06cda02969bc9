use crate::console::params::{self, ParamSpec, ParamValue, ValueKind};
use crate::console::{ConnectionSpec, Family, Verb};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One administrative operation to run against the tool: family, verb, the
/// cluster/entity selectors and the logical parameter map. Everything is
/// assembled into the final argument vector by [`build_args`].
#[derive(Debug, Clone)]
pub struct AdminOp {
    pub family: Family,
    pub verb: Verb,
    pub cluster: Option<String>,
    pub entity: Option<String>,
    pub params: BTreeMap<String, ParamValue>,
}

impl AdminOp {
    pub fn new(family: Family, verb: Verb) -> Self {
        Self {
            family,
            verb,
            cluster: None,
            entity: None,
            params: BTreeMap::new(),
        }
    }

    pub fn with_cluster(mut self, id: impl Into<String>) -> Self {
        self.cluster = Some(id.into());
        self
    }

    pub fn with_entity(mut self, id: impl Into<String>) -> Self {
        self.entity = Some(id.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }
}

/// Assemble the ordered argument vector for one operation.
///
/// The tool is order-sensitive. The connection string is the trailing
/// positional argument for every operation except cluster registration,
/// where the agent credentials and the connection string precede the
/// subcommand tokens. Cluster credentials must directly follow the
/// `--cluster=` selector, and the cluster-list operation accepts no cluster
/// credentials at all.
pub fn build_args(op: &AdminOp, conn: &ConnectionSpec) -> Vec<String> {
    let mut args = Vec::new();

    if op.family == Family::Cluster && op.verb == Verb::Insert {
        push_agent_auth(&mut args, conn);
        args.push(conn.address());
        push_subcommand(&mut args, op);
        push_params(&mut args, op);
        return args;
    }

    push_subcommand(&mut args, op);
    if let Some(cluster) = &op.cluster {
        args.push(format!("--cluster={cluster}"));
        if cluster_auth_accepted(op) {
            push_cluster_auth(&mut args, conn);
        }
    }
    if let (Some(flag), Some(entity)) = (op.family.entity_flag(), &op.entity) {
        push_value(&mut args, flag, entity);
    }
    push_params(&mut args, op);
    push_agent_auth(&mut args, conn);
    args.push(conn.address());
    args
}

/// Copy of the vector safe for logging: credential values replaced by a
/// mask. The unmasked vector may only ever reach the trace tier.
pub fn masked_args(args: &[String]) -> Vec<String> {
    const SECRET_FLAGS: &[&str] = &["--cluster-pwd", "--agent-pwd", "--pwd", "--db-pwd"];

    let mut masked = Vec::with_capacity(args.len());
    let mut mask_next = false;
    for token in args {
        if mask_next {
            masked.push("***".to_string());
            mask_next = false;
            continue;
        }
        if let Some((flag, _)) = token.split_once('=') {
            if SECRET_FLAGS.contains(&flag) {
                masked.push(format!("{flag}=***"));
                continue;
            }
        } else if SECRET_FLAGS.contains(&token.as_str()) {
            masked.push(token.clone());
            mask_next = true;
            continue;
        }
        masked.push(token.clone());
    }
    masked
}

fn cluster_auth_accepted(op: &AdminOp) -> bool {
    !(op.family == Family::Cluster && op.verb == Verb::List)
}

fn push_subcommand(args: &mut Vec<String>, op: &AdminOp) {
    for token in op.family.tokens() {
        args.push((*token).to_string());
    }
    for token in verb_tokens(op.family, op.verb) {
        args.push((*token).to_string());
    }
}

fn verb_tokens(family: Family, verb: Verb) -> &'static [&'static str] {
    match (family, verb) {
        (Family::Infobase, Verb::List) => &["summary", "list"],
        (Family::Infobase, Verb::Insert) => &["create"],
        (Family::Infobase, Verb::Remove) => &["drop"],
        (_, Verb::List) => &["list"],
        (_, Verb::Info) => &["info"],
        (_, Verb::Insert) => &["insert"],
        (_, Verb::Update) => &["update"],
        (_, Verb::Remove) => &["remove"],
        (_, Verb::Terminate) => &["terminate"],
        (_, Verb::Register) => &["register"],
        (_, Verb::Apply) => &["apply"],
    }
}

fn push_cluster_auth(args: &mut Vec<String>, conn: &ConnectionSpec) {
    if let Some(user) = &conn.cluster_user {
        push_value(args, "--cluster-user", user);
    }
    if let Some(pwd) = &conn.cluster_pwd {
        push_value(args, "--cluster-pwd", pwd);
    }
}

fn push_agent_auth(args: &mut Vec<String>, conn: &ConnectionSpec) {
    if let Some(user) = &conn.agent_user {
        push_value(args, "--agent-user", user);
    }
    if let Some(pwd) = &conn.agent_pwd {
        push_value(args, "--agent-pwd", pwd);
    }
}

fn push_params(args: &mut Vec<String>, op: &AdminOp) {
    let table = params::table(op.family, op.verb);
    for (name, value) in &op.params {
        match table.iter().find(|spec| spec.name == name.as_str()) {
            Some(spec) => push_known(args, spec, value),
            None => push_unknown(args, name, value),
        }
    }
}

fn push_known(args: &mut Vec<String>, spec: &ParamSpec, value: &ParamValue) {
    match spec.kind {
        ValueKind::Text | ValueKind::Number => {
            push_value(args, spec.flag, &value.render());
        }
        ValueKind::Toggle(words) => {
            let rendered = match value {
                ParamValue::Toggle(v) => words.render(*v).to_string(),
                other => other.render(),
            };
            args.push(format!("{}={rendered}", spec.flag));
        }
        ValueKind::ClearableText => {
            let text = value.render();
            if text.is_empty() {
                args.push(format!("{}=", spec.flag));
            } else {
                push_value(args, spec.flag, &text);
            }
        }
        ValueKind::ClearableDateTime => {
            let text = value.render();
            if text.is_empty() {
                args.push(format!("{}=", spec.flag));
            } else if let Some(normalized) = normalize_datetime(&text) {
                args.push(format!("{}={normalized}", spec.flag));
            } else {
                warn!(flag = spec.flag, value = %text, "dropping malformed date/time parameter");
            }
        }
        ValueKind::Bare => {
            if matches!(value, ParamValue::Toggle(true)) {
                args.push(spec.flag.to_string());
            }
        }
    }
}

/// Keys outside the table are dropped unless they already look like a tool
/// flag or carry the flag word separator, in which case they pass through.
fn push_unknown(args: &mut Vec<String>, name: &str, value: &ParamValue) {
    let flag = if name.starts_with("--") {
        name.to_string()
    } else if name.contains('-') {
        format!("--{name}")
    } else {
        debug!(param = name, "ignoring unknown parameter");
        return;
    };
    push_value(args, &flag, &value.render());
}

/// Values with embedded whitespace go out as two vector elements so the
/// tool does not mis-tokenize them; everything else uses the `=` form.
fn push_value(args: &mut Vec<String>, flag: &str, value: &str) {
    if value.chars().any(char::is_whitespace) {
        args.push(flag.to_string());
        args.push(value.to_string());
    } else {
        args.push(format!("{flag}={value}"));
    }
}

/// Normalize a date/time literal to `YYYY-MM-DDTHH:MM:SS`. Missing seconds
/// default to `:00`; anything else is rejected.
fn normalize_datetime(raw: &str) -> Option<String> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    let trimmed = raw.trim();
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.format("%Y-%m-%dT%H:%M:%S").to_string());
        }
    }
    None
}

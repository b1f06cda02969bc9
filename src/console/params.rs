//! Closed parameter tables for every administrative operation.
//!
//! The tool's flag vocabulary is irregular: some boolean flags speak
//! `yes`/`no`, others `on`/`off`, some fields can be explicitly cleared and
//! some cannot. Each (family, verb) pair therefore carries a fixed table
//! describing its accepted logical parameters; nothing is inferred from the
//! parameter name at build time.

use crate::console::{Family, Verb};

/// A caller-supplied parameter value. Clearing a clearable field is
/// expressed as `Text("")`; leaving it unchanged as an absent key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Number(i64),
    Toggle(bool),
}

impl ParamValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Literal form used for flag assembly when no vocabulary applies.
    pub fn render(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => value.to_string(),
            Self::Toggle(value) => if *value { "yes" } else { "no" }.to_string(),
        }
    }
}

/// Boolean vocabulary of one flag, fixed per parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleWords {
    YesNo,
    OnOff,
}

impl ToggleWords {
    pub fn render(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::YesNo, true) => "yes",
            (Self::YesNo, false) => "no",
            (Self::OnOff, true) => "on",
            (Self::OnOff, false) => "off",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    Toggle(ToggleWords),
    /// Free-text field with an explicit erase form (`--flag=`).
    ClearableText,
    /// Date/time bound with an explicit erase form; values are normalized
    /// to `YYYY-MM-DDTHH:MM:SS` before emission.
    ClearableDateTime,
    /// Flag emitted bare, with no value, when toggled on.
    Bare,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub flag: &'static str,
    pub kind: ValueKind,
}

const fn p(name: &'static str, flag: &'static str, kind: ValueKind) -> ParamSpec {
    ParamSpec { name, flag, kind }
}

const EMPTY: &[ParamSpec] = &[];

const CLUSTER_SETTINGS: &[ParamSpec] = &[
    p("name", "--name", ValueKind::Text),
    p("expiration-timeout", "--expiration-timeout", ValueKind::Number),
    p("lifetime-limit", "--lifetime-limit", ValueKind::Number),
    p("max-memory-size", "--max-memory-size", ValueKind::Number),
    p("max-memory-time-limit", "--max-memory-time-limit", ValueKind::Number),
    p("errors-count-threshold", "--errors-count-threshold", ValueKind::Number),
    p("security-level", "--security-level", ValueKind::Number),
    p(
        "session-fault-tolerance-level",
        "--session-fault-tolerance-level",
        ValueKind::Number,
    ),
    p("load-balancing-mode", "--load-balancing-mode", ValueKind::Text),
    p(
        "kill-problem-processes",
        "--kill-problem-processes",
        ValueKind::Toggle(ToggleWords::YesNo),
    ),
    p(
        "allow-license-distribution",
        "--allow-license-distribution",
        ValueKind::Toggle(ToggleWords::YesNo),
    ),
];

const SERVER_SETTINGS: &[ParamSpec] = &[
    p("agent-host", "--agent-host", ValueKind::Text),
    p("agent-port", "--agent-port", ValueKind::Number),
    p("port-range", "--port-range", ValueKind::Text),
    p("name", "--name", ValueKind::Text),
    p("using", "--using", ValueKind::Text),
    p("dedicate-managers", "--dedicate-managers", ValueKind::Text),
    p("infobases-limit", "--infobases-limit", ValueKind::Number),
    p("memory-limit", "--memory-limit", ValueKind::Number),
    p("connections-limit", "--connections-limit", ValueKind::Number),
    p("cluster-port", "--cluster-port", ValueKind::Number),
    p(
        "safe-working-processes-memory-limit",
        "--safe-working-processes-memory-limit",
        ValueKind::Number,
    ),
    p("safe-call-memory-limit", "--safe-call-memory-limit", ValueKind::Number),
];

const PROCESS_FILTERS: &[ParamSpec] = &[
    p("server", "--server", ValueKind::Text),
    p("licenses", "--licenses", ValueKind::Toggle(ToggleWords::OnOff)),
];

const SESSION_FILTERS: &[ParamSpec] = &[
    p("infobase", "--infobase", ValueKind::Text),
    p("licenses", "--licenses", ValueKind::Toggle(ToggleWords::OnOff)),
];

const SESSION_TERMINATE: &[ParamSpec] =
    &[p("error-message", "--error-message", ValueKind::ClearableText)];

const INFOBASE_SETTINGS: &[ParamSpec] = &[
    p("name", "--name", ValueKind::Text),
    p("dbms", "--dbms", ValueKind::Text),
    p("db-server", "--db-server", ValueKind::Text),
    p("db-name", "--db-name", ValueKind::Text),
    p("db-user", "--db-user", ValueKind::Text),
    p("db-pwd", "--db-pwd", ValueKind::Text),
    p("locale", "--locale", ValueKind::Text),
    p("descr", "--descr", ValueKind::ClearableText),
    p("denied-from", "--denied-from", ValueKind::ClearableDateTime),
    p("denied-to", "--denied-to", ValueKind::ClearableDateTime),
    p("denied-message", "--denied-message", ValueKind::ClearableText),
    p("permission-code", "--permission-code", ValueKind::ClearableText),
    p(
        "sessions-deny",
        "--sessions-deny",
        ValueKind::Toggle(ToggleWords::YesNo),
    ),
    p(
        "scheduled-jobs-deny",
        "--scheduled-jobs-deny",
        ValueKind::Toggle(ToggleWords::YesNo),
    ),
    p(
        "license-distribution",
        "--license-distribution",
        ValueKind::Toggle(ToggleWords::OnOff),
    ),
    p(
        "external-session-manager-required",
        "--external-session-manager-required",
        ValueKind::Toggle(ToggleWords::OnOff),
    ),
    p("security-profile-name", "--security-profile-name", ValueKind::Text),
    p(
        "safe-mode-security-profile-name",
        "--safe-mode-security-profile-name",
        ValueKind::Text,
    ),
];

const INFOBASE_DROP: &[ParamSpec] = &[
    p("drop-database", "--drop-database", ValueKind::Toggle(ToggleWords::YesNo)),
    p("clear-database", "--clear-database", ValueKind::Toggle(ToggleWords::YesNo)),
];

const RULE_SETTINGS: &[ParamSpec] = &[
    p("position", "--position", ValueKind::Number),
    p("object-type", "--object-type", ValueKind::Number),
    p("infobase-name", "--infobase-name", ValueKind::Text),
    p("rule-type", "--rule-type", ValueKind::Number),
    p("application-ext", "--application-ext", ValueKind::Text),
    p("priority", "--priority", ValueKind::Number),
];

const RULE_APPLY: &[ParamSpec] = &[
    p("full", "--full", ValueKind::Bare),
    p("partial", "--partial", ValueKind::Bare),
];

const ADMIN_REGISTER: &[ParamSpec] = &[
    p("name", "--name", ValueKind::Text),
    p("pwd", "--pwd", ValueKind::Text),
    p("auth", "--auth", ValueKind::Text),
    p("os-user", "--os-user", ValueKind::Text),
    p("descr", "--descr", ValueKind::ClearableText),
];

pub fn table(family: Family, verb: Verb) -> &'static [ParamSpec] {
    match (family, verb) {
        (Family::Cluster, Verb::Insert | Verb::Update) => CLUSTER_SETTINGS,
        (Family::Server, Verb::Insert | Verb::Update) => SERVER_SETTINGS,
        (Family::Process, Verb::List) => PROCESS_FILTERS,
        (Family::Session, Verb::List) => SESSION_FILTERS,
        (Family::Session, Verb::Terminate) => SESSION_TERMINATE,
        (Family::Infobase, Verb::Insert | Verb::Update) => INFOBASE_SETTINGS,
        (Family::Infobase, Verb::Remove) => INFOBASE_DROP,
        (Family::Rule, Verb::Insert | Verb::Update) => RULE_SETTINGS,
        (Family::Rule, Verb::Apply) => RULE_APPLY,
        (Family::ClusterAdmin | Family::AgentAdmin, Verb::Register) => ADMIN_REGISTER,
        _ => EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_vocabularies_render_their_own_words() {
        assert_eq!(ToggleWords::YesNo.render(true), "yes");
        assert_eq!(ToggleWords::YesNo.render(false), "no");
        assert_eq!(ToggleWords::OnOff.render(true), "on");
        assert_eq!(ToggleWords::OnOff.render(false), "off");
    }

    #[test]
    fn deny_toggles_speak_yes_no_and_feature_toggles_on_off() {
        let table = table(Family::Infobase, Verb::Update);
        let kind_of = |name: &str| {
            table
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.kind)
                .expect("parameter present")
        };
        assert_eq!(kind_of("sessions-deny"), ValueKind::Toggle(ToggleWords::YesNo));
        assert_eq!(
            kind_of("scheduled-jobs-deny"),
            ValueKind::Toggle(ToggleWords::YesNo)
        );
        assert_eq!(
            kind_of("license-distribution"),
            ValueKind::Toggle(ToggleWords::OnOff)
        );
    }

    #[test]
    fn list_verbs_without_filters_have_empty_tables() {
        assert!(table(Family::Cluster, Verb::List).is_empty());
        assert!(table(Family::Server, Verb::List).is_empty());
        assert!(table(Family::ClusterAdmin, Verb::List).is_empty());
    }

    #[test]
    fn insert_and_update_share_the_settings_table() {
        assert_eq!(
            table(Family::Cluster, Verb::Insert).len(),
            table(Family::Cluster, Verb::Update).len()
        );
    }
}

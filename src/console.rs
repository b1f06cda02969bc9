use serde::Serialize;

pub mod command;
pub mod ops;
pub mod params;
pub mod records;
pub mod runner;

pub use command::{build_args, masked_args, AdminOp};
pub use ops::{run_operation, ConsoleConfig};
pub use params::{ParamValue, ToggleWords, ValueKind};
pub use records::{parse_records, parse_single, ParsedRecord};
pub use runner::{execute_tool, ExecutionOutput, TIMEOUT_MESSAGE};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("failed to launch administration tool `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for administration tool `{tool}`: {source}")]
    Wait {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// One remote agent endpoint plus the two optional authentication
/// identities the tool accepts. Owned by the calling layer; the core only
/// borrows it for the duration of a single operation.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSpec {
    pub host: String,
    pub port: u16,
    pub cluster_user: Option<String>,
    pub cluster_pwd: Option<String>,
    pub agent_user: Option<String>,
    pub agent_pwd: Option<String>,
}

impl ConnectionSpec {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Operation family understood by the administration tool. Admin families
/// expand to two subcommand tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Cluster,
    Server,
    Process,
    Session,
    Infobase,
    Rule,
    ClusterAdmin,
    AgentAdmin,
}

impl Family {
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            Self::Cluster => &["cluster"],
            Self::Server => &["server"],
            Self::Process => &["process"],
            Self::Session => &["session"],
            Self::Infobase => &["infobase"],
            Self::Rule => &["rule"],
            Self::ClusterAdmin => &["cluster", "admin"],
            Self::AgentAdmin => &["agent", "admin"],
        }
    }

    /// Key that opens a new record in this family's list/info output.
    pub fn introducer(self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Server => "server",
            Self::Process => "process",
            Self::Session => "session",
            Self::Infobase => "infobase",
            Self::Rule => "rule",
            Self::ClusterAdmin | Self::AgentAdmin => "name",
        }
    }

    /// Selector flag for addressing one entity of the family. Cluster-level
    /// operations address the cluster through `--cluster` itself.
    pub fn entity_flag(self) -> Option<&'static str> {
        match self {
            Self::Cluster => None,
            Self::Server => Some("--server"),
            Self::Process => Some("--process"),
            Self::Session => Some("--session"),
            Self::Infobase => Some("--infobase"),
            Self::Rule => Some("--rule"),
            Self::ClusterAdmin | Self::AgentAdmin => Some("--name"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Server => "server",
            Self::Process => "process",
            Self::Session => "session",
            Self::Infobase => "infobase",
            Self::Rule => "rule",
            Self::ClusterAdmin => "cluster-admin",
            Self::AgentAdmin => "agent-admin",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cluster" => Ok(Self::Cluster),
            "server" => Ok(Self::Server),
            "process" => Ok(Self::Process),
            "session" => Ok(Self::Session),
            "infobase" => Ok(Self::Infobase),
            "rule" => Ok(Self::Rule),
            "cluster-admin" => Ok(Self::ClusterAdmin),
            "agent-admin" => Ok(Self::AgentAdmin),
            _ => Err(format!("unknown operation family `{raw}`")),
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Info,
    Insert,
    Update,
    Remove,
    Terminate,
    Register,
    Apply,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Info => "info",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Terminate => "terminate",
            Self::Register => "register",
            Self::Apply => "apply",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "info" => Ok(Self::Info),
            "insert" | "create" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "remove" | "drop" => Ok(Self::Remove),
            "terminate" => Ok(Self::Terminate),
            "register" => Ok(Self::Register),
            "apply" => Ok(Self::Apply),
            _ => Err(format!("unknown operation verb `{raw}`")),
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The uniform wrapper every operation returns. Success carries the raw
/// decoded output and, for list/info operations, the parsed records;
/// failure carries a best-effort UTF-8 message and nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<ParsedRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            records: None,
            error: None,
        }
    }

    pub fn ok_with_records(output: impl Into<String>, records: Vec<ParsedRecord>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            records: Some(records),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            records: None,
            error: Some(error.into()),
        }
    }
}

use farmgate::console::{build_args, masked_args, AdminOp, ConnectionSpec, Family, ParamValue, Verb};

fn full_conn() -> ConnectionSpec {
    ConnectionSpec {
        host: "farm-agent".to_string(),
        port: 1545,
        cluster_user: Some("cadmin".to_string()),
        cluster_pwd: Some("csecret".to_string()),
        agent_user: Some("agent".to_string()),
        agent_pwd: Some("asecret".to_string()),
    }
}

#[test]
fn every_update_style_vector_pins_cluster_auth_after_the_selector() {
    for family in [
        Family::Server,
        Family::Process,
        Family::Session,
        Family::Infobase,
        Family::Rule,
        Family::ClusterAdmin,
    ] {
        let op = AdminOp::new(family, Verb::List).with_cluster("c-9");
        let args = build_args(&op, &full_conn());
        let selector = args
            .iter()
            .position(|a| a == "--cluster=c-9")
            .expect("cluster selector");
        assert_eq!(args[selector + 1], "--cluster-user=cadmin", "family {family}");
        assert_eq!(args[selector + 2], "--cluster-pwd=csecret", "family {family}");
    }
}

#[test]
fn cluster_list_rejects_cluster_credentials_entirely() {
    let op = AdminOp::new(Family::Cluster, Verb::List);
    let args = build_args(&op, &full_conn());
    assert!(args.iter().all(|a| !a.contains("cluster-user")));
    assert!(args.iter().all(|a| !a.contains("cluster-pwd")));
}

#[test]
fn connection_string_trails_everything_but_cluster_insert() {
    for (family, verb) in [
        (Family::Cluster, Verb::List),
        (Family::Cluster, Verb::Update),
        (Family::Server, Verb::Info),
        (Family::Infobase, Verb::Remove),
        (Family::Session, Verb::Terminate),
        (Family::AgentAdmin, Verb::Register),
    ] {
        let op = AdminOp::new(family, verb).with_cluster("c-1").with_entity("e-1");
        let args = build_args(&op, &full_conn());
        assert_eq!(args.last().map(String::as_str), Some("farm-agent:1545"));
    }

    let insert = AdminOp::new(Family::Cluster, Verb::Insert);
    let args = build_args(&insert, &full_conn());
    assert_eq!(args[0], "--agent-user=agent");
    assert_eq!(args[1], "--agent-pwd=asecret");
    assert_eq!(args[2], "farm-agent:1545");
    assert_eq!(&args[3..5], &["cluster", "insert"]);
}

#[test]
fn admin_families_expand_to_two_tokens() {
    let cluster_admin = AdminOp::new(Family::ClusterAdmin, Verb::List).with_cluster("c-1");
    let args = build_args(&cluster_admin, &ConnectionSpec::new("h", 1545));
    assert_eq!(&args[..3], &["cluster", "admin", "list"]);

    let agent_admin = AdminOp::new(Family::AgentAdmin, Verb::Register)
        .with_param("name", ParamValue::text("root"))
        .with_param("pwd", ParamValue::text("secret"));
    let args = build_args(&agent_admin, &ConnectionSpec::new("h", 1545));
    assert_eq!(&args[..3], &["agent", "admin", "register"]);
    assert!(args.contains(&"--name=root".to_string()));
    assert!(args.contains(&"--pwd=secret".to_string()));
}

#[test]
fn clearing_and_omission_are_distinct_vector_shapes() {
    let base = || {
        AdminOp::new(Family::Infobase, Verb::Update)
            .with_cluster("c-1")
            .with_entity("ib-1")
    };
    let conn = ConnectionSpec::new("h", 1545);

    let cleared = base()
        .with_param("descr", ParamValue::text(""))
        .with_param("denied-from", ParamValue::text(""));
    let args = build_args(&cleared, &conn);
    assert!(args.contains(&"--descr=".to_string()));
    assert!(args.contains(&"--denied-from=".to_string()));

    let args = build_args(&base(), &conn);
    assert!(args.iter().all(|a| !a.starts_with("--descr")));
    assert!(args.iter().all(|a| !a.starts_with("--denied-from")));
}

#[test]
fn masked_vector_never_leaks_secrets() {
    let op = AdminOp::new(Family::Infobase, Verb::Update)
        .with_cluster("c-1")
        .with_param("db-pwd", ParamValue::text("dbsecret"));
    let args = build_args(&op, &full_conn());
    let masked = masked_args(&args);
    for secret in ["csecret", "asecret", "dbsecret"] {
        assert!(
            masked.iter().all(|a| !a.contains(secret)),
            "secret `{secret}` leaked into {masked:?}"
        );
    }
    assert!(masked.contains(&"--cluster-pwd=***".to_string()));
    assert!(masked.contains(&"--agent-pwd=***".to_string()));
    assert!(masked.contains(&"--db-pwd=***".to_string()));
}

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{tempdir, NamedTempFile};

use fwdgen::config::{Config, OutputSpec};
use fwdgen::config_loader::{apply_overrides, load_config, RoutesCliOverrides};
use fwdgen::ip::{load_address_table, IpFormat};
use fwdgen::orchestrator::{generate_routes, write_generated};
use fwdgen::routing::{
    generate_forwarding_table, resolve, write_forwarding_table, AddressResolution, ForwardingOptions,
    RouteSkip,
};
use fwdgen::topology::{full_mesh, load_topology, mesh_2d};

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn config_for(dir: &Path, topology: &str, addresses: &str) -> Config {
    let mut config = Config::default();
    config.inputs.topology = write_file(dir, "topo.txt", topology);
    config.inputs.addresses = write_file(dir, "ports.txt", addresses);
    config.outputs = vec![
        OutputSpec::new(dir.join("updates.txt"), IpFormat::Integer),
        OutputSpec::new(dir.join("updatesIP.txt"), IpFormat::Dotted),
    ];
    config
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_two_node_network() {
    let dir = tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "node1 Ethernet0/1 node2 Ethernet0/1\nnode2 Ethernet0/1 node1 Ethernet0/1\n",
        "node1,Ethernet0/1,10.1.1.1\nnode2,Ethernet0/1,10.2.1.1\n",
    );

    let report = generate_routes(&config).unwrap();
    assert_eq!(report.nodes, 2);
    assert_eq!(report.host_routes, 2);

    assert_eq!(
        lines(&dir.path().join("updatesIP.txt")),
        vec![
            "+ fwd node1 0 8 self 8",
            "+ fwd node1 10.2.1.1 32 Ethernet0/1 8",
            "+ fwd node2 0 8 self 8",
            "+ fwd node2 10.1.1.1 32 Ethernet0/1 8",
        ]
    );
    assert_eq!(
        lines(&dir.path().join("updates.txt")),
        vec![
            "+ fwd node1 0 8 self 8",
            "+ fwd node1 167903489 32 Ethernet0/1 8",
            "+ fwd node2 0 8 self 8",
            "+ fwd node2 167837953 32 Ethernet0/1 8",
        ]
    );
}

#[test]
fn test_chain_inherits_first_hop() {
    let dir = tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "a e1 b e1\nb e1 a e1\nb e2 c e1\nc e1 b e2\n",
        "a,e1,10.0.0.1\nb,e1,10.0.0.2\nb,e2,10.0.1.2\nc,e1,10.0.1.3\n",
    );

    generate_routes(&config).unwrap();

    let dotted = lines(&dir.path().join("updatesIP.txt"));
    assert!(dotted.contains(&"+ fwd a 10.0.0.2 32 e1 8".to_string()));
    // c is two hops away, still leaves through a's only interface
    assert!(dotted.contains(&"+ fwd a 10.0.1.3 32 e1 16".to_string()));
    // a is reached through b's e1, so a's e1 address is used
    assert!(dotted.contains(&"+ fwd c 10.0.0.1 32 e1 16".to_string()));
    assert!(dotted.contains(&"+ fwd b 10.0.1.3 32 e2 8".to_string()));
    assert_eq!(dotted.len(), 3 + 6);
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempdir().unwrap();
    let topo = dir.path().join("topo.txt");
    let ports = dir.path().join("ports.txt");
    assert!(write_generated(mesh_2d(3, 4), &topo, &ports).unwrap());

    let mut config = Config::default();
    config.inputs.topology = topo;
    config.inputs.addresses = ports;
    config.outputs = vec![OutputSpec::new(dir.path().join("updates.txt"), IpFormat::Integer)];

    generate_routes(&config).unwrap();
    let first = fs::read(dir.path().join("updates.txt")).unwrap();

    config.forwarding.threads = 1;
    generate_routes(&config).unwrap();
    let second = fs::read(dir.path().join("updates.txt")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_address_skips_only_that_route() {
    let dir = tempdir().unwrap();
    let topo = write_file(
        dir.path(),
        "topo.txt",
        "a e1 b e1\nb e1 a e1\nb e2 c e1\nc e1 b e2\n",
    );
    let ports = write_file(dir.path(), "ports.txt", "a,e1,10.0.0.1\nb,e1,10.0.0.2\nb,e2,10.0.1.2\n");

    let topology = load_topology(&topo).unwrap().value;
    let addresses = load_address_table(&ports).unwrap().value;
    let table = generate_forwarding_table(&topology, &addresses, &ForwardingOptions::default()).unwrap();

    assert_eq!(table.local_route_count(), 3);
    assert!(table
        .skipped()
        .iter()
        .all(|skip| matches!(skip, RouteSkip::MissingAddress { dst, .. } if dst == "c")));
    assert_eq!(table.skipped().len(), 2);
    // c still gets routes to a and b
    assert_eq!(table.entries_for("c").count(), 3);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let config = config_for(
        dir.path(),
        "node1 Ethernet0/1 node2 Ethernet0/1\nthis line is broken badly\n\nnode2 Ethernet0/1 node1 Ethernet0/1\n",
        "node1,Ethernet0/1,10.1.1.1\nnode2,Ethernet0/1\nnode2,Ethernet0/1,10.2.1.1\n",
    );

    let report = generate_routes(&config).unwrap();
    assert_eq!(report.skipped_topology_lines, 1);
    assert_eq!(report.skipped_address_lines, 1);
    assert_eq!(report.host_routes, 2);
}

#[test]
fn test_grid_diameter_is_two() {
    let generated = mesh_2d(4, 4).unwrap();
    let topology = generated.to_topology();

    for source in topology.nodes() {
        let paths = resolve(&topology, source);
        assert_eq!(paths.reachable_count(), 15);
        for (_, path) in paths.iter() {
            assert!(path.hop_count >= 1 && path.hop_count <= 2);
        }
    }
}

#[test]
fn test_full_mesh_all_interfaces() {
    let dir = tempdir().unwrap();
    let topo = dir.path().join("topo.txt");
    let ports = dir.path().join("ports.txt");
    write_generated(full_mesh(4), &topo, &ports).unwrap();

    let mut config = Config::default();
    config.inputs.topology = topo;
    config.inputs.addresses = ports;
    config.outputs = vec![OutputSpec::new(dir.path().join("updatesIP.txt"), IpFormat::Dotted)];
    config.forwarding.resolution = AddressResolution::AllInterfaces;
    config.forwarding.metric_scale = 1;

    let report = generate_routes(&config).unwrap();
    // Every node has 3 interfaces; each source routes to 3 destinations.
    assert_eq!(report.host_routes, 4 * 3 * 3);
    assert_eq!(report.total_skipped_routes(), 0);

    let dotted = lines(&dir.path().join("updatesIP.txt"));
    assert!(dotted.contains(&"+ fwd node1 10.2.3.1 32 Ethernet0/1 1".to_string()));
}

#[test]
fn test_config_file_run() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "topo.txt", "x p1 y p1\ny p1 x p1\n");
    write_file(dir.path(), "ports.txt", "x,p1,192.168.0.1\ny,p1,192.168.0.2\n");

    let yaml = format!(
        r#"
general:
  log_level: warn
inputs:
  topology: "{dir}/topo.txt"
  addresses: "{dir}/ports.txt"
forwarding:
  metric_scale: 1
  threads: 1
outputs:
  - path: "{dir}/updatesIP.txt"
    ip_format: dotted
report: "{dir}/report.json"
"#,
        dir = dir.path().display()
    );
    let mut config_file = NamedTempFile::new().unwrap();
    write!(config_file, "{}", yaml).unwrap();

    let config = load_config(config_file.path()).unwrap();
    let report = generate_routes(&config).unwrap();

    assert_eq!(report.metric_scale, 1);
    assert_eq!(
        lines(&dir.path().join("updatesIP.txt")),
        vec![
            "+ fwd x 0 8 self 8",
            "+ fwd x 192.168.0.2 32 p1 1",
            "+ fwd y 0 8 self 8",
            "+ fwd y 192.168.0.1 32 p1 1",
        ]
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(json["host_routes"], 2);
}

#[test]
fn test_cli_overrides_retarget_outputs() {
    let dir = tempdir().unwrap();
    let mut config = config_for(
        dir.path(),
        "node1 Ethernet0/1 node2 Ethernet0/1\nnode2 Ethernet0/1 node1 Ethernet0/1\n",
        "node1,Ethernet0/1,10.1.1.1\nnode2,Ethernet0/1,10.2.1.1\n",
    );

    let overrides = RoutesCliOverrides {
        output: Some(dir.path().join("fwd.txt")),
        ip_format: Some(IpFormat::Dotted),
        ..RoutesCliOverrides::default()
    };
    apply_overrides(&mut config, &overrides).unwrap();
    generate_routes(&config).unwrap();

    assert!(dir.path().join("fwd.txt").exists());
    assert!(!dir.path().join("updates.txt").exists());
    assert_eq!(lines(&dir.path().join("fwd.txt"))[1], "+ fwd node1 10.2.1.1 32 Ethernet0/1 8");
}

#[test]
fn test_empty_address_table_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path(), "a e1 b e1\n", "\n\n");

    assert!(generate_routes(&config).is_err());
    assert!(!dir.path().join("updates.txt").exists());
    assert!(!dir.path().join("updatesIP.txt").exists());
}

#[test]
fn test_write_forwarding_table_counts_lines() {
    let generated = full_mesh(3).unwrap();
    let dir = tempdir().unwrap();
    let topology = generated.to_topology();
    let addresses = fwdgen::ip::AddressTable::from_records(generated.addresses.clone());
    let table = generate_forwarding_table(&topology, &addresses, &ForwardingOptions::default()).unwrap();

    let path = dir.path().join("updates.txt");
    let written = write_forwarding_table(&table, IpFormat::Integer, &path).unwrap();
    assert_eq!(written, 9);
    assert_eq!(lines(&path).len(), 9);
}

use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;
use waypath_core::loading::csv_source::{NODES_FILE, TURN_RESTRICTIONS_FILE, edges_file};
use waypath_core::prelude::*;
use waypath_core::{Error, GraphSource};

const NODES: &str = "id,lat,lon
1,59.9386,30.3141
2,59.9390,30.3160
3,59.9401,30.3170
";

fn write_network(dir: &Path, car_edges: &str) {
    fs::write(dir.join(NODES_FILE), NODES).unwrap();
    fs::write(dir.join(edges_file(Mode::Car)), car_edges).unwrap();
    fs::write(
        dir.join(edges_file(Mode::Motorbike)),
        "id,source,target,cost,reverse_cost,length\n",
    )
    .unwrap();
    fs::write(
        dir.join(edges_file(Mode::Foot)),
        "id,source,target,cost,reverse_cost,length
10,1,2,120.0,120.0,110.0
",
    )
    .unwrap();
    fs::write(
        dir.join(TURN_RESTRICTIONS_FILE),
        "from_edge,via_node,to_edge
1,2,2
",
    )
    .unwrap();
}

fn csv_network() -> (TempDir, CsvSource) {
    let dir = TempDir::new().unwrap();
    write_network(
        dir.path(),
        "id,source,target,cost,reverse_cost,length
1, 1, 2, 10.5, 12.0, 110.0
2, 2, 3, 20.0, , 130.0
",
    );
    let source = CsvSource::new(dir.path());
    (dir, source)
}

#[test]
fn csv_network_loads_with_mirroring_and_mode_merge() {
    let (_dir, source) = csv_network();
    let graph = create_road_graph(&source).unwrap();

    assert_eq!(graph.node_count(), 3);
    // 1<->2 mirrored, 2->3 one way
    assert_eq!(graph.edge_count(), 3);

    let forward = graph.edge_between(1, 2).unwrap();
    assert_eq!(forward.cost(Mode::Car), Some(10.5));
    assert_eq!(forward.cost(Mode::Foot), Some(120.0));
    assert_eq!(forward.cost(Mode::Motorbike), None);
    assert_eq!(forward.length, 110.0);

    let mirrored = graph.edge_between(2, 1).unwrap();
    assert_eq!(mirrored.cost(Mode::Car), Some(12.0));

    assert!(graph.edge_between(3, 2).is_none());
    assert!(!graph.has_mode(Mode::Motorbike));
    assert_eq!(graph.restrictions(Mode::Car).len(), 1);
}

#[test]
fn node_coordinates_are_lon_lat_points() {
    let (_dir, source) = csv_network();
    let graph = create_road_graph(&source).unwrap();
    let node = graph.node_by_id(3).unwrap();
    assert_eq!(node.geometry.x(), 30.3170);
    assert_eq!(node.geometry.y(), 59.9401);
}

#[test]
fn infinite_reverse_cost_means_one_way() {
    let dir = TempDir::new().unwrap();
    write_network(
        dir.path(),
        "id,source,target,cost,reverse_cost,length
1,1,2,10.0,inf,110.0
2,2,3,20.0,-1,130.0
",
    );
    let graph = create_road_graph(&CsvSource::new(dir.path())).unwrap();
    assert!(graph.edge_between(2, 1).is_some_and(|edge| edge.cost(Mode::Car).is_none()));
    assert!(graph.edge_between(3, 2).is_none());
}

#[rstest]
#[case::nodes(NODES_FILE)]
#[case::restrictions(TURN_RESTRICTIONS_FILE)]
fn missing_relation_fails_loading(#[case] file: &str) {
    let (dir, source) = csv_network();
    fs::remove_file(dir.path().join(file)).unwrap();
    assert!(matches!(create_road_graph(&source), Err(Error::Io(_))));
}

#[test]
fn malformed_row_fails_loading() {
    let dir = TempDir::new().unwrap();
    write_network(
        dir.path(),
        "id,source,target,cost,reverse_cost,length
1,1,2,cheap,,110.0
",
    );
    let result = create_road_graph(&CsvSource::new(dir.path()));
    assert!(matches!(result, Err(Error::Csv(_))));
}

#[test]
fn config_opens_csv_source() {
    let (dir, _) = csv_network();
    let config = DataSourceConfig::Csv {
        dir: dir.path().to_path_buf(),
    };
    let source = config.open_source().unwrap();
    assert_eq!(source.load_nodes().unwrap().len(), 3);
    assert_eq!(source.load_edges(Mode::Car).unwrap()[1].reverse_cost, None);
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use rusqlite::Connection;
    use tempfile::NamedTempFile;
    use waypath_core::loading::SqliteSource;
    use waypath_core::prelude::*;

    fn sqlite_network() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let connection = Connection::open(file.path()).unwrap();
        connection
            .execute_batch(
                "CREATE TABLE nodes (id INTEGER PRIMARY KEY, lat REAL, lon REAL);
                 INSERT INTO nodes VALUES (1, 0.0, 0.0), (2, 0.0, 0.001), (3, 0.0, 0.002);
                 CREATE TABLE edges_car (id INTEGER, source INTEGER, target INTEGER,
                                         cost REAL, reverse_cost REAL, length REAL);
                 INSERT INTO edges_car VALUES (1, 1, 2, 5.0, 5.0, 111.0),
                                              (2, 2, 3, 7.0, NULL, 111.0);
                 CREATE TABLE edges_motorbike AS SELECT * FROM edges_car;
                 CREATE TABLE edges_foot AS SELECT * FROM edges_car WHERE id = 1;
                 CREATE TABLE turn_restrictions (from_edge INTEGER, via_node INTEGER,
                                                 to_edge INTEGER);
                 INSERT INTO turn_restrictions VALUES (1, 2, 2);",
            )
            .unwrap();
        file
    }

    #[test]
    fn sqlite_network_loads_and_routes() {
        let file = sqlite_network();
        let graph = create_road_graph(&SqliteSource::open(file.path()).unwrap()).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.restrictions(Mode::Car).len(), 1);

        let model = CostModel::new(Mode::Car, CostField::Cost);
        // The only way from 1 to 3 turns 1 -> 2 -> 3, which is forbidden
        assert_eq!(astar(&graph, 1, 3, &model, &SearchLimits::none()).unwrap(), None);
        let route = astar(&graph, 2, 1, &model, &SearchLimits::none()).unwrap().unwrap();
        assert_eq!(route.nodes, vec![2, 1]);
        assert_eq!(route.cost, 5.0);
    }

    #[test]
    fn missing_table_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        Connection::open(file.path())
            .unwrap()
            .execute_batch("CREATE TABLE nodes (id INTEGER, lat REAL, lon REAL);")
            .unwrap();
        let source = SqliteSource::open(file.path()).unwrap();
        assert!(create_road_graph(&source).is_err());
    }
}

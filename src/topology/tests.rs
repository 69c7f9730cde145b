//! Topology Module Tests
//!
//! Validates topology parsing and the adjacency queries the flood
//! propagator relies on.

#[cfg(test)]
mod tests {
    use crate::topology::types::{ServerId, Topology};

    const SAMPLE: &str = r#"{
        "host": "127.0.0.1",
        "ports": { "juneau": 10000, "sitka": 10001, "nome": 10002 },
        "neighbors": {
            "juneau": ["sitka", "nome"],
            "sitka": ["juneau"],
            "nome": ["juneau"]
        }
    }"#;

    #[test]
    fn test_parse_sample_topology() {
        let topology = Topology::from_json(SAMPLE).expect("sample should parse");

        assert_eq!(topology.ports.len(), 3);
        assert!(topology.contains(&ServerId::from("juneau")));
        assert!(!topology.contains(&ServerId::from("fairbanks")));
    }

    #[test]
    fn test_addr_of_known_server() {
        let topology = Topology::from_json(SAMPLE).unwrap();

        let addr = topology.addr_of(&ServerId::from("sitka")).unwrap();
        assert_eq!(addr, "127.0.0.1:10001");
    }

    #[test]
    fn test_addr_of_unknown_server_is_error() {
        let topology = Topology::from_json(SAMPLE).unwrap();

        assert!(topology.addr_of(&ServerId::from("fairbanks")).is_err());
    }

    #[test]
    fn test_neighbors_of() {
        let topology = Topology::from_json(SAMPLE).unwrap();

        let neighbors = topology.neighbors_of(&ServerId::from("juneau"));
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&ServerId::from("sitka")));
        assert!(neighbors.contains(&ServerId::from("nome")));
    }

    #[test]
    fn test_server_without_neighbors_gets_empty_slice() {
        let raw = r#"{
            "host": "127.0.0.1",
            "ports": { "solo": 10000 }
        }"#;
        let topology = Topology::from_json(raw).unwrap();

        assert!(topology.neighbors_of(&ServerId::from("solo")).is_empty());
    }

    #[test]
    fn test_asymmetric_adjacency_is_legal() {
        // sitka forwards to nome but nome does not forward back
        let raw = r#"{
            "host": "127.0.0.1",
            "ports": { "sitka": 10000, "nome": 10001 },
            "neighbors": { "sitka": ["nome"] }
        }"#;
        let topology = Topology::from_json(raw).expect("one-way edge should parse");

        assert_eq!(topology.neighbors_of(&ServerId::from("sitka")).len(), 1);
        assert!(topology.neighbors_of(&ServerId::from("nome")).is_empty());
    }

    #[test]
    fn test_unknown_neighbor_reference_is_rejected() {
        let raw = r#"{
            "host": "127.0.0.1",
            "ports": { "sitka": 10000 },
            "neighbors": { "sitka": ["ghost"] }
        }"#;

        assert!(Topology::from_json(raw).is_err());
    }

    #[test]
    fn test_neighbor_list_for_unknown_server_is_rejected() {
        let raw = r#"{
            "host": "127.0.0.1",
            "ports": { "sitka": 10000 },
            "neighbors": { "ghost": ["sitka"] }
        }"#;

        assert!(Topology::from_json(raw).is_err());
    }
}

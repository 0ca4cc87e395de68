//! An implementation of the [RDF Dataset Canonicalization algorithm
//! version 1.0 (RDFC-1.0)](https://www.w3.org/TR/rdf-canon/) on the
//! [Oxrdf](https://crates.io/crates/oxrdf) data model.
//!
//! Canonicalization assigns a deterministic identifier (`c14n0`,
//! `c14n1`, ...) to every blank node of a dataset, so that two isomorphic
//! datasets serialize to byte-identical canonical N-Quads documents.

mod api;
mod canon;
mod config;
mod counter;
mod error;
mod hash;
mod issuer;
mod nquads;

pub use api::{
    canonicalize, canonicalize_full, canonicalize_full_with, canonicalize_graph,
    canonicalize_graph_with, canonicalize_nquads, canonicalize_nquads_with, canonicalize_quads,
    canonicalize_quads_with, canonicalize_with, issue, issue_graph, issue_graph_with, issue_quads,
    issue_quads_with, issue_with, relabel, relabel_graph, relabel_quads, sort, sort_graph,
    CanonicalizationResult,
};
pub use config::{
    CanonicalizationOptions, CONFIG_FILE_NAME, DEFAULT_COMPLEXITY_FACTOR, ENV_COMPLEXITY_FACTOR,
    ENV_HASH_ALGORITHM, MAXIMUM_COMPLEXITY_FACTOR,
};
pub use error::CanonicalizationError;
pub use hash::HashAlgorithm;
pub use issuer::IdentifierIssuer;
pub use nquads::{parse, serialize, serialize_graph};

#[cfg(test)]
mod tests {
    use crate::{
        canonicalize, canonicalize_full, canonicalize_nquads, canonicalize_nquads_with,
        canonicalize_quads, canonicalize_with, parse, CanonicalizationError,
        CanonicalizationOptions, HashAlgorithm,
    };
    use oxrdf::BlankNode;
    use tracing_subscriber::fmt;

    #[allow(dead_code)]
    fn init(level: tracing::Level) {
        let log_format = fmt::format()
            .with_level(false)
            .with_target(false)
            .without_time()
            .compact();
        let _ = fmt()
            .with_max_level(level)
            .event_format(log_format)
            .try_init();
    }

    #[test]
    fn test_canonicalize_unique_hash_example() {
        let input_dataset = parse(
            r#"<http://example.com/#p> <http://example.com/#q> _:e0 .
<http://example.com/#p> <http://example.com/#r> _:e1 .
_:e0 <http://example.com/#s> <http://example.com/#u> .
_:e1 <http://example.com/#t> <http://example.com/#u> .
"#,
        )
        .unwrap();

        let expected_output = r#"<http://example.com/#p> <http://example.com/#q> _:c14n0 .
<http://example.com/#p> <http://example.com/#r> _:c14n1 .
_:c14n0 <http://example.com/#s> <http://example.com/#u> .
_:c14n1 <http://example.com/#t> <http://example.com/#u> .
"#;
        assert_eq!(canonicalize(&input_dataset).unwrap(), expected_output);
    }

    #[test]
    fn test_canonicalize_shared_hash_example() {
        let input_dataset = parse(
            r#"<http://example.com/#p> <http://example.com/#q> _:e0 .
<http://example.com/#p> <http://example.com/#q> _:e1 .
_:e0 <http://example.com/#p> _:e2 .
_:e1 <http://example.com/#p> _:e3 .
_:e2 <http://example.com/#r> _:e3 .
"#,
        )
        .unwrap();

        let expected_output = r#"<http://example.com/#p> <http://example.com/#q> _:c14n2 .
<http://example.com/#p> <http://example.com/#q> _:c14n3 .
_:c14n0 <http://example.com/#r> _:c14n1 .
_:c14n2 <http://example.com/#p> _:c14n1 .
_:c14n3 <http://example.com/#p> _:c14n0 .
"#;
        assert_eq!(canonicalize(&input_dataset).unwrap(), expected_output);
    }

    #[test]
    fn test_canonicalize_duplicated_paths_example() {
        let input_dataset = parse(
            r#"_:e0 <http://example.org/vocab#p1> _:e1 .
_:e1 <http://example.org/vocab#p2> "Foo" .
_:e2 <http://example.org/vocab#p1> _:e3 .
_:e3 <http://example.org/vocab#p2> "Foo" .
"#,
        )
        .unwrap();

        let expected_output = r#"_:c14n0 <http://example.org/vocab#p1> _:c14n1 .
_:c14n1 <http://example.org/vocab#p2> "Foo" .
_:c14n2 <http://example.org/vocab#p1> _:c14n3 .
_:c14n3 <http://example.org/vocab#p2> "Foo" .
"#;
        assert_eq!(canonicalize(&input_dataset).unwrap(), expected_output);
    }

    #[test]
    fn test_canonicalize_singleton() {
        let input_dataset = parse("<http://ex/s> <http://ex/p> _:x .\n").unwrap();
        assert_eq!(
            canonicalize(&input_dataset).unwrap(),
            "<http://ex/s> <http://ex/p> _:c14n0 .\n"
        );
    }

    #[test]
    fn test_canonicalize_without_blank_nodes_sorts_quads() {
        let input_dataset = parse(
            r#"<http://ex/z> <http://ex/p> "z" .
<http://ex/a> <http://ex/p> "a" <http://ex/g> .
"#,
        )
        .unwrap();
        assert_eq!(
            canonicalize(&input_dataset).unwrap(),
            "<http://ex/a> <http://ex/p> \"a\" <http://ex/g> .\n<http://ex/z> <http://ex/p> \"z\" .\n"
        );
    }

    #[test]
    fn test_canonicalize_quads_deduplicates() {
        let input_dataset = parse("<http://ex/s> <http://ex/p> _:x .\n").unwrap();
        let quad = input_dataset.iter().next().unwrap().into_owned();
        let canonicalized = canonicalize_quads(&[quad.clone(), quad]).unwrap();
        assert_eq!(canonicalized, "<http://ex/s> <http://ex/p> _:c14n0 .\n");
    }

    #[test]
    fn test_canonicalize_is_deterministic() {
        let input = r#"_:a <http://ex/p> _:b .
<http://ex/s> <http://ex/p> _:a .
<http://ex/s> <http://ex/p> _:b .
"#;
        let input_dataset = parse(input).unwrap();
        let first = canonicalize(&input_dataset).unwrap();
        let second = canonicalize(&input_dataset).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonicalize_is_isomorphism_invariant() {
        // same shape with the two blank node labels swapped
        let forward = r#"<http://ex/s> <http://ex/p> _:a .
<http://ex/s> <http://ex/p> _:b .
_:a <http://ex/q> _:b .
"#;
        let swapped = r#"<http://ex/s> <http://ex/p> _:b .
<http://ex/s> <http://ex/p> _:a .
_:b <http://ex/q> _:a .
"#;
        assert_eq!(
            canonicalize_nquads(forward).unwrap(),
            canonicalize_nquads(swapped).unwrap()
        );

        // bijective renaming of a symmetric cycle
        let cycle = r#"_:e0 <http://example.org/vocab#next> _:e1 _:g .
_:e0 <http://example.org/vocab#prev> _:e2 _:g .
_:e1 <http://example.org/vocab#next> _:e2 _:g .
_:e1 <http://example.org/vocab#prev> _:e0 _:g .
_:e2 <http://example.org/vocab#next> _:e0 _:g .
_:e2 <http://example.org/vocab#prev> _:e1 _:g .
"#;
        let renamed = cycle
            .replace("_:e0", "_:x9")
            .replace("_:e1", "_:x7")
            .replace("_:e2", "_:x8")
            .replace("_:g", "_:x0");
        assert_eq!(
            canonicalize_nquads(cycle).unwrap(),
            canonicalize_nquads(&renamed).unwrap()
        );
    }

    #[test]
    fn test_recanonicalization_is_stable() {
        let input = r#"<http://example.com/#p> <http://example.com/#q> _:e0 .
<http://example.com/#p> <http://example.com/#q> _:e1 .
_:e0 <http://example.com/#p> _:e2 .
_:e1 <http://example.com/#p> _:e3 .
_:e2 <http://example.com/#r> _:e3 .
"#;
        let canonicalized = canonicalize_nquads(input).unwrap();
        assert_eq!(canonicalize_nquads(&canonicalized).unwrap(), canonicalized);
    }

    #[test]
    fn test_canonicalize_full_returns_maps_and_dataset() {
        let input = r#"_:e0 <http://example.org/vocab#next> _:e1 _:g .
_:e0 <http://example.org/vocab#prev> _:e2 _:g .
_:e1 <http://example.org/vocab#next> _:e2 _:g .
_:e1 <http://example.org/vocab#prev> _:e0 _:g .
_:e2 <http://example.org/vocab#next> _:e0 _:g .
_:e2 <http://example.org/vocab#prev> _:e1 _:g .
"#;
        let input_dataset = parse(input).unwrap();
        let result = canonicalize_full(&input_dataset).unwrap();

        assert_eq!(result.canonical_dataset.len(), 6);
        assert_eq!(
            result.canonical_form,
            canonicalize(&input_dataset).unwrap()
        );
        assert_eq!(
            result.issued_identifiers_map.get("g"),
            Some(&"c14n0".to_string())
        );
        assert_eq!(
            result.issued_identifiers_map.get("e0"),
            Some(&"c14n1".to_string())
        );
        assert_eq!(
            result
                .bnode_to_canonical_map
                .get(&BlankNode::new("e0").unwrap()),
            Some(&"c14n1".to_string())
        );
        assert_eq!(result.bnode_to_canonical_map.len(), 4);
    }

    #[test]
    fn test_complexity_exceeded_on_symmetric_cycle() {
        // a fully symmetric cycle forces the permutation search to
        // recurse; a complexity factor of 1 caps it at 3 calls
        let input = r#"_:e0 <http://example.org/vocab#next> _:e1 .
_:e0 <http://example.org/vocab#prev> _:e2 .
_:e1 <http://example.org/vocab#next> _:e2 .
_:e1 <http://example.org/vocab#prev> _:e0 .
_:e2 <http://example.org/vocab#next> _:e0 .
_:e2 <http://example.org/vocab#prev> _:e1 .
"#;
        let options = CanonicalizationOptions {
            complexity_factor: 1,
            ..Default::default()
        };
        assert!(matches!(
            canonicalize_nquads_with(input, &options),
            Err(CanonicalizationError::ComplexityExceeded(3))
        ));
    }

    #[test]
    fn test_sha384_keeps_singleton_label() {
        let input_dataset = parse("<http://ex/s> <http://ex/p> _:x .\n").unwrap();
        let options = CanonicalizationOptions {
            hash_algorithm: HashAlgorithm::Sha384,
            ..Default::default()
        };
        assert_eq!(
            canonicalize_with(&input_dataset, &options).unwrap(),
            canonicalize(&input_dataset).unwrap()
        );
    }

    #[test]
    fn test_malformed_nquads_is_rejected() {
        assert!(matches!(
            canonicalize_nquads("<http://ex/s> <http://ex/p> ."),
            Err(CanonicalizationError::MalformedInput(_))
        ));
    }
}

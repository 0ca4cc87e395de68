use crate::error::CanonicalizationError;
use oxrdf::{Dataset, Graph, QuadRef, TripleRef};
use oxttl::NQuadsParser;

/// Parses an N-Quads document into a dataset. Blank node labels are kept
/// verbatim; duplicate quads collapse through the dataset's set semantics.
pub fn parse(nquads: &str) -> Result<Dataset, CanonicalizationError> {
    let mut dataset = Dataset::new();
    for quad in NQuadsParser::new().for_slice(nquads) {
        dataset.insert(&quad?);
    }
    Ok(dataset)
}

/// Serializes one quad as a canonical n-quads line, including the
/// terminating newline.
pub(crate) fn serialize_quad(quad: QuadRef<'_>) -> String {
    format!("{} .\n", quad)
}

pub(crate) fn serialize_triple(triple: TripleRef<'_>) -> String {
    format!("{} .\n", triple)
}

/// Serializes a dataset as a canonical N-Quads document: one line per
/// quad, sorted in code point order.
pub fn serialize(dataset: &Dataset) -> String {
    let mut nquads: Vec<String> = dataset.iter().map(serialize_quad).collect();
    nquads.sort();
    nquads.concat()
}

/// Serializes a graph as a canonical N-Triples document: one line per
/// triple, sorted in code point order.
pub fn serialize_graph(graph: &Graph) -> String {
    let mut ntriples: Vec<String> = graph.iter().map(serialize_triple).collect();
    ntriples.sort();
    ntriples.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Quad};

    #[test]
    fn test_serialize_quad_lines() {
        let s = NamedNode::new("http://example.org/subject1").unwrap();
        let p = NamedNode::new("http://example.org/predicate1").unwrap();
        let o = NamedNode::new("http://example.org/object1").unwrap();
        let g = NamedNode::new("http://example.org/graph1").unwrap();
        let quad = Quad::new(s.clone(), p.clone(), o, g);
        assert_eq!(
            serialize_quad(quad.as_ref()),
            "<http://example.org/subject1> <http://example.org/predicate1> <http://example.org/object1> <http://example.org/graph1> .\n"
        );

        let quad = Quad::new(
            BlankNode::new("b0").unwrap(),
            p.clone(),
            Literal::new_typed_literal(
                "100",
                NamedNode::new("http://www.w3.org/2001/XMLSchema#integer").unwrap(),
            ),
            GraphName::DefaultGraph,
        );
        assert_eq!(
            serialize_quad(quad.as_ref()),
            "_:b0 <http://example.org/predicate1> \"100\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
        );

        let quad = Quad::new(
            BlankNode::new("b1").unwrap(),
            p,
            Literal::new_language_tagged_literal("あいうえお", "ja").unwrap(),
            BlankNode::new("b2").unwrap(),
        );
        assert_eq!(
            serialize_quad(quad.as_ref()),
            "_:b1 <http://example.org/predicate1> \"あいうえお\"@ja _:b2 .\n"
        );
    }

    #[test]
    fn test_parse_keeps_labels_and_dedups() {
        let doc = r#"_:e0 <http://example.org/vocab#p> _:e1 .
_:e0 <http://example.org/vocab#p> _:e1 .
<http://example.org/s> <http://example.org/vocab#q> "v" _:g0 .
"#;
        let dataset = parse(doc).unwrap();
        assert_eq!(dataset.len(), 2);
        let serialized = serialize(&dataset);
        assert!(serialized.contains("_:e0 <http://example.org/vocab#p> _:e1 .\n"));
        assert!(serialized.contains(" _:g0 .\n"));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(matches!(
            parse("<http://example.org/s> <http://example.org/p> ."),
            Err(CanonicalizationError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_serialize_sorts_lines() {
        let doc = r#"<http://example.org/z> <http://example.org/p> "z" .
<http://example.org/a> <http://example.org/p> "a" .
"#;
        let dataset = parse(doc).unwrap();
        assert_eq!(
            serialize(&dataset),
            "<http://example.org/a> <http://example.org/p> \"a\" .\n<http://example.org/z> <http://example.org/p> \"z\" .\n"
        );
    }
}

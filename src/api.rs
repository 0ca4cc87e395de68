use crate::{
    canon::canonicalize_core,
    config::CanonicalizationOptions,
    error::CanonicalizationError,
    nquads::{parse, serialize, serialize_graph},
};
use oxrdf::{
    BlankNode, BlankNodeRef, Dataset, Graph, GraphName, GraphNameRef, Quad, QuadRef, Subject,
    SubjectRef, Term, TermRef, Triple, TripleRef,
};
use std::collections::HashMap;

/// Everything a canonicalization produces: the canonical N-Quads document,
/// the relabeled dataset, and the blank node assignment both as terms and
/// as labels.
#[derive(Debug, Clone)]
pub struct CanonicalizationResult {
    /// The canonical N-Quads document: one line per quad, sorted in code
    /// point order, each terminated by a newline.
    pub canonical_form: String,
    /// The input dataset with every blank node relabeled canonically.
    pub canonical_dataset: Dataset,
    /// Original blank node term to canonical identifier.
    pub bnode_to_canonical_map: HashMap<BlankNode, String>,
    /// Original blank node identifier to canonical identifier.
    pub issued_identifiers_map: HashMap<String, String>,
}

/// Returns the serialized canonical form of the canonicalized dataset,
/// where any blank nodes in the input dataset are assigned deterministic
/// identifiers.
///
/// # Examples
///
/// ```
/// use rdfc10::{canonicalize, parse};
///
/// let input = r#"_:e0 <http://example.org/vocab#next> _:e1 _:g .
/// _:e0 <http://example.org/vocab#prev> _:e2 _:g .
/// _:e1 <http://example.org/vocab#next> _:e2 _:g .
/// _:e1 <http://example.org/vocab#prev> _:e0 _:g .
/// _:e2 <http://example.org/vocab#next> _:e0 _:g .
/// _:e2 <http://example.org/vocab#prev> _:e1 _:g .
/// "#;
/// let expected = r#"_:c14n1 <http://example.org/vocab#next> _:c14n2 _:c14n0 .
/// _:c14n1 <http://example.org/vocab#prev> _:c14n3 _:c14n0 .
/// _:c14n2 <http://example.org/vocab#next> _:c14n3 _:c14n0 .
/// _:c14n2 <http://example.org/vocab#prev> _:c14n1 _:c14n0 .
/// _:c14n3 <http://example.org/vocab#next> _:c14n1 _:c14n0 .
/// _:c14n3 <http://example.org/vocab#prev> _:c14n2 _:c14n0 .
/// "#;
///
/// let input_dataset = parse(input).unwrap();
/// assert_eq!(canonicalize(&input_dataset).unwrap(), expected);
/// ```
pub fn canonicalize(input_dataset: &Dataset) -> Result<String, CanonicalizationError> {
    canonicalize_with(input_dataset, &CanonicalizationOptions::default())
}

/// Like [`canonicalize`], with explicit options (hash algorithm and
/// complexity factor).
pub fn canonicalize_with(
    input_dataset: &Dataset,
    options: &CanonicalizationOptions,
) -> Result<String, CanonicalizationError> {
    let issued_identifiers_map = issue_with(input_dataset, options)?;
    let relabeled_dataset = relabel(input_dataset, &issued_identifiers_map)?;
    Ok(serialize(&relabeled_dataset))
}

/// Returns the serialized canonical form of the canonicalized dataset,
/// where any blank nodes in the input quads are assigned deterministic
/// identifiers. The quads are deduplicated before canonicalization.
pub fn canonicalize_quads(input_quads: &[Quad]) -> Result<String, CanonicalizationError> {
    canonicalize_quads_with(input_quads, &CanonicalizationOptions::default())
}

/// Like [`canonicalize_quads`], with explicit options.
pub fn canonicalize_quads_with(
    input_quads: &[Quad],
    options: &CanonicalizationOptions,
) -> Result<String, CanonicalizationError> {
    let input_dataset = Dataset::from_iter(input_quads);
    canonicalize_with(&input_dataset, options)
}

/// Returns the serialized canonical form of the canonicalized graph,
/// where any blank nodes in the input graph are assigned deterministic
/// identifiers. The graph is treated as a dataset whose triples live in
/// the default graph.
///
/// # Examples
///
/// ```
/// use oxrdf::Graph;
/// use oxttl::NTriplesParser;
/// use rdfc10::canonicalize_graph;
/// use std::io::Cursor;
///
/// let input = r#"_:e0 <http://example.org/vocab#next> _:e1 .
/// _:e0 <http://example.org/vocab#prev> _:e2 .
/// _:e1 <http://example.org/vocab#next> _:e2 .
/// _:e1 <http://example.org/vocab#prev> _:e0 .
/// _:e2 <http://example.org/vocab#next> _:e0 .
/// _:e2 <http://example.org/vocab#prev> _:e1 .
/// "#;
/// let expected = r#"_:c14n0 <http://example.org/vocab#next> _:c14n2 .
/// _:c14n0 <http://example.org/vocab#prev> _:c14n1 .
/// _:c14n1 <http://example.org/vocab#next> _:c14n0 .
/// _:c14n1 <http://example.org/vocab#prev> _:c14n2 .
/// _:c14n2 <http://example.org/vocab#next> _:c14n1 .
/// _:c14n2 <http://example.org/vocab#prev> _:c14n0 .
/// "#;
///
/// let input_triples = NTriplesParser::new()
///     .for_reader(Cursor::new(input))
///     .map(|x| x.unwrap());
/// let input_graph = Graph::from_iter(input_triples);
/// assert_eq!(canonicalize_graph(&input_graph).unwrap(), expected);
/// ```
pub fn canonicalize_graph(input_graph: &Graph) -> Result<String, CanonicalizationError> {
    canonicalize_graph_with(input_graph, &CanonicalizationOptions::default())
}

/// Like [`canonicalize_graph`], with explicit options.
pub fn canonicalize_graph_with(
    input_graph: &Graph,
    options: &CanonicalizationOptions,
) -> Result<String, CanonicalizationError> {
    let issued_identifiers_map = issue_graph_with(input_graph, options)?;
    let relabeled_graph = relabel_graph(input_graph, &issued_identifiers_map)?;
    Ok(serialize_graph(&relabeled_graph))
}

/// Parses an N-Quads document and returns its serialized canonical form.
pub fn canonicalize_nquads(input: &str) -> Result<String, CanonicalizationError> {
    canonicalize_nquads_with(input, &CanonicalizationOptions::default())
}

/// Like [`canonicalize_nquads`], with explicit options.
pub fn canonicalize_nquads_with(
    input: &str,
    options: &CanonicalizationOptions,
) -> Result<String, CanonicalizationError> {
    let input_dataset = parse(input)?;
    canonicalize_with(&input_dataset, options)
}

/// Canonicalizes the input dataset and returns the full
/// [`CanonicalizationResult`]: the canonical document, the relabeled
/// dataset and both blank node maps.
pub fn canonicalize_full(
    input_dataset: &Dataset,
) -> Result<CanonicalizationResult, CanonicalizationError> {
    canonicalize_full_with(input_dataset, &CanonicalizationOptions::default())
}

/// Like [`canonicalize_full`], with explicit options.
pub fn canonicalize_full_with(
    input_dataset: &Dataset,
    options: &CanonicalizationOptions,
) -> Result<CanonicalizationResult, CanonicalizationError> {
    let issued_identifiers_map = issue_with(input_dataset, options)?;
    let canonical_dataset = relabel(input_dataset, &issued_identifiers_map)?;
    let canonical_form = serialize(&canonical_dataset);
    let mut bnode_to_canonical_map = HashMap::with_capacity(issued_identifiers_map.len());
    for (existing, issued) in &issued_identifiers_map {
        bnode_to_canonical_map.insert(BlankNode::new(existing.as_str())?, issued.clone());
    }
    Ok(CanonicalizationResult {
        canonical_form,
        canonical_dataset,
        bnode_to_canonical_map,
        issued_identifiers_map,
    })
}

/// Assigns deterministic identifiers to any blank nodes in the input
/// dataset and returns the assignment result as a map.
///
/// # Examples
///
/// ```
/// use rdfc10::{issue, parse};
/// use std::collections::HashMap;
///
/// let input = r#"_:e0 <http://example.org/vocab#next> _:e1 _:g .
/// _:e0 <http://example.org/vocab#prev> _:e2 _:g .
/// _:e1 <http://example.org/vocab#next> _:e2 _:g .
/// _:e1 <http://example.org/vocab#prev> _:e0 _:g .
/// _:e2 <http://example.org/vocab#next> _:e0 _:g .
/// _:e2 <http://example.org/vocab#prev> _:e1 _:g .
/// "#;
/// let expected_map = HashMap::from([
///     ("g".to_string(), "c14n0".to_string()),
///     ("e0".to_string(), "c14n1".to_string()),
///     ("e1".to_string(), "c14n2".to_string()),
///     ("e2".to_string(), "c14n3".to_string()),
/// ]);
///
/// let input_dataset = parse(input).unwrap();
/// assert_eq!(issue(&input_dataset).unwrap(), expected_map);
/// ```
pub fn issue(input_dataset: &Dataset) -> Result<HashMap<String, String>, CanonicalizationError> {
    issue_with(input_dataset, &CanonicalizationOptions::default())
}

/// Like [`issue`], with explicit options.
pub fn issue_with(
    input_dataset: &Dataset,
    options: &CanonicalizationOptions,
) -> Result<HashMap<String, String>, CanonicalizationError> {
    canonicalize_core(input_dataset, options)
}

/// Assigns deterministic identifiers to any blank nodes in the input
/// quads and returns the assignment result as a map.
pub fn issue_quads(input_quads: &[Quad]) -> Result<HashMap<String, String>, CanonicalizationError> {
    issue_quads_with(input_quads, &CanonicalizationOptions::default())
}

/// Like [`issue_quads`], with explicit options.
pub fn issue_quads_with(
    input_quads: &[Quad],
    options: &CanonicalizationOptions,
) -> Result<HashMap<String, String>, CanonicalizationError> {
    let input_dataset = Dataset::from_iter(input_quads);
    canonicalize_core(&input_dataset, options)
}

/// Assigns deterministic identifiers to any blank nodes in the input
/// graph and returns the assignment result as a map.
pub fn issue_graph(input_graph: &Graph) -> Result<HashMap<String, String>, CanonicalizationError> {
    issue_graph_with(input_graph, &CanonicalizationOptions::default())
}

/// Like [`issue_graph`], with explicit options.
pub fn issue_graph_with(
    input_graph: &Graph,
    options: &CanonicalizationOptions,
) -> Result<HashMap<String, String>, CanonicalizationError> {
    let input_dataset = Dataset::from_iter(
        input_graph
            .iter()
            .map(|t| QuadRef::new(t.subject, t.predicate, t.object, GraphNameRef::DefaultGraph)),
    );
    canonicalize_core(&input_dataset, options)
}

/// Re-labels blank node identifiers in the input dataset according to the
/// issued identifiers map. Note that the output `Dataset` does not retain
/// the order of quads, unlike `Vec<Quad>`.
pub fn relabel(
    input_dataset: &Dataset,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<Dataset, CanonicalizationError> {
    input_dataset
        .iter()
        .map(|q| relabel_quad(q, issued_identifiers_map))
        .collect()
}

/// Re-labels blank node identifiers in the input quads according to the
/// issued identifiers map.
pub fn relabel_quads(
    input_quads: &[Quad],
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<Vec<Quad>, CanonicalizationError> {
    input_quads
        .iter()
        .map(|q| relabel_quad(q.into(), issued_identifiers_map))
        .collect()
}

/// Re-labels blank node identifiers in the input graph according to the
/// issued identifiers map.
pub fn relabel_graph(
    input_graph: &Graph,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<Graph, CanonicalizationError> {
    input_graph
        .iter()
        .map(|t| relabel_triple(t, issued_identifiers_map))
        .collect()
}

fn relabel_quad(
    q: QuadRef<'_>,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<Quad, CanonicalizationError> {
    Ok(Quad::new(
        relabel_subject(q.subject, issued_identifiers_map)?,
        q.predicate,
        relabel_term(q.object, issued_identifiers_map)?,
        relabel_graph_name(q.graph_name, issued_identifiers_map)?,
    ))
}

fn relabel_triple(
    t: TripleRef<'_>,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<Triple, CanonicalizationError> {
    Ok(Triple::new(
        relabel_subject(t.subject, issued_identifiers_map)?,
        t.predicate,
        relabel_term(t.object, issued_identifiers_map)?,
    ))
}

fn relabel_subject(
    s: SubjectRef<'_>,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<Subject, CanonicalizationError> {
    match s {
        SubjectRef::BlankNode(blank_node) => Ok(Subject::BlankNode(relabel_blank_node(
            blank_node,
            issued_identifiers_map,
        )?)),
        _ => Ok(s.into()),
    }
}

fn relabel_term(
    o: TermRef<'_>,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<Term, CanonicalizationError> {
    match o {
        TermRef::BlankNode(blank_node) => Ok(Term::BlankNode(relabel_blank_node(
            blank_node,
            issued_identifiers_map,
        )?)),
        _ => Ok(o.into()),
    }
}

fn relabel_graph_name(
    g: GraphNameRef<'_>,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<GraphName, CanonicalizationError> {
    match g {
        GraphNameRef::BlankNode(blank_node) => Ok(GraphName::BlankNode(relabel_blank_node(
            blank_node,
            issued_identifiers_map,
        )?)),
        _ => Ok(g.into()),
    }
}

fn relabel_blank_node(
    b: BlankNodeRef<'_>,
    issued_identifiers_map: &HashMap<String, String>,
) -> Result<BlankNode, CanonicalizationError> {
    match issued_identifiers_map.get(b.as_str()) {
        Some(id) => Ok(BlankNode::new(id.as_str())?),
        None => Err(CanonicalizationError::CanonicalIdentifierNotExist),
    }
}

/// Sorts the quads of a canonicalized dataset into code point order.
pub fn sort(dataset: &Dataset) -> Vec<Quad> {
    let mut ordered_dataset: Vec<QuadRef<'_>> = dataset.iter().collect();
    ordered_dataset.sort_by_cached_key(|q| q.to_string());
    ordered_dataset.iter().map(|q| q.into_owned()).collect()
}

/// Sorts the triples of a canonicalized graph into code point order.
pub fn sort_graph(graph: &Graph) -> Vec<Triple> {
    let mut ordered_graph: Vec<TripleRef<'_>> = graph.iter().collect();
    ordered_graph.sort_by_cached_key(|t| t.to_string());
    ordered_graph.iter().map(|t| t.into_owned()).collect()
}

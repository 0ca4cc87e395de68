use crate::config::CanonicalizationOptions;
use crate::counter::HndqCallCounter;
use crate::error::CanonicalizationError;
use crate::hash::{hash, HashAlgorithm};
use crate::issuer::IdentifierIssuer;
use crate::nquads::serialize_quad;
use itertools::Itertools;
use oxrdf::{
    BlankNode, BlankNodeRef, Dataset, GraphName, GraphNameRef, Quad, QuadRef, Subject, SubjectRef,
    Term, TermRef,
};
use std::collections::{hash_map::Entry, BTreeMap, HashMap};
use tracing::debug;

const DEFAULT_CANONICAL_IDENTIFIER_PREFIX: &str = "c14n";
const TEMPORARY_IDENTIFIER_PREFIX: &str = "b";

/// **4.3 Canonicalization State**
///
/// Owned by a single canonicalization; a fresh state is built for every
/// invocation.
pub(crate) struct CanonicalizationState {
    /// **blank node to quads map**
    ///   A map that relates a blank node identifier to the quads
    ///   in which they appear in the input dataset.
    blank_node_to_quads_map: HashMap<String, Vec<Quad>>,

    /// First-seen order of the blank node identifiers. The map above has
    /// no usable iteration order, and bucket contents downstream must not
    /// depend on hashing order.
    blank_node_order: Vec<String>,

    /// **hash to blank nodes map**
    ///   A map that relates a hash to a list of blank node identifiers,
    ///   iterated in code point order of the hashes.
    hash_to_blank_nodes_map: BTreeMap<String, Vec<String>>,

    /// **canonical issuer**
    ///   An identifier issuer, initialized with the prefix c14n, for
    ///   issuing canonical blank node identifiers.
    canonical_issuer: IdentifierIssuer,

    /// Digest algorithm shared by the first-degree, related and n-degree
    /// hash computations.
    hash_algorithm: HashAlgorithm,
}

impl CanonicalizationState {
    fn new(hash_algorithm: HashAlgorithm) -> CanonicalizationState {
        CanonicalizationState {
            blank_node_to_quads_map: HashMap::new(),
            blank_node_order: Vec::new(),
            hash_to_blank_nodes_map: BTreeMap::new(),
            canonical_issuer: IdentifierIssuer::new(DEFAULT_CANONICAL_IDENTIFIER_PREFIX),
            hash_algorithm,
        }
    }

    fn update_blank_node_to_quads_map(&mut self, dataset: &Dataset) {
        for quad in dataset.iter() {
            if let SubjectRef::BlankNode(n) = quad.subject {
                self.index_blank_node(n.as_str(), quad);
            }
            if let TermRef::BlankNode(n) = quad.object {
                self.index_blank_node(n.as_str(), quad);
            }
            if let GraphNameRef::BlankNode(n) = quad.graph_name {
                self.index_blank_node(n.as_str(), quad);
            }
        }
    }

    fn index_blank_node(&mut self, identifier: &str, quad: QuadRef<'_>) {
        match self.blank_node_to_quads_map.entry(identifier.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(quad.into_owned()),
            Entry::Vacant(entry) => {
                self.blank_node_order.push(identifier.to_string());
                entry.insert(vec![quad.into_owned()]);
            }
        }
    }

    fn get_quads_for_blank_node(&self, identifier: &str) -> Option<&Vec<Quad>> {
        self.blank_node_to_quads_map.get(identifier)
    }

    fn number_of_blank_nodes(&self) -> usize {
        self.blank_node_to_quads_map.len()
    }
}

/// **4.7 Hash First Degree Quads**
///   This algorithm calculates a hash for a given blank node across the
///   quads in a dataset in which that blank node is a component. If the
///   hash uniquely identifies that blank node, no further examination is
///   necessary. Otherwise, a hash will be created for the blank node using
///   the Hash N-Degree Quads algorithm.
fn hash_first_degree_quads(
    state: &CanonicalizationState,
    reference_blank_node_identifier: &str,
) -> Result<String, CanonicalizationError> {
    // 1) Get the list of quads from the map entry for reference blank node
    // identifier in the blank node to quads map.
    let quads = state
        .get_quads_for_blank_node(reference_blank_node_identifier)
        .ok_or(CanonicalizationError::QuadsNotExist)?;

    // 2) For each quad, serialize it in canonical n-quads form, replacing
    // any blank node component by the identifier a if it matches the
    // reference blank node identifier, and by z otherwise.
    let mut nquads = quads
        .iter()
        .map(|quad| {
            let subject = match &quad.subject {
                Subject::BlankNode(n) => Subject::BlankNode(replace_blank_node_identifier(
                    n.as_ref(),
                    reference_blank_node_identifier,
                )),
                s => s.clone(),
            };
            let object = match &quad.object {
                Term::BlankNode(n) => Term::BlankNode(replace_blank_node_identifier(
                    n.as_ref(),
                    reference_blank_node_identifier,
                )),
                o => o.clone(),
            };
            let graph_name = match &quad.graph_name {
                GraphName::BlankNode(n) => GraphName::BlankNode(replace_blank_node_identifier(
                    n.as_ref(),
                    reference_blank_node_identifier,
                )),
                g => g.clone(),
            };
            serialize_quad(Quad::new(subject, quad.predicate.clone(), object, graph_name).as_ref())
        })
        .collect::<Vec<String>>();

    fn replace_blank_node_identifier(
        bnode: BlankNodeRef<'_>,
        reference_blank_node_identifier: &str,
    ) -> BlankNode {
        if bnode.as_str() == reference_blank_node_identifier {
            BlankNode::new_unchecked("a")
        } else {
            BlankNode::new_unchecked("z")
        }
    }

    // 3) Sort nquads in Unicode code point order.
    nquads.sort();

    // 4) Return the hash that results from passing the sorted and
    // concatenated nquads through the hash algorithm.
    hash(state.hash_algorithm, nquads.concat())
}

enum HashRelatedBlankNodePosition {
    Subject,
    Object,
    Graph,
}

impl HashRelatedBlankNodePosition {
    fn serialize(&self) -> &str {
        match self {
            Self::Subject => "s",
            Self::Object => "o",
            Self::Graph => "g",
        }
    }
}

/// **4.8 Hash Related Blank Node**
///   This algorithm generates a hash for some blank node component of a quad,
///   considering its position within that quad. This is used as part of the
///   Hash N-Degree Quads algorithm to characterize the blank nodes related to
///   some particular blank node within their mention sets.
fn hash_related_blank_node(
    state: &CanonicalizationState,
    related: &str,
    quad: &Quad,
    issuer: &IdentifierIssuer,
    position: HashRelatedBlankNodePosition,
) -> Result<String, CanonicalizationError> {
    // 1) Initialize a string input to the value of position.
    // 2) If position is not g, append <, the value of the predicate in
    // quad, and > to input.
    let input = match position {
        HashRelatedBlankNodePosition::Graph => position.serialize().to_string(),
        _ => format!("{}<{}>", position.serialize(), quad.predicate.as_str()),
    };

    // 3) If there is a canonical identifier for related, or an identifier
    // issued by issuer, append the string _:, followed by that identifier
    // (using the canonical identifier if present, otherwise the one issued
    // by issuer) to input.
    // 4) Otherwise, append the result of the Hash First Degree Quads
    // algorithm, passing related, to input. A first-degree hash is
    // appended bare, without the _: prefix.
    let identifier = match state.canonical_issuer.get(related) {
        Some(id) => format!("_:{}", id),
        None => match issuer.get(related) {
            Some(id) => format!("_:{}", id),
            None => hash_first_degree_quads(state, related)?,
        },
    };

    // 5) Return the hash that results from passing input through the hash
    // algorithm.
    hash(state.hash_algorithm, format!("{input}{identifier}"))
}

#[derive(PartialEq, Eq, Debug)]
struct HashNDegreeQuadsResult {
    hash: String,
    issuer: IdentifierIssuer,
}

impl PartialOrd for HashNDegreeQuadsResult {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HashNDegreeQuadsResult {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.hash.cmp(&other.hash)
    }
}

/// **4.9 Hash N-Degree Quads**
///   This algorithm calculates a hash for a given blank node across the quads
///   in a dataset in which that blank node is a component for which the hash
///   does not uniquely identify that blank node. This is done by expanding the
///   search from quads directly referencing that blank node (the mention set),
///   to those quads which contain nodes which are also components of quads in
///   the mention set, called the gossip path. This process proceeds in ever
///   greater degrees of indirection until a unique hash is obtained.
fn hash_n_degree_quads(
    state: &CanonicalizationState,
    hndq_call_counter: &mut HndqCallCounter,
    identifier: &str,
    path_identifier_issuer: &IdentifierIssuer,
) -> Result<HashNDegreeQuadsResult, CanonicalizationError> {
    // Every call, recursive ones included, is charged against the budget
    // before any work happens.
    hndq_call_counter.add()?;
    debug!(
        identifier = identifier,
        calls = hndq_call_counter.sum(),
        "hash n-degree quads"
    );

    let mut issuer = path_identifier_issuer.clone();

    // 1) Create a new map Hn for relating hashes to related blank nodes.
    let mut h_n = BTreeMap::<String, Vec<String>>::new();

    // 2) Get a reference, quads, to the list of quads from the map entry
    // for identifier in the blank node to quads map.
    let quads = state
        .get_quads_for_blank_node(identifier)
        .ok_or(CanonicalizationError::QuadsNotExist)?;

    // 3) For each quad in quads, for each component that is a blank node
    // not identified by identifier: compute the related hash for that
    // component and add its blank node identifier to Hn under that hash.
    for quad in quads {
        if let Subject::BlankNode(bnode) = &quad.subject {
            if bnode.as_str() != identifier {
                let related_hash = hash_related_blank_node(
                    state,
                    bnode.as_str(),
                    quad,
                    &issuer,
                    HashRelatedBlankNodePosition::Subject,
                )?;
                h_n.entry(related_hash)
                    .or_default()
                    .push(bnode.as_str().to_string());
            }
        }
        if let Term::BlankNode(bnode) = &quad.object {
            if bnode.as_str() != identifier {
                let related_hash = hash_related_blank_node(
                    state,
                    bnode.as_str(),
                    quad,
                    &issuer,
                    HashRelatedBlankNodePosition::Object,
                )?;
                h_n.entry(related_hash)
                    .or_default()
                    .push(bnode.as_str().to_string());
            }
        }
        if let GraphName::BlankNode(bnode) = &quad.graph_name {
            if bnode.as_str() != identifier {
                let related_hash = hash_related_blank_node(
                    state,
                    bnode.as_str(),
                    quad,
                    &issuer,
                    HashRelatedBlankNodePosition::Graph,
                )?;
                h_n.entry(related_hash)
                    .or_default()
                    .push(bnode.as_str().to_string());
            }
        }
    }

    // 4) Create an empty string, data to hash.
    let mut data_to_hash = String::new();

    // 5) For each related hash to blank node list mapping in Hn, code
    // point ordered by related hash:
    for (related_hash, blank_node_list) in h_n {
        // 5.1) Append the related hash to the data to hash.
        data_to_hash.push_str(&related_hash);

        // 5.2) Create a string chosen path.
        let mut chosen_path = String::new();

        // 5.3) Create an unset chosen issuer variable.
        let mut chosen_issuer = IdentifierIssuer::new("UNSET");

        // 5.4) For each permutation of blank node list. A single-element
        // list has exactly one permutation, the identity.
        'perm_loop: for p in blank_node_list.iter().permutations(blank_node_list.len()) {
            // 5.4.1) Create a copy of issuer, issuer copy.
            let mut issuer_copy = issuer.clone();

            // 5.4.2) Create a string path.
            let mut path = String::new();

            // 5.4.3) Create a recursion list, to store blank node
            // identifiers that must be recursively processed by this
            // algorithm.
            let mut recursion_list = Vec::<&String>::new();

            // 5.4.4) For each related in p:
            for related in p {
                if let Some(canonical_identifier) = state.canonical_issuer.get(related) {
                    // 5.4.4.1) If a canonical identifier has been issued
                    // for related, append the string _:, followed by the
                    // canonical identifier for related, to path.
                    path.push_str("_:");
                    path.push_str(&canonical_identifier);
                } else {
                    // 5.4.4.2.1) If issuer copy has not issued an
                    // identifier for related, append related to recursion
                    // list.
                    if !issuer_copy.is_issued(related) {
                        recursion_list.push(related);
                    }
                    // 5.4.4.2.2) Use the Issue Identifier algorithm,
                    // passing issuer copy and related, and append the
                    // string _:, followed by the result, to path.
                    path.push_str("_:");
                    path.push_str(&issuer_copy.issue(related));
                }
                // 5.4.4.3) If chosen path is not empty and the length of
                // path is greater than or equal to the length of chosen
                // path and path is greater than chosen path when
                // considering code point order, then skip to the next
                // permutation p.
                if !chosen_path.is_empty() && path.len() >= chosen_path.len() && path > chosen_path
                {
                    continue 'perm_loop;
                }
            }

            // 5.4.5) For each related in recursion list:
            for related in recursion_list {
                // 5.4.5.1) Set result to the result of recursively
                // executing this algorithm, passing related for identifier
                // and issuer copy for path identifier issuer.
                let result = hash_n_degree_quads(state, hndq_call_counter, related, &issuer_copy)?;
                // 5.4.5.2) Use the Issue Identifier algorithm, passing
                // issuer copy and related; append the string _:, followed
                // by the result, to path.
                path.push_str("_:");
                path.push_str(&issuer_copy.issue(related));
                // 5.4.5.3) Append <, the hash in result, and > to path.
                path.push('<');
                path.push_str(&result.hash);
                path.push('>');
                // 5.4.5.4) Set issuer copy to the identifier issuer in
                // result.
                issuer_copy = result.issuer;
                // 5.4.5.5) Apply the same early prune as in 5.4.4.3.
                if !chosen_path.is_empty() && path.len() >= chosen_path.len() && path > chosen_path
                {
                    continue 'perm_loop;
                }
            }

            // 5.4.6) If chosen path is empty or path is less than chosen
            // path when considering code point order, set chosen path to
            // path and chosen issuer to issuer copy.
            if chosen_path.is_empty() || path < chosen_path {
                chosen_path = path;
                chosen_issuer = issuer_copy;
            }
        }

        // 5.5) Append chosen path to data to hash.
        data_to_hash.push_str(&chosen_path);

        // 5.6) Replace issuer with chosen issuer.
        issuer = chosen_issuer;
    }

    // 6) Return issuer and the hash that results from passing data to hash
    // through the hash algorithm.
    let hash = hash(state.hash_algorithm, &data_to_hash)?;
    Ok(HashNDegreeQuadsResult { hash, issuer })
}

/// **4.5 Canonicalization Algorithm**
///
/// Assigns a canonical identifier to every blank node in the input dataset
/// and returns the resulting issued identifiers map. Relabeling and
/// serialization build on this map.
pub(crate) fn canonicalize_core(
    input_dataset: &Dataset,
    options: &CanonicalizationOptions,
) -> Result<HashMap<String, String>, CanonicalizationError> {
    // 1) Validate the configuration and reset the canonicalization state.
    options.validate()?;

    let mut state = CanonicalizationState::new(options.hash_algorithm);

    // 2) For every quad in the input dataset, add a reference to the quad
    // in the blank node to quads map for each of its blank node
    // components. Predicates cannot be blank nodes.
    state.update_blank_node_to_quads_map(input_dataset);
    debug!(
        blank_nodes = state.number_of_blank_nodes(),
        "indexed input dataset"
    );

    // The n-degree call budget scales with the size of the problem.
    let mut hndq_call_counter =
        HndqCallCounter::new(options.complexity_factor * state.number_of_blank_nodes());

    // 3) For each blank node identifier, in first-seen order: compute its
    // first degree hash and append the identifier to the hash to blank
    // nodes map under that hash.
    for identifier in &state.blank_node_order {
        let first_degree_hash = hash_first_degree_quads(&state, identifier)?;
        state
            .hash_to_blank_nodes_map
            .entry(first_degree_hash)
            .or_default()
            .push(identifier.clone());
    }

    // 4) For each hash to identifier list mapping, code point ordered by
    // hash, where the list holds a single identifier: issue a canonical
    // identifier for it and remove the mapping. The remaining mappings
    // hold the hash-sharing blank nodes.
    let mut shared_hash_buckets = BTreeMap::new();
    for (first_degree_hash, identifier_list) in &state.hash_to_blank_nodes_map {
        if let [identifier] = &identifier_list[..] {
            state.canonical_issuer.issue(identifier);
        } else {
            shared_hash_buckets.insert(first_degree_hash.clone(), identifier_list.clone());
        }
    }
    state.hash_to_blank_nodes_map = shared_hash_buckets;

    // 5) For each remaining mapping, code point ordered by hash: compute
    // an n-degree hash for every identifier not yet canonical, then issue
    // canonical identifiers by replaying the path issuers of the results
    // in ascending hash order.
    for (_, identifier_list) in &state.hash_to_blank_nodes_map {
        let mut hash_path_list = Vec::<HashNDegreeQuadsResult>::new();
        for n in identifier_list {
            if state.canonical_issuer.is_issued(n) {
                continue;
            }
            let mut temporary_issuer = IdentifierIssuer::new(TEMPORARY_IDENTIFIER_PREFIX);
            temporary_issuer.issue(n);
            hash_path_list.push(hash_n_degree_quads(
                &state,
                &mut hndq_call_counter,
                n,
                &temporary_issuer,
            )?);
        }
        hash_path_list.sort();
        for result in hash_path_list {
            for (existing, _issued) in result.issuer.iter() {
                state.canonical_issuer.issue(existing);
            }
        }
    }

    debug!(
        hndq_calls = hndq_call_counter.sum(),
        issuer = %state.canonical_issuer.to_log(),
        "canonical identifiers issued"
    );

    Ok(state.canonical_issuer.into_issued_identifiers_map())
}

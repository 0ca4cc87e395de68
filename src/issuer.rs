use serde_json::{json, Value};
use std::collections::HashMap;

/// **4.4 Blank Node Identifier Issuer State**
///   During the canonicalization algorithm, it is sometimes necessary to
///   issue new identifiers to blank nodes. The Issue Identifier algorithm
///   uses an identifier issuer to accomplish this task. The information an
///   identifier issuer needs to keep track of is described below.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct IdentifierIssuer {
    /// **identifier prefix**
    ///   The identifier prefix is a string that is used at the
    ///   beginning of an blank node identifier. When generating a new
    ///   blank node identifier, the prefix is concatenated with an
    ///   identifier counter. For example, c14n is a proper initial value
    ///   for the identifier prefix that would produce blank node
    ///   identifiers like c14n1.
    identifier_prefix: String,

    /// **identifier counter**
    ///   A counter that is appended to the identifier prefix to create an
    ///   blank node identifier. It is initialized to 0.
    identifier_counter: usize,

    /// **issued identifiers map**
    ///   An ordered map that relates existing identifiers to issued
    ///   identifiers, to prevent issuance of more than one new identifier
    ///   per existing identifier, and to allow blank nodes to be
    ///   reassigned identifiers some time after issuance.
    ///
    ///   The map lookup lives in `issued_identifiers_map`; the issuance
    ///   order, which must be replayable bit-for-bit, lives in
    ///   `issued_order`.
    issued_identifiers_map: HashMap<String, String>,
    issued_order: Vec<String>,
}

impl IdentifierIssuer {
    pub fn new(identifier_prefix: &str) -> IdentifierIssuer {
        IdentifierIssuer {
            identifier_prefix: identifier_prefix.to_string(),
            identifier_counter: 0,
            issued_identifiers_map: HashMap::new(),
            issued_order: Vec::new(),
        }
    }

    fn increment(&mut self) {
        self.identifier_counter += 1
    }

    pub fn get(&self, existing_identifier: &str) -> Option<String> {
        self.issued_identifiers_map
            .get(existing_identifier)
            .cloned()
    }

    pub fn is_issued(&self, existing_identifier: &str) -> bool {
        self.issued_identifiers_map
            .contains_key(existing_identifier)
    }

    /// **4.6 Issue Identifier Algorithm**
    ///   This algorithm issues a new blank node identifier for a given existing
    ///   blank node identifier. It also updates state information that tracks
    ///   the order in which new blank node identifiers were issued. The order
    ///   of issuance is important for canonically labeling blank nodes that are
    ///   isomorphic to others in the dataset.
    pub fn issue(&mut self, existing_identifier: &str) -> String {
        // 1) If there is a map entry for existing identifier in issued identifiers
        // map of I, return it.
        if let Some(issued_identifier) = self.get(existing_identifier) {
            return issued_identifier;
        }

        // 2) Generate issued identifier by concatenating identifier prefix with
        // the string value of identifier counter.
        let issued_identifier = format!("{}{}", self.identifier_prefix, self.identifier_counter);

        // 3) Add an entry mapping existing identifier to issued identifier to
        // the issued identifiers map of I.
        self.issued_identifiers_map
            .insert(existing_identifier.to_string(), issued_identifier.clone());
        self.issued_order.push(existing_identifier.to_string());

        // 4) Increment identifier counter.
        self.increment();

        // 5) Return issued identifier.
        issued_identifier
    }

    /// Iterates the `(existing, issued)` pairs in issuance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.issued_order.iter().map(|existing| {
            (
                existing.as_str(),
                self.issued_identifiers_map[existing].as_str(),
            )
        })
    }

    /// Renders the issuer as a structured record for diagnostics.
    pub fn to_log(&self) -> Value {
        json!({
            "prefix": self.identifier_prefix,
            "counter": self.identifier_counter,
            "issued": Value::Array(
                self.iter()
                    .map(|(existing, issued)| json!([existing, issued]))
                    .collect(),
            ),
        })
    }

    pub(crate) fn into_issued_identifiers_map(self) -> HashMap<String, String> {
        self.issued_identifiers_map
    }
}

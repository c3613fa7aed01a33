use std::collections::{BTreeMap, HashMap};

use tracing::{info, instrument, warn};

use crate::{
    CatalogError, Node, Record, Rule, RuleError, RuleId, SyntaxError, build, combine,
    validate_syntax,
};

/// In-memory store of named rules.
///
/// Each entry keeps the rule's source text and the JSON serialized form of
/// its tree, and is looked up by id or by unique name. Evaluation always
/// goes through the stored form, the same path a database-backed store
/// takes. Mutation needs `&mut self`; share behind a lock across threads.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    pub(crate) rules: BTreeMap<RuleId, Rule>,
    pub(crate) names: HashMap<String, RuleId>,
    pub(crate) next_id: u64,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            rules: BTreeMap::new(),
            names: HashMap::new(),
            next_id: 1,
        }
    }
}

impl RuleCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and store it under `name`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateRule`] if the name is taken,
    /// [`CatalogError::EmptyRule`] if the text has no conditions, and
    /// [`CatalogError::Rule`] for syntax or condition errors.
    #[instrument(skip(self, text))]
    pub fn create_rule(&mut self, name: &str, text: &str) -> Result<RuleId, CatalogError> {
        validate_syntax(text).map_err(RuleError::from)?;
        self.ensure_unique(name)?;
        let tree = build(text)?.ok_or_else(|| CatalogError::EmptyRule {
            name: name.to_owned(),
        })?;
        self.insert(name, text.to_owned(), &tree)
    }

    /// Parse several rule texts, AND them together and store the result.
    ///
    /// The stored text is each input in parentheses joined with `AND`, so it
    /// parses back to the same tree.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateRule`] if the name is taken,
    /// [`CatalogError::NothingToCombine`] for an empty list,
    /// [`CatalogError::EmptyInput`] with the position of an input that has no
    /// conditions, and [`CatalogError::Rule`] for syntax or condition errors,
    /// including a combined tree deeper than [`Node::MAX_DEPTH`].
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub fn combine_rules<S: AsRef<str>>(
        &mut self,
        name: &str,
        texts: &[S],
    ) -> Result<RuleId, CatalogError> {
        self.ensure_unique(name)?;
        let trees = texts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                build(text.as_ref())?.ok_or_else(|| CatalogError::EmptyInput {
                    name: name.to_owned(),
                    index,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        let tree = combine(trees).ok_or_else(|| CatalogError::NothingToCombine {
            name: name.to_owned(),
        })?;
        let text = join_texts(texts.iter().map(AsRef::as_ref));
        self.insert(name, text, &tree)
    }

    /// AND together rules already in the catalog, by name.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownRule`] for a name not in the catalog, otherwise
    /// as [`combine_rules`](Self::combine_rules).
    #[instrument(skip(self, sources), fields(count = sources.len()))]
    pub fn combine_named<S: AsRef<str>>(
        &mut self,
        name: &str,
        sources: &[S],
    ) -> Result<RuleId, CatalogError> {
        self.ensure_unique(name)?;
        let rules = sources
            .iter()
            .map(|source| {
                self.get_by_name(source.as_ref())
                    .ok_or_else(|| CatalogError::UnknownRule {
                        name: source.as_ref().to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        let trees = rules
            .iter()
            .map(|rule| rule.tree())
            .collect::<Result<Vec<_>, RuleError>>()?;
        let tree = combine(trees).ok_or_else(|| CatalogError::NothingToCombine {
            name: name.to_owned(),
        })?;
        let text = join_texts(rules.iter().map(|rule| rule.text()));
        self.insert(name, text, &tree)
    }

    /// Evaluate a stored rule against a record.
    ///
    /// # Errors
    ///
    /// [`CatalogError::RuleNotFound`] for an unknown id; a stored tree that
    /// fails to deserialize or evaluate surfaces as [`CatalogError::Rule`].
    #[instrument(skip(self, record))]
    pub fn evaluate_rule(&self, id: RuleId, record: &Record) -> Result<bool, CatalogError> {
        let rule = self.get(id).ok_or_else(|| {
            warn!(rule_id = %id, "rule not found");
            CatalogError::RuleNotFound { id }
        })?;
        let tree = rule.tree()?;
        Ok(tree.evaluate(record)?)
    }

    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Rule> {
        self.names.get(name).and_then(|id| self.rules.get(id))
    }

    /// All rules in id order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn ensure_unique(&self, name: &str) -> Result<(), CatalogError> {
        if self.names.contains_key(name) {
            warn!(name, "rule name already exists");
            return Err(CatalogError::DuplicateRule {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, text: String, tree: &Node) -> Result<RuleId, CatalogError> {
        let depth = tree.depth();
        if depth > Node::MAX_DEPTH {
            warn!(name, depth, "rule tree too deep to store");
            return Err(RuleError::from(SyntaxError::TooDeep {
                limit: Node::MAX_DEPTH,
            })
            .into());
        }
        let id = RuleId::new(self.next_id);
        self.next_id += 1;
        let rule = Rule {
            id,
            name: name.to_owned(),
            text,
            ast: tree.to_json(),
        };
        self.names.insert(rule.name.clone(), id);
        self.rules.insert(id, rule);
        info!(rule_id = %id, name, operands = tree.operand_count(), depth, "rule stored");
        Ok(id)
    }
}

fn join_texts<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts
        .map(|text| format!("({})", text.trim()))
        .collect::<Vec<_>>()
        .join(" AND ")
}

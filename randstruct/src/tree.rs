//! Binary trees built from Dyck words.
//!
//! The first-return decomposition `X inner Y trailing` reads directly as a
//! tree: the leading `X` is a node, `inner` is its left subtree and
//! `trailing` its right subtree. This is a bijection between Dyck words with
//! `n` pairs and binary trees with `n` nodes, so a uniform word gives a
//! uniform tree.
//!
//! ## Rust Lesson #34: Recursive Enums Need a Box
//!
//! `enum BinaryTree { Node { left: BinaryTree, .. } }` would have infinite
//! size. `Box<BinaryTree>` is a pointer with a fixed size, and it owns its
//! child outright: no sharing, no cycles, and dropping the root frees the
//! whole tree.

use crate::dyck::{self, DyckWord, Symbol};
use crate::error::Result;
use crate::rng::UniformSource;

/// Label given to every node built from a word.
pub const NODE_LABEL: char = 'X';

/// A binary tree whose children are exclusively owned.
///
/// Equality and hashing are structural: same labels, same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BinaryTree {
    #[default]
    Empty,
    Node {
        label: char,
        left: Box<BinaryTree>,
        right: Box<BinaryTree>,
    },
}

impl BinaryTree {
    pub fn node(label: char, left: BinaryTree, right: BinaryTree) -> Self {
        BinaryTree::Node {
            label,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// A single node with no children.
    pub fn leaf(label: char) -> Self {
        Self::node(label, BinaryTree::Empty, BinaryTree::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BinaryTree::Empty)
    }

    pub fn label(&self) -> Option<char> {
        match self {
            BinaryTree::Empty => None,
            BinaryTree::Node { label, .. } => Some(*label),
        }
    }

    pub fn left(&self) -> Option<&BinaryTree> {
        match self {
            BinaryTree::Empty => None,
            BinaryTree::Node { left, .. } => Some(left),
        }
    }

    pub fn right(&self) -> Option<&BinaryTree> {
        match self {
            BinaryTree::Empty => None,
            BinaryTree::Node { right, .. } => Some(right),
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        match self {
            BinaryTree::Empty => 0,
            BinaryTree::Node { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Nodes on the longest root-to-leaf path, 0 when empty.
    pub fn height(&self) -> usize {
        match self {
            BinaryTree::Empty => 0,
            BinaryTree::Node { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    /// Parse raw symbols, rejecting anything that is not a Dyck word.
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self> {
        dyck::validate(symbols)?;
        Ok(Self::from_balanced(symbols))
    }

    /// Tree for a word already known to be balanced.
    pub fn from_dyck(word: &DyckWord) -> Self {
        Self::from_balanced(word.symbols())
    }

    fn from_balanced(symbols: &[Symbol]) -> Self {
        let Some(matching) = first_return(symbols) else {
            return BinaryTree::Empty;
        };
        let inner = &symbols[1..matching];
        let trailing = &symbols[matching + 1..];
        Self::node(NODE_LABEL, Self::from_balanced(inner), Self::from_balanced(trailing))
    }

    /// Inverse of [`BinaryTree::from_dyck`]: `X left Y right` per node.
    pub fn to_dyck_word(&self) -> DyckWord {
        let mut symbols = Vec::with_capacity(2 * self.node_count());
        self.push_symbols(&mut symbols);
        DyckWord::from_valid(symbols)
    }

    fn push_symbols(&self, out: &mut Vec<Symbol>) {
        if let BinaryTree::Node { left, right, .. } = self {
            out.push(Symbol::Open);
            left.push_symbols(out);
            out.push(Symbol::Close);
            right.push_symbols(out);
        }
    }

    fn write_indented(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        level: usize,
        prefix: &str,
    ) -> std::fmt::Result {
        if let BinaryTree::Node { label, left, right } = self {
            writeln!(f, "{}{}{:?}", "\t".repeat(level), prefix, label)?;
            left.write_indented(f, level + 1, "L--- ")?;
            right.write_indented(f, level + 1, "R--- ")?;
        }
        Ok(())
    }
}

/// Index of the symbol that brings the running balance back to zero.
fn first_return(symbols: &[Symbol]) -> Option<usize> {
    let mut balance = 0isize;
    for (i, symbol) in symbols.iter().enumerate() {
        match symbol {
            Symbol::Open => balance += 1,
            Symbol::Close => {
                balance -= 1;
                if balance == 0 {
                    return Some(i);
                }
            }
        }
    }
    None
}

/// One node per line, indented by depth:
///
/// ```text
/// Root: 'X'
///     L--- 'X'
///     R--- 'X'
/// ```
impl std::fmt::Display for BinaryTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        self.write_indented(f, 0, "Root: ")
    }
}

impl DyckWord {
    /// See [`BinaryTree::from_dyck`].
    pub fn to_tree(&self) -> BinaryTree {
        BinaryTree::from_dyck(self)
    }
}

/// Uniformly random binary tree with `n` nodes.
pub fn random_binary_tree<S: UniformSource + ?Sized>(
    source: &mut S,
    n: usize,
) -> Result<BinaryTree> {
    Ok(dyck::random_dyck_word(source, n)?.to_tree())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SampleError;
    use crate::rng::RandSource;
    use std::collections::HashSet;

    /// Every Dyck word with `n` pairs, by first-return decomposition.
    fn all_words(n: usize) -> Vec<Vec<Symbol>> {
        if n == 0 {
            return vec![Vec::new()];
        }
        let mut words = Vec::new();
        for k in 1..=n {
            for inner in all_words(k - 1) {
                for trailing in all_words(n - k) {
                    let mut word = vec![Symbol::Open];
                    word.extend(&inner);
                    word.push(Symbol::Close);
                    word.extend(&trailing);
                    words.push(word);
                }
            }
        }
        words
    }

    fn tree(s: &str) -> BinaryTree {
        s.parse::<DyckWord>().unwrap().to_tree()
    }

    #[test]
    fn small_shapes() {
        assert_eq!(tree(""), BinaryTree::Empty);
        assert_eq!(tree("XY"), BinaryTree::leaf('X'));
        assert_eq!(
            tree("XXYY"),
            BinaryTree::node('X', BinaryTree::leaf('X'), BinaryTree::Empty)
        );
        assert_eq!(
            tree("XYXY"),
            BinaryTree::node('X', BinaryTree::Empty, BinaryTree::leaf('X'))
        );
    }

    #[test]
    fn node_count_matches_semilength() {
        for n in 0..=6 {
            for word in all_words(n) {
                let t = BinaryTree::from_symbols(&word).unwrap();
                assert_eq!(t.node_count(), n);
            }
        }
    }

    #[test]
    fn distinct_words_give_distinct_trees() {
        for n in 0..=7 {
            let words = all_words(n);
            let trees: HashSet<BinaryTree> = words
                .iter()
                .map(|w| BinaryTree::from_symbols(w).unwrap())
                .collect();
            assert_eq!(trees.len(), words.len(), "n = {}", n);
            assert_eq!(words.len() as u128, dyck::count_dyck_words(n).unwrap());
        }
    }

    #[test]
    fn round_trip_through_word() {
        for word in all_words(6) {
            let word = DyckWord::new(word).unwrap();
            assert_eq!(word.to_tree().to_dyck_word(), word);
        }
    }

    #[test]
    fn rejects_malformed_symbols() {
        let err = BinaryTree::from_symbols(&[Symbol::Close, Symbol::Open]).unwrap_err();
        assert!(matches!(err, SampleError::MalformedDyckWord { position: 0, .. }));

        let err =
            BinaryTree::from_symbols(&[Symbol::Open, Symbol::Open, Symbol::Close]).unwrap_err();
        assert!(matches!(err, SampleError::MalformedDyckWord { position: 3, .. }));
    }

    #[test]
    fn height_and_children() {
        let t = tree("XXXYYY");
        assert_eq!(t.height(), 3);
        assert_eq!(t.label(), Some('X'));
        assert!(t.right().unwrap().is_empty());
        assert_eq!(t.left().unwrap().node_count(), 2);
        assert_eq!(BinaryTree::Empty.height(), 0);
    }

    #[test]
    fn display_is_indented() {
        let t = tree("XXYYXY");
        assert_eq!(t.to_string(), "Root: 'X'\n\tL--- 'X'\n\tR--- 'X'\n");
        assert_eq!(BinaryTree::Empty.to_string(), "(empty)");
    }

    #[test]
    fn random_trees_have_n_nodes() {
        let mut source = RandSource::seeded(8);
        for n in 0..20 {
            assert_eq!(random_binary_tree(&mut source, n).unwrap().node_count(), n);
        }
    }
}

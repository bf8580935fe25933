use eco_types::Digest;

/// An item that participates in a linear hash chain.
pub trait ChainLinked {
    /// Position claimed by the item.
    fn position(&self) -> u64;
    /// The item's stored digest.
    fn stored_digest(&self) -> Digest;
    /// The stored digest of the preceding item ([`Digest::SENTINEL`] for genesis).
    fn previous_digest(&self) -> Digest;
    /// Digest recomputed from the stored fields, or `None` if they no longer
    /// encode.
    fn recompute_digest(&self) -> Option<Digest>;
}

/// Hash chain integrity verifier.
///
/// A chain is valid when:
/// 1. it is non-empty and item `i` claims position `i`
/// 2. the genesis item links to [`Digest::SENTINEL`]
/// 3. every later item links to the stored digest of the item before it
/// 4. every item's stored digest matches the digest recomputed from its fields
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, stopping at the first violation.
    pub fn verify_chain<T: ChainLinked>(items: &[T]) -> Result<(), ChainError> {
        if items.is_empty() {
            return Err(ChainError::Empty);
        }
        for (i, item) in items.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| &items[p]);
            if let Some(err) = Self::check_item(i, item, prev).into_iter().next() {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Walk the whole chain and collect every violation.
    pub fn find_violations<T: ChainLinked>(items: &[T]) -> Vec<ChainError> {
        if items.is_empty() {
            return vec![ChainError::Empty];
        }
        items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| {
                let prev = i.checked_sub(1).map(|p| &items[p]);
                Self::check_item(i, item, prev)
            })
            .collect()
    }

    fn check_item<T: ChainLinked>(index: usize, item: &T, prev: Option<&T>) -> Vec<ChainError> {
        let mut errors = Vec::new();

        if item.position() != index as u64 {
            errors.push(ChainError::PositionMismatch {
                index,
                found: item.position(),
            });
        }

        match prev {
            None if !item.previous_digest().is_sentinel() => {
                errors.push(ChainError::GenesisNotSentinel);
            }
            Some(prev) if item.previous_digest() != prev.stored_digest() => {
                errors.push(ChainError::BrokenLink { index });
            }
            _ => {}
        }

        match item.recompute_digest() {
            Some(computed) if computed == item.stored_digest() => {}
            Some(_) => errors.push(ChainError::DigestMismatch { index }),
            None => errors.push(ChainError::Unencodable { index }),
        }

        errors
    }
}

/// Errors from chain verification.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain has no genesis item")]
    Empty,

    #[error("item at index {index} claims position {found}")]
    PositionMismatch { index: usize, found: u64 },

    #[error("genesis item does not link to the sentinel digest")]
    GenesisNotSentinel,

    #[error("broken link at index {index}: previous digest does not match")]
    BrokenLink { index: usize },

    #[error("digest mismatch at index {index}: computed digest differs from stored")]
    DigestMismatch { index: usize },

    #[error("item at index {index} can no longer be encoded")]
    Unencodable { index: usize },
}

impl ChainError {
    /// Index of the offending item, if the error concerns one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::GenesisNotSentinel => Some(0),
            Self::PositionMismatch { index, .. }
            | Self::BrokenLink { index }
            | Self::DigestMismatch { index }
            | Self::Unencodable { index } => Some(*index),
        }
    }
}

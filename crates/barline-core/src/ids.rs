// File: crates/barline-core/src/ids.rs
// Summary: Per-instance chart ids and collision-free ids for shared drawing resources.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Unique per chart instance within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartInstanceId(u64);

impl ChartInstanceId {
    pub fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChartInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Gradient,
    ClipPath,
    Marker,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Gradient => "gradient",
            ElementKind::ClipPath => "clip",
            ElementKind::Marker => "marker",
        }
    }
}

/// Id for a drawing resource owned by `instance`. Group names may hold any
/// characters, so they are hashed rather than embedded.
pub fn element_id(instance: ChartInstanceId, kind: ElementKind, group: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(instance.get().to_le_bytes());
    hasher.update(kind.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(group.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest[..6].iter().map(|b| format!("{b:02x}")).collect();
    format!("{instance}-{}-{hex}", kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_are_distinct() {
        let a = ChartInstanceId::next();
        let b = ChartInstanceId::next();
        assert!(b > a);
        assert_ne!(
            element_id(a, ElementKind::Gradient, "sales"),
            element_id(b, ElementKind::Gradient, "sales")
        );
    }

    #[test]
    fn ids_are_stable_and_safe() {
        let id = ChartInstanceId(7);
        let g = element_id(id, ElementKind::Gradient, "a b/\"c\"");
        assert_eq!(g, element_id(id, ElementKind::Gradient, "a b/\"c\""));
        assert!(g.starts_with("chart7-gradient-"));
        assert!(g.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        assert_ne!(g, element_id(id, ElementKind::ClipPath, "a b/\"c\""));
    }
}

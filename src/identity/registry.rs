//! Identity registry: the ordered, append-only list of personas
//!
//! Lives for the whole process. Appends are serialized by a single lock, so
//! concurrent registrations never interleave inside the sequence.

use parking_lot::RwLock;

use super::types::PersonaIdentity;

/// Thread-safe, append-only registry of persona identities
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    identities: RwLock<Vec<PersonaIdentity>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; returns the new registry length
    pub fn append(&self, identity: PersonaIdentity) -> usize {
        let mut identities = self.identities.write();
        identities.push(identity);
        identities.len()
    }

    /// Snapshot of every record in insertion order
    pub fn list_all(&self) -> Vec<PersonaIdentity> {
        self.identities.read().clone()
    }

    pub fn len(&self) -> usize {
        self.identities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GeneratedVideo;
    use crate::identity::Coordinates;
    use std::sync::Arc;

    fn identity(prompt: &str) -> PersonaIdentity {
        PersonaIdentity::new(
            prompt,
            Coordinates::new(37.77, -122.41),
            GeneratedVideo {
                video_url: "https://cdn.example.com/v.mp4".to_string(),
                persona: prompt.to_string(),
            },
        )
    }

    #[test]
    fn test_empty_registry() {
        let registry = IdentityRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_all().is_empty());
    }

    #[test]
    fn test_preserves_insertion_order() {
        let registry = IdentityRegistry::new();
        let a = identity("a");
        let b = identity("b");

        assert_eq!(registry.append(a.clone()), 1);
        assert_eq!(registry.append(b.clone()), 2);

        assert_eq!(registry.list_all(), vec![a, b]);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let registry = IdentityRegistry::new();
        registry.append(identity("wizard"));

        let first = registry.list_all();
        let second = registry.list_all();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_appends() {
        let registry = Arc::new(IdentityRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        registry.append(identity(&format!("{}-{}", t, i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let all = registry.list_all();
        assert_eq!(all.len(), 400);

        // Each thread's own records keep their relative order
        for t in 0..8 {
            let prefix = format!("{}-", t);
            let seq: Vec<usize> = all
                .iter()
                .filter_map(|p| p.prompt.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..50).collect::<Vec<_>>());
        }
    }
}

use crate::types::Urn;

/// Anything the authorization filter can decide on: an entity that knows its own URN.
pub trait UrnResource {
    /// The entity's canonical identifier.
    fn urn(&self) -> &Urn;

    /// The organization owning the entity, read from its URN.
    fn org(&self) -> &str {
        self.urn().org()
    }
}

impl<T: UrnResource> UrnResource for &T {
    fn urn(&self) -> &Urn {
        (**self).urn()
    }
}

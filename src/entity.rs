use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait that every persisted record type implements so a
/// [`Collection`](crate::store::Collection) can manage it.
///
/// The hooks mirror the record's lifecycle: created from a payload, patched,
/// deleted, or driven by a domain-specific action.
pub trait Entity: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Store key holding the whole collection.
    const COLLECTION_KEY: &'static str;

    type CreateParams: Send + Debug;
    type Patch: Send + Debug;
    type Action: Send + Debug;
    type ActionResult: Send + Debug;
    type Error: std::error::Error + Send + 'static;

    /// Unique key of this record within its collection.
    fn id(&self) -> &str;

    /// Construct the record from its generated id and the creation payload.
    fn from_create_params(id: String, params: Self::CreateParams) -> Result<Self, Self::Error>;

    /// Error reported when `id` is not present in the collection.
    fn not_found(id: &str) -> Self::Error;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

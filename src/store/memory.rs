//! Thread-safe in-memory [`SlotStore`] implementation for tests and headless embeddings.

// self
use crate::{
	_prelude::*,
	store::{Slot, SlotStore, StoreError},
};

type SlotMap = Arc<RwLock<HashMap<Slot, String>>>;

/// Storage backend that keeps slots in-process; clones share the same slots.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SlotMap);
impl MemoryStore {
	/// Number of slots currently populated.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no slot is populated.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl SlotStore for MemoryStore {
	fn get(&self, slot: Slot) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(&slot).cloned())
	}

	fn set(&self, slot: Slot, value: &str) -> Result<(), StoreError> {
		self.0.write().insert(slot, value.to_owned());

		Ok(())
	}

	fn remove(&self, slot: Slot) -> Result<(), StoreError> {
		self.0.write().remove(&slot);

		Ok(())
	}
}
